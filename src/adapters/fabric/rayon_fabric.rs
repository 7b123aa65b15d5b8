use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::controllers::engine::ports::execution_fabric::{ExecutionFabric, FabricError, FabricJobId};
use crate::core::actions::execute_task::execute_task::execute_task;
use crate::core::actions::execute_task::ports::column_kernel::ColumnKernel;
use crate::core::data::render_task::{CompletedTask, RenderTask};
use crate::core::fractals::mandelbrot::algorithm::MandelbrotKernel;
use crate::core::util::lock::lock;

struct JobSlot {
    total: usize,
    completed: AtomicUsize,
    cancelled: AtomicBool,
    results: Mutex<Vec<CompletedTask>>,
}

/// In-process execution fabric. Every task of a job is spawned onto a
/// dedicated rayon pool; submission returns as soon as the tasks are queued.
pub struct RayonFabric {
    pool: ThreadPool,
    kernel: Arc<dyn ColumnKernel>,
    jobs: Mutex<HashMap<FabricJobId, Arc<JobSlot>>>,
    next_id: AtomicU64,
}

impl RayonFabric {
    /// Mandelbrot fabric. `threads == 0` lets rayon pick one thread per core.
    pub fn new(threads: usize) -> Result<Self, FabricError> {
        Self::with_kernel(threads, Arc::new(MandelbrotKernel))
    }

    pub fn with_kernel(threads: usize, kernel: Arc<dyn ColumnKernel>) -> Result<Self, FabricError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("fractal-worker-{index}"))
            .build()
            .map_err(|err| FabricError::Unavailable(err.to_string()))?;

        debug!("rayon fabric started with {} threads", pool.current_num_threads());

        Ok(Self {
            pool,
            kernel,
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn slot(&self, job: FabricJobId) -> Result<Arc<JobSlot>, FabricError> {
        lock(&self.jobs)
            .get(&job)
            .cloned()
            .ok_or(FabricError::UnknownJob(job))
    }

    fn run_task(kernel: &dyn ColumnKernel, slot: &JobSlot, task: RenderTask) {
        if slot.cancelled.load(Ordering::Relaxed) {
            return;
        }

        let column_index = task.column_index;

        match execute_task(&task, kernel, &slot.cancelled) {
            Ok(outcome) => {
                lock(&slot.results).push(CompletedTask {
                    column_index,
                    outcome,
                });
                slot.completed.fetch_add(1, Ordering::Release);
            }
            Err(_) => trace!("column {} abandoned", column_index),
        }
    }
}

impl ExecutionFabric for RayonFabric {
    fn submit_job(&self, tasks: Vec<RenderTask>) -> Result<FabricJobId, FabricError> {
        if tasks.is_empty() {
            return Err(FabricError::Rejected("job has no tasks".to_string()));
        }

        let id = FabricJobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let slot = Arc::new(JobSlot {
            total: tasks.len(),
            completed: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            results: Mutex::new(Vec::with_capacity(tasks.len())),
        });

        lock(&self.jobs).insert(id, Arc::clone(&slot));

        for task in tasks {
            let slot = Arc::clone(&slot);
            let kernel = Arc::clone(&self.kernel);

            self.pool.spawn(move || Self::run_task(kernel.as_ref(), &slot, task));
        }

        debug!("fabric job {} queued {} tasks", id, slot.total);

        Ok(id)
    }

    fn query_progress(&self, job: FabricJobId) -> Result<usize, FabricError> {
        Ok(self.slot(job)?.completed.load(Ordering::Acquire))
    }

    fn fetch_results(&self, job: FabricJobId) -> Result<Vec<CompletedTask>, FabricError> {
        let slot = self.slot(job)?;
        let completed = slot.completed.load(Ordering::Acquire);

        if completed < slot.total {
            return Err(FabricError::Incomplete {
                job,
                completed,
                total: slot.total,
            });
        }

        lock(&self.jobs).remove(&job);

        Ok(std::mem::take(&mut *lock(&slot.results)))
    }

    fn cancel(&self, job: FabricJobId) {
        if let Some(slot) = lock(&self.jobs).remove(&job) {
            slot.cancelled.store(true, Ordering::Relaxed);
            debug!("fabric job {} cancelled", job);
        }
    }
}
