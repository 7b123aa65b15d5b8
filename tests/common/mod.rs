#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use fractal_farm::{
    execute_task, CancelToken, ColumnKernel, CompletedTask, CompletionReport, EngineConfig, ExecutionFabric,
    FabricError, FabricJobId, Image, KernelError, MandelbrotKernel, NeverCancel, RenderEngine,
    RenderEnginePresenterPort, RenderEvent, RenderParameters, RenderTask, Rgb, Viewport,
};

const WAIT_LIMIT: Duration = Duration::from_secs(10);

pub fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + WAIT_LIMIT;

    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<RenderEvent>>,
    arrived: Condvar,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, generation: u64) -> Vec<RenderEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.generation() == Some(generation))
            .collect()
    }

    pub fn wait_for(&self, predicate: impl Fn(&RenderEvent) -> bool) -> RenderEvent {
        let deadline = Instant::now() + WAIT_LIMIT;
        let mut events = self.events.lock().unwrap();

        loop {
            if let Some(event) = events.iter().find(|&event| predicate(event)) {
                return event.clone();
            }

            let now = Instant::now();
            assert!(now < deadline, "timed out waiting for render event, saw {:?}", *events);

            events = self.arrived.wait_timeout(events, deadline - now).unwrap().0;
        }
    }

    pub fn wait_for_completion(&self, generation: u64) -> CompletionReport {
        match self.wait_for(|event| matches!(event, RenderEvent::Complete(report) if report.generation == generation)) {
            RenderEvent::Complete(report) => report,
            other => unreachable!("unexpected event {other:?}"),
        }
    }

    pub fn wait_for_progress(&self, generation: u64, completed: usize) {
        self.wait_for(|event| {
            matches!(event, RenderEvent::Progress(update)
                if update.generation == generation && update.progress.completed == completed)
        });
    }
}

impl RenderEnginePresenterPort for RecordingPresenter {
    fn present(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
        self.arrived.notify_all();
    }
}

struct GatedJob {
    results: Vec<CompletedTask>,
    released: usize,
}

/// Computes every task at submission but only reports them finished once
/// the test releases them. Results come back in reverse column order.
pub struct GatedFabric {
    kernel: Arc<dyn ColumnKernel>,
    open: AtomicBool,
    fail_next: AtomicBool,
    duplicate_first_column: AtomicBool,
    jobs: Mutex<HashMap<FabricJobId, GatedJob>>,
    next_id: AtomicU64,
    submitted: Mutex<Vec<FabricJobId>>,
    cancelled: Mutex<Vec<FabricJobId>>,
}

impl GatedFabric {
    pub fn closed() -> Self {
        Self::with_kernel(Arc::new(MandelbrotKernel), false)
    }

    pub fn open() -> Self {
        Self::with_kernel(Arc::new(MandelbrotKernel), true)
    }

    pub fn with_kernel(kernel: Arc<dyn ColumnKernel>, open: bool) -> Self {
        Self {
            kernel,
            open: AtomicBool::new(open),
            fail_next: AtomicBool::new(false),
            duplicate_first_column: AtomicBool::new(false),
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, job: FabricJobId, released: usize) {
        if let Some(job) = self.jobs.lock().unwrap().get_mut(&job) {
            job.released = released.min(job.results.len());
        }
    }

    pub fn release_all(&self) {
        for job in self.jobs.lock().unwrap().values_mut() {
            job.released = job.results.len();
        }
    }

    /// Hands back column 0 in place of the last column.
    pub fn duplicate_first_column(&self) {
        self.duplicate_first_column.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_submit(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<FabricJobId> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn last_job(&self) -> FabricJobId {
        *self.submitted.lock().unwrap().last().unwrap()
    }

    pub fn cancelled(&self) -> Vec<FabricJobId> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl ExecutionFabric for GatedFabric {
    fn submit_job(&self, tasks: Vec<RenderTask>) -> Result<FabricJobId, FabricError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FabricError::Unavailable("no workers".to_string()));
        }

        let mut results: Vec<CompletedTask> = tasks
            .iter()
            .map(|task| CompletedTask {
                column_index: task.column_index,
                outcome: execute_task(task, self.kernel.as_ref(), &NeverCancel).unwrap(),
            })
            .collect();
        results.reverse();

        let id = FabricJobId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let released = if self.open.load(Ordering::SeqCst) { results.len() } else { 0 };

        self.jobs.lock().unwrap().insert(id, GatedJob { results, released });
        self.submitted.lock().unwrap().push(id);

        Ok(id)
    }

    fn query_progress(&self, job: FabricJobId) -> Result<usize, FabricError> {
        self.jobs
            .lock()
            .unwrap()
            .get(&job)
            .map(|job| job.released)
            .ok_or(FabricError::UnknownJob(job))
    }

    fn fetch_results(&self, job: FabricJobId) -> Result<Vec<CompletedTask>, FabricError> {
        let jobs = self.jobs.lock().unwrap();
        let gated = jobs.get(&job).ok_or(FabricError::UnknownJob(job))?;

        if gated.released < gated.results.len() {
            return Err(FabricError::Incomplete {
                job,
                completed: gated.released,
                total: gated.results.len(),
            });
        }

        let mut results = gated.results.clone();

        if self.duplicate_first_column.load(Ordering::SeqCst) && results.len() > 1 {
            let first = results.iter().find(|task| task.column_index == 0).cloned();
            let last = results.len() as u32 - 1;
            if let (Some(first), Some(slot)) = (first, results.iter_mut().find(|task| task.column_index == last)) {
                *slot = first;
            }
        }

        Ok(results)
    }

    fn cancel(&self, job: FabricJobId) {
        self.jobs.lock().unwrap().remove(&job);
        self.cancelled.lock().unwrap().push(job);
    }
}

pub struct RejectingFabric;

impl ExecutionFabric for RejectingFabric {
    fn submit_job(&self, _tasks: Vec<RenderTask>) -> Result<FabricJobId, FabricError> {
        Err(FabricError::Rejected("fabric is shutting down".to_string()))
    }

    fn query_progress(&self, job: FabricJobId) -> Result<usize, FabricError> {
        Err(FabricError::UnknownJob(job))
    }

    fn fetch_results(&self, job: FabricJobId) -> Result<Vec<CompletedTask>, FabricError> {
        Err(FabricError::UnknownJob(job))
    }

    fn cancel(&self, _job: FabricJobId) {}
}

/// Accepts every job and then loses track of it.
pub struct ForgetfulFabric;

impl ExecutionFabric for ForgetfulFabric {
    fn submit_job(&self, _tasks: Vec<RenderTask>) -> Result<FabricJobId, FabricError> {
        Ok(FabricJobId(1))
    }

    fn query_progress(&self, job: FabricJobId) -> Result<usize, FabricError> {
        Err(FabricError::UnknownJob(job))
    }

    fn fetch_results(&self, job: FabricJobId) -> Result<Vec<CompletedTask>, FabricError> {
        Err(FabricError::UnknownJob(job))
    }

    fn cancel(&self, _job: FabricJobId) {}
}

/// Presenter that panics when a render completes.
#[derive(Default)]
pub struct PanickingPresenter {
    pub reached: AtomicBool,
}

impl RenderEnginePresenterPort for PanickingPresenter {
    fn present(&self, event: RenderEvent) {
        if let RenderEvent::Complete(report) = event {
            self.reached.store(true, Ordering::SeqCst);
            panic!("presenter failed on render {}", report.generation);
        }
    }
}

/// Mandelbrot kernel that panics on one column.
pub struct PanicOnColumn(pub u32);

impl ColumnKernel for PanicOnColumn {
    fn compute(&self, task: &RenderTask, cancel: &dyn CancelToken) -> Result<Vec<Rgb>, KernelError> {
        if task.column_index == self.0 {
            panic!("lost worker for column {}", self.0);
        }
        MandelbrotKernel.compute(task, cancel)
    }
}

pub fn config(width: u32, height: u32) -> EngineConfig {
    EngineConfig::new(width, height).with_progress_interval(Duration::from_millis(1))
}

pub fn engine(
    width: u32,
    height: u32,
    fabric: Arc<dyn ExecutionFabric>,
    presenter: &Arc<RecordingPresenter>,
) -> RenderEngine {
    let port: Arc<dyn RenderEnginePresenterPort> = presenter.clone();
    RenderEngine::new(config(width, height), fabric, port).unwrap()
}

/// What a single-sample render of `viewport` must look like.
pub fn expected_image(viewport: Viewport, params: RenderParameters, width: u32, height: u32) -> Image {
    let mut image = Image::new(width, height).unwrap();

    for column_index in 0..width {
        let task = RenderTask {
            column_index,
            image_width: width,
            image_height: height,
            viewport,
            params,
            random_seed: 0,
        };
        let rows = MandelbrotKernel.compute(&task, &NeverCancel).unwrap();
        image.write_column(column_index, &rows).unwrap();
    }

    image
}
