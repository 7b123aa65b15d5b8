use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::controllers::engine::data::completion_report::CompletionReport;
use crate::controllers::engine::data::engine_config::EngineConfig;
use crate::controllers::engine::data::progress_update::ProgressUpdate;
use crate::controllers::engine::errors::render::{AwaitError, RenderError};
use crate::controllers::engine::events::render::RenderEvent;
use crate::controllers::engine::job_handle::JobHandle;
use crate::controllers::engine::lifecycle::JobLifecycleManager;
use crate::controllers::engine::ports::execution_fabric::ExecutionFabric;
use crate::controllers::engine::ports::presenter::RenderEnginePresenterPort;
use crate::controllers::engine::types::{EngineState, RenderRequest, RequestOrigin};
use crate::core::actions::execute_task::execute_task::panic_message;
use crate::core::data::pixel_selection::PixelSelection;
use crate::core::data::raster::Image;
use crate::core::data::render_params::RenderParameters;
use crate::core::data::render_task::{CompletedTask, TaskFailure, TaskOutcome};
use crate::core::data::viewport::Viewport;
use crate::core::data::viewport_history::ViewportHistory;
use crate::core::jobs::render_job::RenderJob;
use crate::core::util::lock::lock;

struct Session {
    history: ViewportHistory,
    current_viewport: Viewport,
    params: RenderParameters,
    live: Option<JobHandle>,
    state: EngineState,
}

struct PendingJob {
    handle: JobHandle,
    viewport: Viewport,
}

struct SharedState {
    config: EngineConfig,
    manager: JobLifecycleManager,
    image: Mutex<Image>,
    session: Mutex<Session>,
    pending: Mutex<Option<PendingJob>>,
    wake: Condvar,
    shutdown: AtomicBool,
    last_completed_generation: AtomicU64,
    presenter_port: Arc<dyn RenderEnginePresenterPort>,
}

/// Interactive render facade.
///
/// Render requests are partitioned and submitted on the calling thread and
/// return immediately. A worker thread waits for the live job, reports
/// progress and assembles the finished columns into the image. A new request
/// cancels the job in flight; only the newest job ever writes the image.
pub struct RenderEngine {
    shared: Arc<SharedState>,
    worker: Option<JoinHandle<()>>,
}

impl RenderEngine {
    pub fn new(
        config: EngineConfig,
        fabric: Arc<dyn ExecutionFabric>,
        presenter_port: Arc<dyn RenderEnginePresenterPort>,
    ) -> Result<Self, RenderError> {
        config.validate()?;

        let image = Image::new(config.image_width, config.image_height)
            .map_err(|err| RenderError::InvalidParameter(err.to_string()))?;
        let manager = JobLifecycleManager::new(fabric, config.progress_interval);

        let shared = Arc::new(SharedState {
            config,
            manager,
            image: Mutex::new(image),
            session: Mutex::new(Session {
                history: ViewportHistory::new(),
                current_viewport: Viewport::DEFAULT,
                params: RenderParameters::default(),
                live: None,
                state: EngineState::Idle,
            }),
            pending: Mutex::new(None),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            last_completed_generation: AtomicU64::new(0),
            presenter_port,
        });

        let worker_shared = Arc::clone(&shared);

        let worker = thread::spawn(move || {
            Self::worker_loop(&worker_shared);
        });

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Starts rendering `viewport`, superseding any render in flight.
    ///
    /// Returns the generation of the new job. Never waits for computation.
    pub fn render(
        &self,
        viewport: Viewport,
        params: RenderParameters,
        origin: RequestOrigin,
    ) -> Result<u64, RenderError> {
        self.submit_request(RenderRequest {
            viewport,
            params,
            origin,
        })
    }

    pub fn submit_request(&self, request: RenderRequest) -> Result<u64, RenderError> {
        let result = {
            let mut session = lock(&self.shared.session);
            Self::submit_locked(&self.shared, &mut session, request)
        };

        self.report(result)
    }

    /// Re-renders the current view, e.g. after the parameters changed.
    pub fn refresh(&self, params: RenderParameters) -> Result<u64, RenderError> {
        let result = {
            let mut session = lock(&self.shared.session);
            let request = RenderRequest {
                viewport: session.current_viewport,
                params,
                origin: RequestOrigin::Refresh,
            };
            Self::submit_locked(&self.shared, &mut session, request)
        };

        self.report(result)
    }

    /// Zooms into a drag rectangle of the current image.
    pub fn zoom_into(&self, selection: PixelSelection, params: RenderParameters) -> Result<u64, RenderError> {
        let result = {
            let mut session = lock(&self.shared.session);
            let config = &self.shared.config;

            session
                .current_viewport
                .select_pixels(selection, config.image_width, config.image_height)
                .map_err(|err| RenderError::InvalidParameter(err.to_string()))
                .and_then(|viewport| {
                    let request = RenderRequest {
                        viewport,
                        params,
                        origin: RequestOrigin::SubRegion,
                    };
                    Self::submit_locked(&self.shared, &mut session, request)
                })
        };

        self.report(result)
    }

    /// Returns to the previous view. `Ok(None)` when there is nothing to go
    /// back to; no render is started in that case.
    pub fn zoom_out(&self) -> Result<Option<u64>, RenderError> {
        let result = {
            let mut session = lock(&self.shared.session);
            let Some(viewport) = session.history.pop() else {
                return Ok(None);
            };

            let request = RenderRequest {
                viewport,
                params: session.params,
                origin: RequestOrigin::ZoomOut,
            };
            let result = Self::submit_locked(&self.shared, &mut session, request);
            if result.is_err() {
                session.history.push(viewport);
            }
            result
        };

        self.report(result).map(Some)
    }

    /// Cancels the render in flight, if any. The image keeps its last
    /// completed contents.
    ///
    /// The engine reports [`EngineState::Cancelling`] until the worker has
    /// let go of the job, then [`EngineState::Idle`].
    pub fn cancel(&self) -> bool {
        let mut session = lock(&self.shared.session);

        match session.live.take() {
            Some(live) => {
                Self::cancel_live(&self.shared, &live);
                session.state = EngineState::Cancelling;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        lock(&self.shared.session).state
    }

    #[must_use]
    pub fn current_viewport(&self) -> Viewport {
        lock(&self.shared.session).current_viewport
    }

    #[must_use]
    pub fn current_params(&self) -> RenderParameters {
        lock(&self.shared.session).params
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        lock(&self.shared.session).history.len()
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        !lock(&self.shared.session).history.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// A copy of the current image.
    #[must_use]
    pub fn image(&self) -> Image {
        lock(&self.shared.image).clone()
    }

    pub fn with_image<R>(&self, f: impl FnOnce(&Image) -> R) -> R {
        f(&lock(&self.shared.image))
    }

    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.shared
            .last_completed_generation
            .load(Ordering::Acquire)
    }

    pub fn shutdown(&mut self) {
        {
            let _pending = lock(&self.shared.pending);
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.cancel();
        self.shared.wake.notify_all();

        if let Some(handle) = self.worker.take() {
            if let Err(payload) = handle.join() {
                warn!("render worker panicked: {}", panic_message(payload.as_ref()));
            }
        }
    }

    fn submit_locked(
        shared: &SharedState,
        session: &mut Session,
        request: RenderRequest,
    ) -> Result<u64, RenderError> {
        if let Some(live) = session.live.take() {
            Self::cancel_live(shared, &live);
        }

        session.state = EngineState::Submitting;

        let config = &shared.config;
        let job = RenderJob::for_viewport(
            request.viewport,
            request.params,
            config.image_width,
            config.image_height,
            &mut rand::rng(),
        );
        let generation = shared.manager.next_generation();

        let handle = match shared.manager.submit_as(generation, job) {
            Ok(handle) => handle,
            Err(source) => {
                session.state = EngineState::Idle;
                return Err(RenderError::JobSubmission { generation, source });
            }
        };

        if request.origin == RequestOrigin::SubRegion {
            session.history.push(session.current_viewport);
        }
        session.current_viewport = request.viewport;
        session.params = request.params;
        session.live = Some(handle.clone());
        session.state = EngineState::Polling;

        *lock(&shared.pending) = Some(PendingJob {
            handle,
            viewport: request.viewport,
        });
        shared.wake.notify_one();

        Ok(generation)
    }

    fn cancel_live(shared: &SharedState, live: &JobHandle) {
        // taken so an assembly in progress finishes before the job goes stale
        let _image = lock(&shared.image);
        shared.manager.cancel(live);
    }

    fn report(&self, result: Result<u64, RenderError>) -> Result<u64, RenderError> {
        if let Err(error) = &result {
            warn!("{}", error);
            self.shared
                .presenter_port
                .present(RenderEvent::Error(error.clone()));
        }

        result
    }

    fn worker_loop(shared: &Arc<SharedState>) {
        loop {
            let pending = {
                let mut guard = lock(&shared.pending);
                loop {
                    if shared.shutdown.load(Ordering::Acquire) {
                        return;
                    }

                    if let Some(job) = guard.take() {
                        break job;
                    }

                    guard = shared
                        .wake
                        .wait(guard)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            Self::drive(shared, pending);
        }
    }

    fn drive(shared: &SharedState, pending: PendingJob) {
        if !Self::run_cycle(shared, pending) {
            Self::settle_cancelled(shared);
        }
    }

    /// Waits for and assembles one job. Returns false if the job went stale.
    fn run_cycle(shared: &SharedState, pending: PendingJob) -> bool {
        let PendingJob { handle, viewport } = pending;
        let generation = handle.generation();
        let manager = &shared.manager;

        let result = manager.await_completion_with(&handle, |progress| {
            if manager.is_live(&handle) {
                shared
                    .presenter_port
                    .present(RenderEvent::Progress(ProgressUpdate {
                        generation,
                        progress,
                    }));
            }
        });

        let completed = match result {
            Ok(completed) => completed,
            Err(AwaitError::Cancelled(_)) => {
                debug!("render {} superseded, dropping its results", generation);
                return false;
            }
            Err(AwaitError::Fabric(source)) => {
                if !Self::finish_cycle(shared, &handle) {
                    return false;
                }
                let error = RenderError::ResultCollection { generation, source };
                warn!("{}", error);
                shared.presenter_port.present(RenderEvent::Error(error));
                return true;
            }
        };

        if !Self::enter_state(shared, &handle, EngineState::Assembling) {
            return false;
        }

        let failures = {
            let mut image = lock(&shared.image);
            if !manager.is_live(&handle) {
                debug!("render {} went stale before assembly", generation);
                return false;
            }
            assemble(&mut image, completed)
        };

        if !Self::finish_cycle(shared, &handle) {
            return false;
        }

        let report = CompletionReport {
            generation,
            viewport,
            duration: handle.submitted_at().elapsed(),
            failures,
        };

        info!(
            "render {} finished in {} ms ({} failed columns)",
            generation,
            report.duration_millis(),
            report.failures.len()
        );

        shared
            .last_completed_generation
            .store(generation, Ordering::Release);
        shared.presenter_port.present(RenderEvent::Complete(report));
        true
    }

    fn settle_cancelled(shared: &SharedState) {
        let mut session = lock(&shared.session);

        if session.live.is_none() && session.state == EngineState::Cancelling {
            session.state = EngineState::Idle;
        }
    }

    fn enter_state(shared: &SharedState, handle: &JobHandle, state: EngineState) -> bool {
        let mut session = lock(&shared.session);

        if Self::owns_session(&session, handle) {
            session.state = state;
            true
        } else {
            false
        }
    }

    fn finish_cycle(shared: &SharedState, handle: &JobHandle) -> bool {
        let mut session = lock(&shared.session);

        if Self::owns_session(&session, handle) {
            session.live = None;
            session.state = EngineState::Idle;
            true
        } else {
            false
        }
    }

    fn owns_session(session: &Session, handle: &JobHandle) -> bool {
        session
            .live
            .as_ref()
            .is_some_and(|live| live.generation() == handle.generation())
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Copies finished columns into the image in column order. Failed columns
/// keep their previous pixels and are returned.
fn assemble(image: &mut Image, completed: Vec<CompletedTask>) -> Vec<TaskFailure> {
    let mut failures = Vec::new();

    for task in completed {
        let column = task.column_index;

        match task.outcome {
            TaskOutcome::Completed(rows) => {
                if let Err(err) = image.write_column(column, &rows) {
                    failures.push(TaskFailure::Assembly {
                        column,
                        message: err.to_string(),
                    });
                }
            }
            TaskOutcome::Failed(failure) => failures.push(failure),
        }
    }

    for failure in &failures {
        warn!("{}", failure);
    }

    failures
}
