use crate::controllers::engine::data::completion_report::CompletionReport;
use crate::controllers::engine::data::progress_update::ProgressUpdate;
use crate::controllers::engine::errors::render::RenderError;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Progress(ProgressUpdate),
    Complete(CompletionReport),
    Error(RenderError),
}

impl RenderEvent {
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Progress(update) => Some(update.generation),
            Self::Complete(report) => Some(report.generation),
            Self::Error(error) => error.generation(),
        }
    }
}
