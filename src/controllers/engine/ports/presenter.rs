use crate::controllers::engine::events::render::RenderEvent;

/// Receives progress, completion and error events. Called from the engine's
/// worker thread as well as from the thread that issued a render request.
pub trait RenderEnginePresenterPort: Send + Sync {
    fn present(&self, event: RenderEvent);
}
