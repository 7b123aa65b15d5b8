//! Request and state types shared between the engine and its callers.

use crate::core::data::render_params::RenderParameters;
use crate::core::data::viewport::Viewport;

/// Where a render request came from. Decides whether the view being left
/// is remembered for zooming out.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Re-render of the current view, e.g. after changing parameters.
    Refresh,
    /// The user selected a region; the previous view is pushed on the history.
    SubRegion,
    /// A view popped off the history; nothing is pushed.
    ZoomOut,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderRequest {
    pub viewport: Viewport,
    pub params: RenderParameters,
    pub origin: RequestOrigin,
}

/// Engine render-cycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Submitting,
    Polling,
    Assembling,
    /// A render was cancelled and the worker has not yet let go of it.
    Cancelling,
}
