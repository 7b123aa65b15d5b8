use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use log::trace;

use crate::controllers::engine::events::render::RenderEvent;
use crate::controllers::engine::ports::presenter::RenderEnginePresenterPort;
use crate::core::util::lock::lock;

/// Forwards engine events onto an mpsc channel for a consumer thread.
pub struct ChannelPresenter {
    sender: Mutex<Sender<RenderEvent>>,
}

impl ChannelPresenter {
    #[must_use]
    pub fn new() -> (Self, Receiver<RenderEvent>) {
        let (sender, receiver) = mpsc::channel();

        (
            Self {
                sender: Mutex::new(sender),
            },
            receiver,
        )
    }
}

impl RenderEnginePresenterPort for ChannelPresenter {
    fn present(&self, event: RenderEvent) {
        if lock(&self.sender).send(event).is_err() {
            trace!("render event dropped, receiver has gone away");
        }
    }
}
