use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::adapters::fabric::rayon_fabric::RayonFabric;
use crate::controllers::engine::data::completion_report::CompletionReport;
use crate::controllers::engine::data::engine_config::EngineConfig;
use crate::controllers::engine::engine::RenderEngine;
use crate::controllers::engine::errors::render::RenderError;
use crate::controllers::engine::events::render::RenderEvent;
use crate::controllers::engine::ports::execution_fabric::FabricError;
use crate::controllers::engine::types::RequestOrigin;
use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::core::data::pixel_selection::PixelSelection;
use crate::core::data::render_params::RenderParameters;
use crate::core::data::viewport::Viewport;
use crate::presenters::channel::channel_presenter::ChannelPresenter;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fabric(#[from] FabricError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Output(#[from] FilePresenterError),
    #[error("render engine stopped before generation {0} finished")]
    Disconnected(u64),
}

/// Drives the engine synchronously: every call waits for its render to
/// finish before returning.
pub struct CliController<P: FilePresenterPort> {
    presenter: P,
    engine: RenderEngine,
    events: Receiver<RenderEvent>,
}

impl<P: FilePresenterPort> CliController<P> {
    pub fn new(presenter: P, config: EngineConfig, threads: usize) -> Result<Self, CliError> {
        let fabric = Arc::new(RayonFabric::new(threads)?);
        let (channel, events) = ChannelPresenter::new();
        let engine = RenderEngine::new(config, fabric, Arc::new(channel))?;

        Ok(Self {
            presenter,
            engine,
            events,
        })
    }

    pub fn render(&self, viewport: Viewport, params: RenderParameters) -> Result<CompletionReport, CliError> {
        info!(
            "rendering {}x{} at {:?} ({} iterations, {} samples)",
            self.engine.config().image_width,
            self.engine.config().image_height,
            viewport,
            params.max_iterations(),
            params.super_samples()
        );

        let generation = self.engine.render(viewport, params, RequestOrigin::Refresh)?;
        self.wait_for(generation)
    }

    pub fn zoom(&self, selection: PixelSelection) -> Result<CompletionReport, CliError> {
        let params = self.engine.current_params();
        let generation = self.engine.zoom_into(selection, params)?;

        info!("zooming into {:?}", self.engine.current_viewport());

        self.wait_for(generation)
    }

    pub fn zoom_out(&self) -> Result<Option<CompletionReport>, CliError> {
        match self.engine.zoom_out()? {
            Some(generation) => self.wait_for(generation).map(Some),
            None => Ok(None),
        }
    }

    pub fn write(&self, filepath: impl AsRef<Path>) -> Result<(), CliError> {
        self.engine
            .with_image(|image| self.presenter.present(image, filepath.as_ref()))?;

        Ok(())
    }

    #[must_use]
    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    fn wait_for(&self, generation: u64) -> Result<CompletionReport, CliError> {
        for event in &self.events {
            if event.generation() != Some(generation) {
                continue;
            }

            match event {
                RenderEvent::Progress(update) => {
                    debug!("render {}: {:.0}%", generation, update.fraction() * 100.0);
                }
                RenderEvent::Complete(report) => {
                    info!(
                        "render {} done in {} ms, {} failed columns",
                        generation,
                        report.duration_millis(),
                        report.failures.len()
                    );
                    return Ok(report);
                }
                RenderEvent::Error(error) => return Err(error.into()),
            }
        }

        Err(CliError::Disconnected(generation))
    }
}
