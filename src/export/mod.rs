//! Map snapshot export.
//!
//! The rendering surface owns one raster per layer, each shown on screen under
//! its own CSS transform and container opacity. Exporting waits for the next
//! completed render pass, flattens those rasters into one image of the map's
//! pixel size, encodes it as PNG and hands the bytes to a [`BlobSaver`].

mod composite;
mod matrix;
mod surface;

pub use composite::{composite_layers, encode_png, parse_opacity};
pub use matrix::{CssMatrix, LayerTransform, TransformParseError};
pub use surface::{LayeredSurface, SurfaceLayer};

use crate::config::{CanvasOptions, ExportConfig};
use futures::channel::oneshot;
use image::RgbaImage;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// File name used when no other is configured
pub const DEFAULT_FILE_NAME: &str = "map.png";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Layer {layer} has an unusable transform {value:?}: {reason}")]
    InvalidTransform {
        layer: usize,
        value: String,
        #[source]
        reason: TransformParseError,
    },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to save image: {0}")]
    Save(#[from] std::io::Error),

    #[error("Export was cancelled before the render pass completed")]
    Cancelled,
}

/// One layer's backing raster as seen at the end of a render pass
#[derive(Debug, Clone)]
pub struct LayerCanvas<'a> {
    pub raster: &'a RgbaImage,
    /// CSS opacity of the layer container, empty when unset
    pub opacity: String,
    /// CSS transform of the canvas element, `matrix(a, b, c, d, e, f)`
    pub transform: String,
}

/// Snapshot handed to render-complete hooks
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    /// Map size in pixels at the end of the pass; the export is this size
    pub size: [u32; 2],
    /// Layer rasters in z-order, bottom first
    pub layers: Vec<LayerCanvas<'a>>,
    pub options: CanvasOptions,
}

/// Hook run once after the next completed render pass
pub type RenderHook = Box<dyn FnOnce(&RenderFrame<'_>)>;

/// Rendering surface the map draws into
pub trait RenderSurface {
    /// Run `hook` once, after the next completed render pass
    fn once_render_complete(&mut self, hook: RenderHook);

    /// Render immediately, completing a render pass
    fn render_sync(&mut self);
}

/// Persists an encoded image as a user-downloadable file
pub trait BlobSaver {
    fn save(&mut self, blob: &[u8], file_name: &str) -> Result<(), ExportError>;
}

/// Saves blobs as files in a directory
#[derive(Debug, Clone)]
pub struct FileSaver {
    output_dir: PathBuf,
}

impl FileSaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl BlobSaver for FileSaver {
    fn save(&mut self, blob: &[u8], file_name: &str) -> Result<(), ExportError> {
        fs::create_dir_all(&self.output_dir)?;
        fs::write(self.output_dir.join(file_name), blob)?;
        Ok(())
    }
}

/// What a successful export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub size: [u32; 2],
    pub bytes: usize,
}

/// Result of an export that completes on a later render pass
#[derive(Debug)]
pub struct PendingExport {
    receiver: oneshot::Receiver<Result<ExportOutcome, ExportError>>,
}

impl PendingExport {
    /// Poll without blocking; `None` while the render pass has not completed
    pub fn try_result(&mut self) -> Option<Result<ExportOutcome, ExportError>> {
        match self.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::Canceled) => Some(Err(ExportError::Cancelled)),
        }
    }

    /// Wait for the render pass and the export to finish
    pub async fn wait(self) -> Result<ExportOutcome, ExportError> {
        self.receiver.await.unwrap_or(Err(ExportError::Cancelled))
    }
}

/// Flatten, encode and save the layers of a completed render pass
pub fn export_frame(
    frame: &RenderFrame<'_>,
    saver: &mut dyn BlobSaver,
    file_name: &str,
) -> Result<ExportOutcome, ExportError> {
    let image = composite_layers(frame)?;
    let png = encode_png(&image)?;
    saver.save(&png, file_name)?;
    Ok(ExportOutcome {
        file_name: file_name.to_owned(),
        size: frame.size,
        bytes: png.len(),
    })
}

/// Export the map as a PNG on its next render pass.
///
/// Forces a synchronous render so the pass happens even when nothing else
/// would trigger one. Failures are logged and reported through the returned
/// [`PendingExport`]; no file is written for a failed export.
pub fn download_map(
    surface: &mut dyn RenderSurface,
    mut saver: impl BlobSaver + 'static,
    file_name: &str,
) -> PendingExport {
    let (sender, receiver) = oneshot::channel();
    let file_name = file_name.to_owned();

    let hook: RenderHook = Box::new(move |frame: &RenderFrame<'_>| {
        let result = export_frame(frame, &mut saver, &file_name);
        match &result {
            Ok(outcome) => log::info!(
                "Exported {}x{} map to {} ({} bytes)",
                outcome.size[0],
                outcome.size[1],
                outcome.file_name,
                outcome.bytes
            ),
            Err(err) => log::error!("Map export failed: {}", err),
        }
        // The caller may have dropped the pending handle
        let _ = sender.send(result);
    });

    surface.once_render_complete(hook);
    surface.render_sync();
    PendingExport { receiver }
}

/// Export to the configured directory and file name
pub fn download_map_with_config(
    surface: &mut dyn RenderSurface,
    config: &ExportConfig,
) -> PendingExport {
    download_map(
        surface,
        FileSaver::new(config.output_dir.clone()),
        &config.file_name,
    )
}
