use super::matrix::LayerTransform;
use super::{LayerCanvas, RenderFrame, RenderHook, RenderSurface};
use crate::config::CanvasOptions;
use image::RgbaImage;
use uuid::Uuid;

/// A single raster layer of a [`LayeredSurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayer {
    /// Unique identifier for the layer
    pub id: Uuid,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Container opacity, `None` when not set
    pub opacity: Option<f32>,
    /// Placement of the raster on screen
    pub transform: LayerTransform,
    pub raster: RgbaImage,
}

impl SurfaceLayer {
    pub fn new(name: &str, raster: RgbaImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            visible: true,
            opacity: None,
            transform: LayerTransform::default(),
            raster,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_transform(mut self, transform: LayerTransform) -> Self {
        self.transform = transform;
        self
    }

    fn canvas(&self) -> LayerCanvas<'_> {
        LayerCanvas {
            raster: &self.raster,
            opacity: self.opacity.map(|o| o.to_string()).unwrap_or_default(),
            transform: self.transform.to_matrix().to_string(),
        }
    }
}

/// In-memory rendering surface holding one raster per layer.
///
/// Render-complete hooks are one-shot: each fires on the first render pass
/// after it was registered and is then dropped.
pub struct LayeredSurface {
    size: [u32; 2],
    options: CanvasOptions,
    layers: Vec<SurfaceLayer>,
    pending_hooks: Vec<RenderHook>,
    render_count: u64,
}

impl std::fmt::Debug for LayeredSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSurface")
            .field("size", &self.size)
            .field("options", &self.options)
            .field("layers", &self.layers.len())
            .field("pending_hooks", &self.pending_hooks.len())
            .field("render_count", &self.render_count)
            .finish()
    }
}

impl LayeredSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, CanvasOptions::default())
    }

    pub fn with_options(width: u32, height: u32, options: CanvasOptions) -> Self {
        Self {
            size: [width, height],
            options,
            layers: Vec::new(),
            pending_hooks: Vec::new(),
            render_count: 0,
        }
    }

    pub fn options(&self) -> CanvasOptions {
        self.options
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = [width, height];
    }

    pub fn add_layer(&mut self, layer: SurfaceLayer) -> Uuid {
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    pub fn layers(&self) -> &[SurfaceLayer] {
        &self.layers
    }

    pub fn layer_mut(&mut self, id: Uuid) -> Option<&mut SurfaceLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn pending_hooks(&self) -> usize {
        self.pending_hooks.len()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Layer canvases in z-order as of now; hidden layers are not part of the DOM
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            size: self.size,
            layers: self
                .layers
                .iter()
                .filter(|layer| layer.visible)
                .map(SurfaceLayer::canvas)
                .collect(),
            options: self.options,
        }
    }
}

impl RenderSurface for LayeredSurface {
    fn once_render_complete(&mut self, hook: RenderHook) {
        self.pending_hooks.push(hook);
    }

    fn render_sync(&mut self) {
        self.render_count += 1;
        let hooks = std::mem::take(&mut self.pending_hooks);
        let frame = self.frame();
        for hook in hooks {
            hook(&frame);
        }
    }
}
