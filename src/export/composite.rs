use super::matrix::CssMatrix;
use super::{ExportError, LayerCanvas, RenderFrame};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tiny_skia::{BlendMode, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Compositing alpha from a layer container's CSS opacity; an empty value means fully opaque
pub fn parse_opacity(value: &str) -> f32 {
    let value = value.trim();
    if value.is_empty() {
        return 1.0;
    }
    match value.parse::<f32>() {
        Ok(opacity) if opacity.is_finite() => opacity.clamp(0.0, 1.0),
        _ => {
            log::warn!("Ignoring unparsable layer opacity {:?}", value);
            1.0
        }
    }
}

/// Flatten every non-empty layer of `frame` into one raster of the frame's size.
///
/// Layers are drawn in order, each under its own transform and opacity, with
/// bilinear image smoothing. Any transform that does not parse aborts the
/// whole composite.
pub fn composite_layers(frame: &RenderFrame<'_>) -> Result<RgbaImage, ExportError> {
    let [width, height] = frame.size;
    let Some(mut output) = Pixmap::new(width, height) else {
        return Ok(RgbaImage::new(width, height));
    };

    for (index, layer) in frame.layers.iter().enumerate() {
        if layer.raster.width() == 0 {
            continue;
        }

        let opacity = parse_opacity(&layer.opacity);
        let matrix =
            CssMatrix::parse(&layer.transform).map_err(|reason| ExportError::InvalidTransform {
                layer: index,
                value: layer.transform.clone(),
                reason,
            })?;

        draw_layer(&mut output, layer, matrix.to_transform(), opacity);
    }

    Ok(to_rgba_image(&output))
}

/// Encode a raster as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn draw_layer(output: &mut Pixmap, layer: &LayerCanvas<'_>, transform: Transform, opacity: f32) {
    // A singular transform collapses the layer to nothing visible
    if transform.invert().is_none() {
        log::debug!("Skipping layer with singular transform {:?}", layer.transform);
        return;
    }
    let Some(source) = to_pixmap(layer.raster) else {
        return;
    };

    let paint = PixmapPaint {
        opacity,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    output.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
}

/// Premultiplied copy of a straight-alpha raster
fn to_pixmap(raster: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(raster.width(), raster.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(raster.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}
