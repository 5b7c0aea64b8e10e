use crate::document::Document;
use crate::error::EditorResult;
use crate::image::PixelBuffer;
use crate::surface::DrawingSurface;
use egui::{Pos2, Vec2};
use std::path::Path;

/// Name offered for the exported download
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Encodes the composite of all visible layers as PNG
pub fn export_png(document: &Document) -> EditorResult<Vec<u8>> {
    let bytes = document.composite().to_encoded_bytes()?;
    log::info!(
        "Exported {}x{} composite ({} bytes)",
        document.width(),
        document.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// Check if a path looks like a raster image based on its extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| {
            matches!(
                ext.as_str(),
                "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"
            )
        })
}

/// Scales `width x height` down to fit a `max x max` box, preserving aspect.
/// Sizes that already fit are returned unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> Vec2 {
    let (w, h, max) = (width as f32, height as f32, max as f32);
    if w <= max && h <= max {
        return Vec2::new(w, h);
    }
    if w > h {
        Vec2::new(max, h / w * max)
    } else {
        Vec2::new(w / h * max, max)
    }
}

/// Draws `image` onto the current layer, fitted into the import box and centred
pub fn place_image(document: &mut Document, image: &PixelBuffer, max_size: u32) {
    let size = fit_within(image.width(), image.height(), max_size);
    let position = Pos2::new(
        (document.width() as f32 - size.x) / 2.0,
        (document.height() as f32 - size.y) / 2.0,
    );
    log::info!(
        "Placing {}x{} image at {:?} as {:?}",
        image.width(),
        image.height(),
        position,
        size
    );
    document
        .current_layer_mut()
        .buffer_mut()
        .blit_image(image, position, size);
}

/// Resizes every layer to the image and draws it onto the current layer
pub fn open_image(document: &mut Document, image: PixelBuffer) -> EditorResult<()> {
    document.resize_all(image.width(), image.height())?;
    document.current_layer_mut().buffer_mut().replace_with(image)?;
    Ok(())
}
