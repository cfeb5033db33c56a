use std::io::Cursor;
use std::path::Path;

use crate::foundation::error::{VnframeError, VnframeResult};
use crate::render::backend::FrameRGBA;

/// Encode `frame` as PNG bytes (straight alpha).
pub fn encode_png(frame: &FrameRGBA) -> VnframeResult<Vec<u8>> {
    let rgba = frame.to_straight_rgba8()?;
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| VnframeError::render("frame buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| VnframeError::render(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Write `frame` to `path` as PNG, creating parent directories.
pub fn save_png(path: impl AsRef<Path>, frame: &FrameRGBA) -> VnframeResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            VnframeError::render(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    let rgba = frame.to_straight_rgba8()?;
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| VnframeError::render(format!("write png '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), "wrote frame");
    Ok(())
}

/// Download name for a frame: `{speaker, lowercased}_dialogue_screen.png`.
pub fn export_file_name(speaker: &str) -> String {
    format!("{}_dialogue_screen.png", speaker.to_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/export.rs"]
mod tests;
