use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::error::{DaybreakError, DaybreakResult};

/// In-memory raster being composited: straight-alpha RGBA8.
pub type Canvas = image::RgbaImage;

/// Decode provider bytes (JPEG, PNG, WebP, ...) into a [`Canvas`].
pub fn decode_canvas(bytes: &[u8]) -> DaybreakResult<Canvas> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let canvas = dyn_img.to_rgba8();
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(DaybreakError::composition("decoded image has zero size"));
    }
    Ok(canvas)
}

/// Read and decode an image file.
pub fn load_canvas(path: &Path) -> DaybreakResult<Canvas> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_canvas(&bytes)
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &Canvas) -> DaybreakResult<Vec<u8>> {
    let mut buf = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Convert straight RGBA8 to premultiplied RGBA8 in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back to straight RGBA8 in place.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
