use std::io::Cursor;

use crate::{
    foundation::error::{TileError, TileResult},
    render::tile::FrameRGBA,
};

/// Encode a rendered frame as a straight-alpha RGBA8 PNG.
///
/// Failures are deterministic for a given frame, so callers report them instead of retrying.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn encode_png(frame: &FrameRGBA) -> TileResult<Vec<u8>> {
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba).ok_or_else(|| {
        TileError::encode(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        ))
    })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| TileError::encode(format!("png: {e}")))?;
    Ok(buf)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}
