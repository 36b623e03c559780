//! Asset decoding shared by the viewer's loader and tests

use glam::Vec3;

use crate::error::AssetError;

/// Longest texture side the viewer uploads; larger panoramas are scaled down
pub const MAX_TEXTURE_SIDE: u32 = 8192;

/// Largest panorama or model the loader accepts
pub const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Buffer reserved up front for a download, whatever its declared length
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Reject a download whose declared or received size exceeds [`MAX_DOWNLOAD_BYTES`]
pub fn check_download_size(reference: &str, size: u64) -> Result<(), AssetError> {
    if size > MAX_DOWNLOAD_BYTES {
        return Err(AssetError::TooLarge {
            reference: reference.to_string(),
            limit: MAX_DOWNLOAD_BYTES,
        });
    }
    Ok(())
}

/// Initial buffer capacity for a download with the given Content-Length
pub fn preallocation(declared: Option<u64>) -> usize {
    declared.unwrap_or(0).min(MAX_PREALLOCATION) as usize
}

/// References fetched over HTTP instead of the filesystem
pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode a JPEG/PNG panorama, capping its size at [`MAX_TEXTURE_SIDE`]
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, AssetError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (width, height, rgba) = if w > MAX_TEXTURE_SIDE || h > MAX_TEXTURE_SIDE {
        let ratio = MAX_TEXTURE_SIDE as f32 / w.max(h) as f32;
        let nw = ((w as f32 * ratio) as u32).max(1);
        let nh = ((h as f32 * ratio) as u32).max(1);
        tracing::debug!("Scaling panorama {w}x{h} down to {nw}x{nh}");
        let resized =
            image::imageops::resize(&rgba, nw, nh, image::imageops::FilterType::Triangle);
        (nw, nh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(DecodedImage {
        width,
        height,
        rgba,
    })
}

/// Vertex positions of a Wavefront OBJ model; faces and the rest are ignored
pub fn parse_obj_points(reference: &str, text: &str) -> Result<Vec<Vec3>, AssetError> {
    let points: Vec<Vec3> = text
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("v "))
        .filter_map(|rest| {
            let mut coords = rest.split_whitespace().map(str::parse::<f32>);
            match (coords.next(), coords.next(), coords.next()) {
                (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Some(Vec3::new(x, y, z)),
                _ => None,
            }
        })
        .collect();

    if points.is_empty() {
        return Err(AssetError::EmptyModel(reference.to_string()));
    }
    Ok(points)
}
