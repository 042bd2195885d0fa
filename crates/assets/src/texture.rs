use std::path::Path;

use crate::AssetError;

/// Decoded image data, always RGBA8 regardless of the source format.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an image file into RGBA8 pixel data.
///
/// The baked lighting image carries precomputed light, so it is sampled
/// as-is by an unlit shader; no color grading happens here. UVs follow the
/// glTF convention, so no vertical flip is applied either.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    let reader = image::ImageReader::open(path)?;
    let decoded = reader.decode()?;
    let rgba = decoded.to_rgba8();

    tracing::debug!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        "texture decoded"
    );

    Ok(TextureData {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_to_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baked.png");
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        img.save(&path).unwrap();

        let tex = load_texture(&path).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.pixels.len(), 3 * 2 * 4);
        assert_eq!(&tex.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_texture("/nonexistent/baked.jpg"),
            Err(AssetError::Io(_))
        ));
    }
}
