//! Asset loading for the portal scene.
//!
//! The scene ships as two fixed files: a baked lighting image and a glTF
//! document with one external binary buffer. The renderer consumes decoded
//! pixel data and extracted mesh data, never raw files.
//!
//! # Invariants
//! - Loading never touches GPU state; everything here is plain CPU data.
//! - The four named meshes are required; a missing name fails the whole
//!   load with [`AssetError::MeshNotFound`] so the caller can log it and
//!   keep rendering the procedural parts of the scene.

mod gltf;
mod texture;

use std::path::Path;

pub use gltf::{GltfDocument, MeshData};
pub use texture::TextureData;

/// Node names the loader expects inside the portal glTF document.
pub const BAKED_MESH: &str = "baked";
pub const PORTAL_LIGHT_MESH: &str = "portalLight";
pub const POLE_LIGHT_A_MESH: &str = "portalLightA";
pub const POLE_LIGHT_B_MESH: &str = "portalLightB";

/// File names resolved relative to the asset directory.
const BAKED_TEXTURE_FILE: &str = "baked.jpg";
const PORTAL_MODEL_FILE: &str = "portal.gltf";

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("glTF buffer missing: {0}")]
    BufferMissing(String),
    #[error("mesh not found in document: {0:?}")]
    MeshNotFound(String),
    #[error("unsupported primitive: {0}")]
    UnsupportedPrimitive(String),
}

/// The fully loaded portal scene: baked texture plus the four named meshes.
#[derive(Debug, Clone)]
pub struct PortalModel {
    pub baked_texture: TextureData,
    pub baked: MeshData,
    pub portal_light: MeshData,
    pub pole_light_a: MeshData,
    pub pole_light_b: MeshData,
}

/// Load the portal scene from an asset directory.
///
/// Expects `baked.jpg` and `portal.gltf` (with its sibling binary buffer)
/// inside `dir`. Intended to run off the main thread; the result is sent
/// back over a channel and attached whenever it arrives.
pub fn load_portal_model(dir: impl AsRef<Path>) -> Result<PortalModel, AssetError> {
    let dir = dir.as_ref();

    let baked_texture = texture::load_texture(dir.join(BAKED_TEXTURE_FILE))?;
    let document = GltfDocument::load(dir.join(PORTAL_MODEL_FILE))?;

    let model = PortalModel {
        baked: document.mesh_by_name(BAKED_MESH)?,
        portal_light: document.mesh_by_name(PORTAL_LIGHT_MESH)?,
        pole_light_a: document.mesh_by_name(POLE_LIGHT_A_MESH)?,
        pole_light_b: document.mesh_by_name(POLE_LIGHT_B_MESH)?,
        baked_texture,
    };

    tracing::info!(
        baked_vertices = model.baked.positions.len(),
        portal_vertices = model.portal_light.positions.len(),
        texture_width = model.baked_texture.width,
        texture_height = model.baked_texture.height,
        "portal model loaded"
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf::test_fixtures::write_portal_fixture;

    #[test]
    fn load_full_model_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(
            dir.path(),
            &[
                BAKED_MESH,
                PORTAL_LIGHT_MESH,
                POLE_LIGHT_A_MESH,
                POLE_LIGHT_B_MESH,
            ],
        );
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 80, 60]));
        img.save(dir.path().join(BAKED_TEXTURE_FILE)).unwrap();

        let model = load_portal_model(dir.path()).unwrap();
        assert_eq!(model.baked.name, BAKED_MESH);
        assert_eq!(model.portal_light.indices.len(), 6);
        assert_eq!(model.baked_texture.width, 4);
        // RGBA8 output regardless of source format
        assert_eq!(model.baked_texture.pixels.len(), 4 * 4 * 4);
    }

    #[test]
    fn missing_portal_light_is_mesh_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(
            dir.path(),
            &[BAKED_MESH, POLE_LIGHT_A_MESH, POLE_LIGHT_B_MESH],
        );
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        img.save(dir.path().join(BAKED_TEXTURE_FILE)).unwrap();

        let err = load_portal_model(dir.path()).unwrap_err();
        assert!(matches!(err, AssetError::MeshNotFound(name) if name == PORTAL_LIGHT_MESH));
    }

    #[test]
    fn missing_texture_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(dir.path(), &[BAKED_MESH]);
        assert!(matches!(
            load_portal_model(dir.path()),
            Err(AssetError::Io(_))
        ));
    }
}
