//! Minimal glTF 2.0 reader for the portal scene.
//!
//! Parses the glTF JSON with `serde_json` and reads vertex data out of the
//! external binary buffer. Only what the portal document uses is supported:
//! float positions/UVs, u8/u16/u32 indices, tightly packed buffer views.
//! Documents that require the Draco mesh-compression extension are rejected;
//! no decoder ships with the viewer.

use std::path::Path;

use serde_json::Value;

use crate::AssetError;

const COMPONENT_F32: u64 = 5126;
const COMPONENT_U8: u64 = 5121;
const COMPONENT_U16: u64 = 5123;
const COMPONENT_U32: u64 = 5125;

const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Geometry for one named mesh: positions, UVs, and triangle indices.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// A parsed glTF document with its binary buffers resolved into memory.
#[derive(Debug)]
pub struct GltfDocument {
    json: Value,
    buffers: Vec<Vec<u8>>,
}

impl GltfDocument {
    /// Parse a `.gltf` file and read its external buffers from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let json: Value =
            serde_json::from_str(&data).map_err(|e| AssetError::GltfParse(e.to_string()))?;

        if let Some(required) = json.get("extensionsRequired").and_then(|v| v.as_array()) {
            if required.iter().any(|e| e.as_str() == Some(DRACO_EXTENSION)) {
                return Err(AssetError::GltfParse(format!(
                    "document requires {DRACO_EXTENSION}; no decoder is available"
                )));
            }
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut buffers = Vec::new();
        if let Some(buffer_defs) = json.get("buffers").and_then(|v| v.as_array()) {
            for (i, def) in buffer_defs.iter().enumerate() {
                let uri = def
                    .get("uri")
                    .and_then(|u| u.as_str())
                    .ok_or_else(|| AssetError::BufferMissing(format!("buffer {i} has no uri")))?;
                if uri.starts_with("data:") {
                    return Err(AssetError::GltfParse(format!(
                        "buffer {i} is embedded; only external buffers are supported"
                    )));
                }
                let buffer_path = base_dir.join(uri);
                let bytes = std::fs::read(&buffer_path).map_err(|e| {
                    AssetError::BufferMissing(format!("{}: {e}", buffer_path.display()))
                })?;
                buffers.push(bytes);
            }
        }

        tracing::debug!(buffers = buffers.len(), "glTF document parsed");
        Ok(Self { json, buffers })
    }

    /// Extract geometry for the mesh attached to the node with this name.
    ///
    /// Falls back to matching the mesh's own name when no node matches,
    /// since exporters differ on where the name lands.
    pub fn mesh_by_name(&self, name: &str) -> Result<MeshData, AssetError> {
        let meshes = self
            .json
            .get("meshes")
            .and_then(|m| m.as_array())
            .ok_or_else(|| AssetError::GltfParse("document has no meshes".into()))?;

        let mesh_index = self
            .node_mesh_index(name)
            .or_else(|| {
                meshes
                    .iter()
                    .position(|m| m.get("name").and_then(|n| n.as_str()) == Some(name))
            })
            .ok_or_else(|| AssetError::MeshNotFound(name.to_string()))?;

        let mesh = meshes
            .get(mesh_index)
            .ok_or_else(|| AssetError::GltfParse(format!("mesh index {mesh_index} out of range")))?;

        let primitive = mesh
            .get("primitives")
            .and_then(|p| p.as_array())
            .and_then(|p| p.first())
            .ok_or_else(|| {
                AssetError::UnsupportedPrimitive(format!("mesh {name:?} has no primitives"))
            })?;

        let attributes = primitive.get("attributes").ok_or_else(|| {
            AssetError::UnsupportedPrimitive(format!("mesh {name:?} has no attributes"))
        })?;

        let position_accessor = attributes
            .get("POSITION")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                AssetError::UnsupportedPrimitive(format!("mesh {name:?} has no POSITION attribute"))
            })?;
        let positions = self.read_vec3(position_accessor as usize)?;

        // UVs are optional; the pole lights are flat-shaded.
        let uvs = match attributes.get("TEXCOORD_0").and_then(|v| v.as_u64()) {
            Some(accessor) => self.read_vec2(accessor as usize)?,
            None => vec![[0.0, 0.0]; positions.len()],
        };

        let indices = match primitive.get("indices").and_then(|v| v.as_u64()) {
            Some(accessor) => self.read_indices(accessor as usize)?,
            None => (0..positions.len() as u32).collect(),
        };

        Ok(MeshData {
            name: name.to_string(),
            positions,
            uvs,
            indices,
        })
    }

    fn node_mesh_index(&self, name: &str) -> Option<usize> {
        let nodes = self.json.get("nodes")?.as_array()?;
        nodes
            .iter()
            .find(|n| n.get("name").and_then(|v| v.as_str()) == Some(name))
            .and_then(|n| n.get("mesh"))
            .and_then(|m| m.as_u64())
            .map(|m| m as usize)
    }

    fn read_vec3(&self, accessor: usize) -> Result<Vec<[f32; 3]>, AssetError> {
        let (bytes, count) = self.accessor_bytes(accessor, "VEC3", COMPONENT_F32, 12)?;
        let mut out = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(12).take(count) {
            out.push([
                f32::from_le_bytes(chunk[0..4].try_into().unwrap()),
                f32::from_le_bytes(chunk[4..8].try_into().unwrap()),
                f32::from_le_bytes(chunk[8..12].try_into().unwrap()),
            ]);
        }
        Ok(out)
    }

    fn read_vec2(&self, accessor: usize) -> Result<Vec<[f32; 2]>, AssetError> {
        let (bytes, count) = self.accessor_bytes(accessor, "VEC2", COMPONENT_F32, 8)?;
        let mut out = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(8).take(count) {
            out.push([
                f32::from_le_bytes(chunk[0..4].try_into().unwrap()),
                f32::from_le_bytes(chunk[4..8].try_into().unwrap()),
            ]);
        }
        Ok(out)
    }

    fn read_indices(&self, accessor: usize) -> Result<Vec<u32>, AssetError> {
        let def = self.accessor(accessor)?;
        let component_type = def
            .get("componentType")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                AssetError::GltfParse(format!("accessor {accessor} has no componentType"))
            })?;

        let element_size = match component_type {
            COMPONENT_U8 => 1,
            COMPONENT_U16 => 2,
            COMPONENT_U32 => 4,
            other => {
                return Err(AssetError::UnsupportedPrimitive(format!(
                    "index component type {other} is not supported"
                )));
            }
        };

        let (bytes, count) = self.accessor_bytes(accessor, "SCALAR", component_type, element_size)?;
        let mut out = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(element_size).take(count) {
            out.push(match component_type {
                COMPONENT_U8 => chunk[0] as u32,
                COMPONENT_U16 => u16::from_le_bytes(chunk.try_into().unwrap()) as u32,
                _ => u32::from_le_bytes(chunk.try_into().unwrap()),
            });
        }
        Ok(out)
    }

    fn accessor(&self, index: usize) -> Result<&Value, AssetError> {
        self.json
            .get("accessors")
            .and_then(|a| a.as_array())
            .and_then(|a| a.get(index))
            .ok_or_else(|| AssetError::GltfParse(format!("accessor {index} not found")))
    }

    /// Resolve an accessor to its byte slice and element count, validating
    /// the expected element type and component type.
    fn accessor_bytes(
        &self,
        index: usize,
        expected_type: &str,
        expected_component: u64,
        element_size: usize,
    ) -> Result<(&[u8], usize), AssetError> {
        let def = self.accessor(index)?;

        let element_type = def.get("type").and_then(|v| v.as_str()).unwrap_or("");
        let component_type = def.get("componentType").and_then(|v| v.as_u64()).unwrap_or(0);
        if element_type != expected_type || component_type != expected_component {
            return Err(AssetError::UnsupportedPrimitive(format!(
                "accessor {index} is {element_type}/{component_type}, expected {expected_type}/{expected_component}"
            )));
        }

        let count = def.get("count").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let accessor_offset = def.get("byteOffset").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let view_index = def
            .get("bufferView")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| AssetError::GltfParse(format!("accessor {index} has no bufferView")))?
            as usize;

        let view = self
            .json
            .get("bufferViews")
            .and_then(|v| v.as_array())
            .and_then(|v| v.get(view_index))
            .ok_or_else(|| AssetError::GltfParse(format!("bufferView {view_index} not found")))?;

        if let Some(stride) = view.get("byteStride").and_then(|v| v.as_u64()) {
            if stride as usize != element_size {
                return Err(AssetError::UnsupportedPrimitive(format!(
                    "bufferView {view_index} is interleaved (stride {stride})"
                )));
            }
        }

        let buffer_index = view.get("buffer").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let view_offset = view.get("byteOffset").and_then(|v| v.as_u64()).unwrap_or(0) as usize;

        let buffer = self.buffers.get(buffer_index).ok_or_else(|| {
            AssetError::BufferMissing(format!("buffer {buffer_index} not loaded"))
        })?;

        // Offsets and count come straight from the file; overflow here must
        // not wrap past the length check below.
        let start = view_offset
            .checked_add(accessor_offset)
            .ok_or_else(|| AssetError::GltfParse(format!("accessor {index} offset overflows")))?;
        let end = count
            .checked_mul(element_size)
            .and_then(|len| start.checked_add(len))
            .ok_or_else(|| AssetError::GltfParse(format!("accessor {index} extent overflows")))?;
        if end > buffer.len() {
            return Err(AssetError::GltfParse(format!(
                "accessor {index} reads past the end of buffer {buffer_index}"
            )));
        }

        Ok((&buffer[start..end], count))
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::path::Path;

    use serde_json::json;

    /// Write `portal.gltf` plus `portal.bin` containing one unit quad per
    /// named mesh (4 vertices, 6 indices each).
    pub fn write_portal_fixture(dir: &Path, mesh_names: &[&str]) {
        let mut bin: Vec<u8> = Vec::new();

        let positions: [[f32; 3]; 4] = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let uvs: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];

        let pos_offset = bin.len();
        for p in positions {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let uv_offset = bin.len();
        for uv in uvs {
            for c in uv {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let index_offset = bin.len();
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }

        let views = json!([
            { "buffer": 0, "byteOffset": pos_offset, "byteLength": 48 },
            { "buffer": 0, "byteOffset": uv_offset, "byteLength": 32 },
            { "buffer": 0, "byteOffset": index_offset, "byteLength": 12 },
        ]);
        let accessors = json!([
            { "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3" },
            { "bufferView": 1, "componentType": 5126, "count": 4, "type": "VEC2" },
            { "bufferView": 2, "componentType": 5123, "count": 6, "type": "SCALAR" },
        ]);

        let meshes: Vec<_> = mesh_names
            .iter()
            .map(|name| {
                json!({
                    "name": name,
                    "primitives": [{
                        "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
                        "indices": 2,
                    }],
                })
            })
            .collect();
        let nodes: Vec<_> = mesh_names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "name": name, "mesh": i }))
            .collect();

        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "uri": "portal.bin", "byteLength": bin.len() }],
            "bufferViews": views,
            "accessors": accessors,
            "meshes": meshes,
            "nodes": nodes,
            "scenes": [{ "nodes": (0..mesh_names.len()).collect::<Vec<_>>() }],
        });

        std::fs::write(dir.join("portal.bin"), &bin).unwrap();
        std::fs::write(
            dir.join("portal.gltf"),
            serde_json::to_string_pretty(&document).unwrap(),
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::write_portal_fixture;
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_named_meshes() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(dir.path(), &["baked", "portalLight"]);

        let doc = GltfDocument::load(dir.path().join("portal.gltf")).unwrap();
        let mesh = doc.mesh_by_name("portalLight").unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.uvs.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn unknown_name_is_mesh_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(dir.path(), &["baked"]);

        let doc = GltfDocument::load(dir.path().join("portal.gltf")).unwrap();
        let err = doc.mesh_by_name("portalLightB").unwrap_err();
        assert!(matches!(err, AssetError::MeshNotFound(name) if name == "portalLightB"));
    }

    #[test]
    fn missing_buffer_file_is_buffer_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_portal_fixture(dir.path(), &["baked"]);
        std::fs::remove_file(dir.path().join("portal.bin")).unwrap();

        let err = GltfDocument::load(dir.path().join("portal.gltf")).unwrap_err();
        assert!(matches!(err, AssetError::BufferMissing(_)));
    }

    #[test]
    fn primitive_without_positions_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [],
            "meshes": [{ "name": "baked", "primitives": [{ "attributes": {} }] }],
            "nodes": [{ "name": "baked", "mesh": 0 }],
        });
        std::fs::write(
            dir.path().join("portal.gltf"),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();

        let doc = GltfDocument::load(dir.path().join("portal.gltf")).unwrap();
        assert!(matches!(
            doc.mesh_by_name("baked"),
            Err(AssetError::UnsupportedPrimitive(_))
        ));
    }

    #[test]
    fn draco_documents_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let document = json!({
            "asset": { "version": "2.0" },
            "extensionsRequired": ["KHR_draco_mesh_compression"],
            "buffers": [],
        });
        std::fs::write(
            dir.path().join("portal.gltf"),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();

        let err = GltfDocument::load(dir.path().join("portal.gltf")).unwrap_err();
        assert!(matches!(err, AssetError::GltfParse(msg) if msg.contains("draco")));
    }

    #[test]
    fn huge_accessor_count_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "uri": "portal.bin", "byteLength": 4 }],
            "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 4 }],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": u64::MAX,
                "type": "VEC3",
            }],
            "meshes": [{ "name": "baked", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "nodes": [{ "name": "baked", "mesh": 0 }],
        });
        std::fs::write(
            dir.path().join("portal.gltf"),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("portal.bin"), [0u8; 4]).unwrap();

        let doc = GltfDocument::load(dir.path().join("portal.gltf")).unwrap();
        // count * element_size would wrap; it must surface as an error, not
        // slip past the bounds check.
        assert!(matches!(
            doc.mesh_by_name("baked"),
            Err(AssetError::GltfParse(_))
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("portal.gltf"), "{not json").unwrap();
        assert!(matches!(
            GltfDocument::load(dir.path().join("portal.gltf")),
            Err(AssetError::GltfParse(_))
        ));
    }
}
