//! Binary glTF (GLB) container support.
//!
//! # Layout
//!
//! ```text
//! UINT32  magic   "glTF"
//! UINT32  version 2
//! UINT32  total length in bytes
//! chunk   JSON    (padded to 4 bytes with spaces)
//! chunk   BIN     (optional, padded to 4 bytes with zeros)
//!
//! chunk:  UINT32 length, UINT32 type, payload
//! ```
//!
//! The writer emits one mesh and one node per solid, all parented to a
//! `Root` node. Materials are shared between solids of the same color.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::color::{Rgba, color_factor};
use crate::error::{SceneError, SceneResult};
use crate::scene::Scene3D;
use crate::solid::BoxMesh;

/// GLB magic, `glTF` in little-endian.
pub const GLB_MAGIC: u32 = 0x4654_6C67;

/// Container version written and accepted.
pub const GLB_VERSION: u32 = 2;

const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_SHORT: u32 = 5123;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

const PLACEHOLDER_JSON: &str =
    r#"{"asset":{"version":"2.0"},"scenes":[{"nodes":[0]}],"nodes":[{"name":"Root"}]}"#;

/// Encodes a scene as a GLB byte buffer.
///
/// # Errors
///
/// Returns [`SceneError::TooLarge`] if a length overflows 32 bits and
/// [`SceneError::Json`] if the JSON chunk cannot be serialized.
pub fn write_glb(scene: &Scene3D) -> SceneResult<Vec<u8>> {
    let mut bin = Vec::new();
    let mut buffer_views = Vec::new();
    let mut accessors = Vec::new();
    let mut meshes = Vec::new();
    let mut nodes = vec![Value::Null];
    let mut materials = Vec::new();
    let mut material_index: HashMap<Rgba, usize> = HashMap::new();

    for solid in scene.solids() {
        let mesh = solid.mesh();
        let first_accessor = accessors.len();
        append_attributes(&mesh, &mut bin, &mut buffer_views, &mut accessors);

        let material = *material_index.entry(solid.color).or_insert_with(|| {
            materials.push(json!({
                "pbrMetallicRoughness": {
                    "baseColorFactor": color_factor(solid.color),
                    "metallicFactor": 0.0,
                    "roughnessFactor": 1.0,
                },
            }));
            materials.len() - 1
        });

        meshes.push(json!({
            "primitives": [{
                "attributes": {
                    "POSITION": first_accessor,
                    "NORMAL": first_accessor + 1,
                },
                "indices": first_accessor + 2,
                "material": material,
                "mode": MODE_TRIANGLES,
            }],
        }));
        nodes.push(json!({
            "name": solid.name(),
            "mesh": meshes.len() - 1,
            "translation": [solid.translation.x, solid.translation.y, solid.translation.z],
        }));
    }

    let mut root = json!({ "name": "Root" });
    if nodes.len() > 1 {
        root["children"] = json!((1..nodes.len()).collect::<Vec<_>>());
    }
    nodes[0] = root;

    let mut document = json!({
        "asset": { "version": "2.0", "generator": "layout-scene" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": nodes,
    });
    if !meshes.is_empty() {
        document["meshes"] = Value::Array(meshes);
        document["materials"] = Value::Array(materials);
        document["accessors"] = Value::Array(accessors);
        document["bufferViews"] = Value::Array(buffer_views);
        document["buffers"] = json!([{ "byteLength": bin.len() }]);
    }

    write_container(&serde_json::to_vec(&document)?, &bin)
}

/// A valid GLB holding only an empty `Root` node.
///
/// # Example
///
/// ```
/// use layout_scene::{parse_glb, placeholder_glb};
///
/// let doc = parse_glb(&placeholder_glb()).unwrap();
/// assert_eq!(doc.node_count(), 1);
/// assert_eq!(doc.mesh_count(), 0);
/// ```
#[must_use]
pub fn placeholder_glb() -> Vec<u8> {
    write_container(PLACEHOLDER_JSON.as_bytes(), &[]).unwrap_or_default()
}

fn append_attributes(
    mesh: &BoxMesh,
    bin: &mut Vec<u8>,
    buffer_views: &mut Vec<Value>,
    accessors: &mut Vec<Value>,
) {
    let count = mesh.vertex_count();

    let view = push_view(bin, buffer_views, TARGET_ARRAY_BUFFER, |out| {
        for p in &mesh.positions {
            p.iter().for_each(|c| out.extend_from_slice(&c.to_le_bytes()));
        }
    });
    accessors.push(json!({
        "bufferView": view,
        "componentType": COMPONENT_FLOAT,
        "count": count,
        "type": "VEC3",
        "min": mesh.min(),
        "max": mesh.max(),
    }));

    let view = push_view(bin, buffer_views, TARGET_ARRAY_BUFFER, |out| {
        for n in &mesh.normals {
            n.iter().for_each(|c| out.extend_from_slice(&c.to_le_bytes()));
        }
    });
    accessors.push(json!({
        "bufferView": view,
        "componentType": COMPONENT_FLOAT,
        "count": count,
        "type": "VEC3",
    }));

    let view = push_view(bin, buffer_views, TARGET_ELEMENT_ARRAY_BUFFER, |out| {
        mesh.indices
            .iter()
            .for_each(|i| out.extend_from_slice(&i.to_le_bytes()));
    });
    accessors.push(json!({
        "bufferView": view,
        "componentType": COMPONENT_UNSIGNED_SHORT,
        "count": mesh.indices.len(),
        "type": "SCALAR",
    }));
}

/// Appends one 4-byte aligned buffer view and returns its index.
fn push_view(
    bin: &mut Vec<u8>,
    buffer_views: &mut Vec<Value>,
    target: u32,
    fill: impl FnOnce(&mut Vec<u8>),
) -> usize {
    let offset = bin.len();
    fill(bin);
    let length = bin.len() - offset;
    bin.resize(bin.len().next_multiple_of(4), 0);

    buffer_views.push(json!({
        "buffer": 0,
        "byteOffset": offset,
        "byteLength": length,
        "target": target,
    }));
    buffer_views.len() - 1
}

fn write_container(json: &[u8], bin: &[u8]) -> SceneResult<Vec<u8>> {
    let json_len = json.len().next_multiple_of(4);
    let bin_len = bin.len().next_multiple_of(4);
    let mut total = HEADER_SIZE + CHUNK_HEADER_SIZE + json_len;
    if !bin.is_empty() {
        total += CHUNK_HEADER_SIZE + bin_len;
    }

    let as_u32 = |bytes: usize| u32::try_from(bytes).map_err(|_| SceneError::TooLarge { bytes });

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&as_u32(total)?.to_le_bytes());

    out.extend_from_slice(&as_u32(json_len)?.to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    out.resize(out.len() + json_len - json.len(), b' ');

    if !bin.is_empty() {
        out.extend_from_slice(&as_u32(bin_len)?.to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(bin);
        out.resize(out.len() + bin_len - bin.len(), 0);
    }

    Ok(out)
}

/// A decoded GLB container.
#[derive(Debug, Clone, PartialEq)]
pub struct GlbDocument {
    /// The glTF JSON document.
    pub json: Value,
    /// Binary chunk payload, if present.
    pub bin: Option<Vec<u8>>,
}

impl GlbDocument {
    /// Number of scene nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        array_len(&self.json, "nodes")
    }

    /// Number of meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        array_len(&self.json, "meshes")
    }

    /// Number of distinct materials.
    #[must_use]
    pub fn material_count(&self) -> usize {
        array_len(&self.json, "materials")
    }
}

fn array_len(json: &Value, key: &str) -> usize {
    json.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// Splits a GLB byte buffer into its JSON document and binary payload.
///
/// # Errors
///
/// Returns [`SceneError::InvalidGlb`] for a bad header, a length that does
/// not match the buffer, or a missing JSON chunk, and [`SceneError::Json`]
/// if the JSON chunk does not parse.
pub fn parse_glb(bytes: &[u8]) -> SceneResult<GlbDocument> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(SceneError::invalid_glb("bad magic"));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(SceneError::invalid_glb(format!(
            "unsupported version {version}"
        )));
    }
    let declared = read_u32(bytes, 8)? as usize;
    if declared != bytes.len() {
        return Err(SceneError::invalid_glb(format!(
            "header declares {declared} bytes, buffer holds {}",
            bytes.len()
        )));
    }

    let (json_type, json_chunk, mut offset) = read_chunk(bytes, HEADER_SIZE)?;
    if json_type != CHUNK_JSON {
        return Err(SceneError::invalid_glb("first chunk is not JSON"));
    }
    let json = serde_json::from_slice(json_chunk)?;

    let mut bin = None;
    while offset < bytes.len() {
        let (kind, payload, next) = read_chunk(bytes, offset)?;
        if kind == CHUNK_BIN && bin.is_none() {
            bin = Some(payload.to_vec());
        }
        offset = next;
    }

    Ok(GlbDocument { json, bin })
}

fn read_u32(bytes: &[u8], offset: usize) -> SceneResult<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| SceneError::invalid_glb(format!("truncated at byte {offset}")))
}

fn read_chunk(bytes: &[u8], offset: usize) -> SceneResult<(u32, &[u8], usize)> {
    let length = read_u32(bytes, offset)? as usize;
    let kind = read_u32(bytes, offset + 4)?;
    let start = offset + CHUNK_HEADER_SIZE;
    let payload = bytes
        .get(start..start + length)
        .ok_or_else(|| SceneError::invalid_glb(format!("chunk at byte {offset} overruns")))?;
    Ok((kind, payload, start + length))
}

/// An encoded 3D asset ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlbAsset {
    bytes: Vec<u8>,
    placeholder: bool,
}

impl GlbAsset {
    /// Encodes a scene.
    ///
    /// # Errors
    ///
    /// Propagates [`write_glb`] failures.
    pub fn from_scene(scene: &Scene3D) -> SceneResult<Self> {
        Ok(Self {
            bytes: write_glb(scene)?,
            placeholder: false,
        })
    }

    /// The fallback asset returned when a scene cannot be built.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            bytes: placeholder_glb(),
            placeholder: true,
        }
    }

    /// Returns `true` if this is the fallback asset.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Raw GLB bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the asset, returning the GLB bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if there are no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding, for embedding in JSON responses.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Writes the GLB bytes to a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> SceneResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }
}
