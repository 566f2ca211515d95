//! armature-gltf - glTF/GLB front end for the armature import pipeline
//!
//! Reads a glTF document with the `gltf` crate and fills in the
//! [`armature::scene`] types. Validation beyond what `gltf` performs is left
//! to [`armature::import_scene`]: primitives that are not triangles are passed
//! through with their natural face arity so the core can reject them.

pub mod animation;
pub mod mesh;

use std::path::Path;

use anyhow::{Context, Result};
use armature::scene::{SceneNode, SourceScene};
use armature::{import_scene, ImportOptions, SkinnedModel};
use glam::Mat4;

/// Load a `.gltf` or `.glb` file from disk
pub fn load_gltf(path: &Path) -> Result<SourceScene> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;
    convert_document(&document, &buffers)
}

/// Load glTF data already in memory (GLB or self-contained JSON)
pub fn load_gltf_slice(bytes: &[u8]) -> Result<SourceScene> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).context("Failed to parse glTF data")?;
    convert_document(&document, &buffers)
}

/// Load a file and run it through the import pipeline
pub fn import_gltf(path: &Path, options: &ImportOptions) -> Result<SkinnedModel> {
    let scene = load_gltf(path)?;
    import_scene(&scene, options).with_context(|| format!("Failed to import {:?}", path))
}

/// Read [`ImportOptions`] from a TOML file, or use the defaults
pub fn load_options(path: Option<&Path>) -> Result<ImportOptions> {
    let Some(path) = path else {
        return Ok(ImportOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

/// Convert the default scene (or the first one) of a parsed document
pub fn convert_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<SourceScene> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes found in glTF")?;

    // glTF scenes have several root nodes; hang them off a synthetic root
    let root = SceneNode {
        name: scene
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("scene_{}", scene.index())),
        transform: Mat4::IDENTITY,
        children: scene.nodes().map(|node| convert_node(&node)).collect(),
    };

    let meshes = mesh::read_meshes(&scene, buffers)?;
    let clips = animation::read_clips(document, buffers)?;

    tracing::debug!(
        "glTF scene '{}': {} nodes, {} submeshes, {} animations",
        root.name,
        root.node_count(),
        meshes.len(),
        clips.len()
    );

    Ok(SourceScene { root, meshes, clips })
}

fn convert_node(node: &gltf::Node) -> SceneNode {
    SceneNode {
        name: node_name(node),
        transform: Mat4::from_cols_array_2d(&node.transform().matrix()),
        children: node.children().map(|child| convert_node(&child)).collect(),
    }
}

/// Node name used for bone and channel matching; unnamed nodes get
/// `node_{index}`.
pub(crate) fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}
