//! Mesh primitive and skin reading

use anyhow::{Context, Result};
use armature::scene::{SourceBone, SourceMesh, VertexWeight};
use glam::{Mat4, Vec2, Vec3, Vec4};
use gltf::mesh::Mode;

use crate::node_name;

/// Joint names and inverse bind matrices of one skin
#[derive(Debug, Clone, PartialEq)]
pub struct SkinJoints {
    pub names: Vec<String>,
    pub offsets: Vec<Mat4>,
}

/// Every primitive of every mesh node in `scene`, depth-first
pub fn read_meshes(scene: &gltf::Scene, buffers: &[gltf::buffer::Data]) -> Result<Vec<SourceMesh>> {
    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_meshes(&node, buffers, &mut meshes)?;
    }
    Ok(meshes)
}

fn collect_meshes(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<SourceMesh>,
) -> Result<()> {
    if let Some(mesh) = node.mesh() {
        let skin = node.skin().map(|skin| read_skin(&skin, buffers));
        for primitive in mesh.primitives() {
            meshes.push(read_primitive(&mesh, &primitive, skin.as_ref(), buffers)?);
        }
    }

    for child in node.children() {
        collect_meshes(&child, buffers, meshes)?;
    }
    Ok(())
}

/// Read joint names and inverse bind matrices.
///
/// Missing or short inverse bind matrix lists are padded with identity.
pub fn read_skin(skin: &gltf::Skin, buffers: &[gltf::buffer::Data]) -> SkinJoints {
    let names: Vec<String> = skin.joints().map(|joint| node_name(&joint)).collect();

    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let mut offsets: Vec<Mat4> = reader
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    if offsets.len() != names.len() {
        if !offsets.is_empty() {
            tracing::warn!(
                "Skin has {} inverse bind matrices for {} joints",
                offsets.len(),
                names.len()
            );
        }
        offsets.resize(names.len(), Mat4::IDENTITY);
    }

    SkinJoints { names, offsets }
}

fn read_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    skin: Option<&SkinJoints>,
    buffers: &[gltf::buffer::Data],
) -> Result<SourceMesh> {
    let name = format!(
        "{}.{}",
        mesh.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index())),
        primitive.index()
    );
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .with_context(|| format!("No positions in primitive {}", name))?
        .map(Vec3::from)
        .collect();

    let normals: Option<Vec<Vec3>> = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from).collect());

    // xyz only, the handedness sign is not carried
    let tangents: Option<Vec<Vec3>> = reader
        .read_tangents()
        .map(|iter| iter.map(|t| Vec3::new(t[0], t[1], t[2])).collect());

    let texcoords: Option<Vec<Vec2>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().map(Vec2::from).collect());

    let colors: Option<Vec<Vec4>> = reader
        .read_colors(0)
        .map(|iter| iter.into_rgba_f32().map(Vec4::from).collect());

    // Non-indexed primitives draw their vertices in order
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let faces = build_faces(primitive.mode(), &indices);

    let bones = match skin {
        Some(skin) => match (reader.read_joints(0), reader.read_weights(0)) {
            (Some(joints), Some(weights)) => {
                invert_weights(skin, joints.into_u16().zip(weights.into_f32()))
            }
            _ => {
                tracing::warn!(
                    "Primitive {} belongs to a skinned node but has no JOINTS_0/WEIGHTS_0",
                    name
                );
                invert_weights(skin, std::iter::empty())
            }
        },
        None => Vec::new(),
    };

    Ok(SourceMesh {
        name,
        material_index: primitive.material().index().map(|i| i as i32).unwrap_or(0),
        positions,
        normals,
        tangents,
        texcoords,
        colors,
        faces,
        bones,
    })
}

/// Split an index list into faces according to the primitive mode.
///
/// Strips and fans are unrolled into triangles. Point and line modes keep
/// their natural arity.
pub fn build_faces(mode: Mode, indices: &[u32]) -> Vec<Vec<u32>> {
    match mode {
        Mode::Triangles => indices.chunks(3).map(<[u32]>::to_vec).collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                // Every other triangle flips to keep the winding consistent
                if i % 2 == 0 {
                    vec![w[0], w[1], w[2]]
                } else {
                    vec![w[1], w[0], w[2]]
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&center, rest)) => rest.windows(2).map(|w| vec![center, w[0], w[1]]).collect(),
            None => Vec::new(),
        },
        Mode::Points => indices.chunks(1).map(<[u32]>::to_vec).collect(),
        Mode::Lines => indices.chunks(2).map(<[u32]>::to_vec).collect(),
        Mode::LineStrip => indices.windows(2).map(<[u32]>::to_vec).collect(),
        Mode::LineLoop => {
            let mut lines: Vec<Vec<u32>> = indices.windows(2).map(<[u32]>::to_vec).collect();
            if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
                if indices.len() > 2 {
                    lines.push(vec![last, first]);
                }
            }
            lines
        }
    }
}

/// Turn per-vertex (joints, weights) pairs into one weight list per joint.
///
/// Every joint of the skin becomes a bone, weighted or not. Zero weights are
/// skipped.
pub fn invert_weights(
    skin: &SkinJoints,
    influences: impl Iterator<Item = ([u16; 4], [f32; 4])>,
) -> Vec<SourceBone> {
    let mut per_joint: Vec<Vec<VertexWeight>> = vec![Vec::new(); skin.names.len()];

    for (vertex, (joints, weights)) in influences.enumerate() {
        for (joint, weight) in joints.into_iter().zip(weights) {
            if weight <= 0.0 {
                continue;
            }
            match per_joint.get_mut(joint as usize) {
                Some(list) => list.push(VertexWeight {
                    vertex: vertex as u32,
                    weight,
                }),
                None => tracing::warn!(
                    "Vertex {} references joint {} but the skin has {} joints",
                    vertex,
                    joint,
                    skin.names.len()
                ),
            }
        }
    }

    skin.names
        .iter()
        .zip(&skin.offsets)
        .zip(per_joint)
        .map(|((name, offset), weights)| SourceBone {
            name: name.clone(),
            offset_matrix: *offset,
            weights,
        })
        .collect()
}
