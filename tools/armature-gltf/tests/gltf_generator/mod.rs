//! Programmatic GLB generation for integration tests.
//!
//! Generates a two-bone leg rig:
//! - "Armature" (plain node) -> "Hip" at (0, 1, 0) -> "Knee" one unit above
//! - an unnamed mesh node skinned to Hip and Knee, with two primitives:
//!   an indexed 4-vertex quad and a non-indexed triangle without skinning
//!   attributes
//! - animation "Bend": Hip turns 90 degrees about Z while Knee slides up

mod glb_assembly;

use serde_json::{json, Value};
use std::f32::consts::FRAC_PI_4;

pub const MODE_LINES: u32 = 1;
pub const MODE_TRIANGLES: u32 = 4;

/// Node index of the unnamed mesh node
pub const MESH_NODE: usize = 3;

const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_BYTE: u32 = 5121;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// The rig with a triangle-list quad
pub fn generate_rig_glb() -> Vec<u8> {
    generate_rig_glb_with_mode(MODE_TRIANGLES)
}

/// The rig with the quad primitive drawn in `mode`
pub fn generate_rig_glb_with_mode(mode: u32) -> Vec<u8> {
    let mut buffer = BufferBuilder::default();

    // Primitive 0: skinned quad
    let quad_positions = buffer.vec3s(&[
        [-0.5, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [0.5, 2.0, 0.0],
        [-0.5, 2.0, 0.0],
    ]);
    let quad_uvs = buffer.accessor(
        bytemuck::cast_slice(&[[0.0f32, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        Some(ARRAY_BUFFER),
        FLOAT,
        4,
        "VEC2",
    );
    let quad_joints = buffer.accessor(
        bytemuck::cast_slice(&[[0u8, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0]]),
        Some(ARRAY_BUFFER),
        UNSIGNED_BYTE,
        4,
        "VEC4",
    );
    let quad_weights = buffer.accessor(
        bytemuck::cast_slice(&[
            [1.0f32, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.75, 0.25, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
        ]),
        Some(ARRAY_BUFFER),
        FLOAT,
        4,
        "VEC4",
    );
    let quad_indices = buffer.accessor(
        bytemuck::cast_slice(&[0u16, 1, 2, 0, 2, 3]),
        Some(ELEMENT_ARRAY_BUFFER),
        UNSIGNED_SHORT,
        6,
        "SCALAR",
    );

    // Primitive 1: plain triangle, drawn without indices
    let triangle_positions = buffer.vec3s(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);

    // Skin: column-major inverse bind matrices of Hip (0, 1, 0) and Knee (0, 2, 0)
    let inverse_bind = buffer.accessor(
        bytemuck::cast_slice(&[translation_matrix(0.0, -1.0, 0.0), translation_matrix(0.0, -2.0, 0.0)]),
        None,
        FLOAT,
        2,
        "MAT4",
    );

    // Animation
    let times = buffer.scalars(&[0.0, 1.0]);
    let hip_translation = buffer.vec3s(&[[0.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
    let hip_rotation = buffer.accessor(
        bytemuck::cast_slice(&[[0.0f32, 0.0, 0.0, 1.0], [0.0, 0.0, FRAC_PI_4.sin(), FRAC_PI_4.cos()]]),
        None,
        FLOAT,
        2,
        "VEC4",
    );
    let knee_translation = buffer.vec3s(&[[0.0, 1.0, 0.0], [0.0, 2.0, 0.0]]);

    let root = json!({
        "asset": { "version": "2.0", "generator": "armature-gltf-test" },
        "scene": 0,
        "scenes": [{ "name": "Rig", "nodes": [0, MESH_NODE] }],
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "Hip", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Knee", "translation": [0.0, 1.0, 0.0] },
            { "mesh": 0, "skin": 0 }
        ],
        "meshes": [{
            "name": "Leg",
            "primitives": [
                {
                    "attributes": {
                        "POSITION": quad_positions,
                        "TEXCOORD_0": quad_uvs,
                        "JOINTS_0": quad_joints,
                        "WEIGHTS_0": quad_weights
                    },
                    "indices": quad_indices,
                    "mode": mode
                },
                {
                    "attributes": { "POSITION": triangle_positions }
                }
            ]
        }],
        "skins": [{ "joints": [1, 2], "inverseBindMatrices": inverse_bind, "skeleton": 1 }],
        "animations": [{
            "name": "Bend",
            "samplers": [
                { "input": times, "output": hip_translation, "interpolation": "LINEAR" },
                { "input": times, "output": hip_rotation, "interpolation": "LINEAR" },
                { "input": times, "output": knee_translation, "interpolation": "LINEAR" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "translation" } },
                { "sampler": 1, "target": { "node": 1, "path": "rotation" } },
                { "sampler": 2, "target": { "node": 2, "path": "translation" } }
            ]
        }],
        "buffers": [{ "byteLength": 0 }],
        "bufferViews": buffer.views,
        "accessors": buffer.accessors
    });

    glb_assembly::assemble_glb(&root, &buffer.data)
}

fn translation_matrix(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    ]
}

/// Packs accessor data into one binary buffer, one view per accessor
#[derive(Default)]
struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.data.len(),
            "byteLength": bytes.len()
        });
        if let Some(target) = target {
            view["target"] = json!(target);
        }
        self.data.extend_from_slice(bytes);
        self.views.push(view);
        self.views.len() - 1
    }

    fn accessor(
        &mut self,
        bytes: &[u8],
        target: Option<u32>,
        component_type: u32,
        count: usize,
        kind: &str,
    ) -> usize {
        let view = self.view(bytes, target);
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": component_type,
            "count": count,
            "type": kind
        }));
        self.accessors.len() - 1
    }

    /// VEC3 float accessor with min/max bounds (required for POSITION)
    fn vec3s(&mut self, values: &[[f32; 3]]) -> usize {
        let index = self.accessor(
            bytemuck::cast_slice(values),
            Some(ARRAY_BUFFER),
            FLOAT,
            values.len(),
            "VEC3",
        );
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in values {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        self.accessors[index]["min"] = json!(min);
        self.accessors[index]["max"] = json!(max);
        index
    }

    /// SCALAR float accessor with bounds (required for animation inputs)
    fn scalars(&mut self, values: &[f32]) -> usize {
        let index = self.accessor(bytemuck::cast_slice(values), None, FLOAT, values.len(), "SCALAR");
        let min = values.iter().copied().fold(f32::MAX, f32::min);
        let max = values.iter().copied().fold(f32::MIN, f32::max);
        self.accessors[index]["min"] = json!([min]);
        self.accessors[index]["max"] = json!([max]);
        index
    }
}
