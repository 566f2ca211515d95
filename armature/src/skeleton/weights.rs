//! Per-vertex bone weight accumulation and top-4 selection

use std::collections::BTreeMap;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Bone slots per vertex, matching the usual GPU skinning limit
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Four (bone index, weight) slots, heaviest first. Unused slots are (0, 0.0).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexBoneData {
    pub indices: [u32; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexBoneData {
    /// Number of slots carrying a non-zero weight
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Rescale weights to sum to 1. All-zero slots are returned unchanged.
    pub fn normalized(&self) -> Self {
        let sum = self.weight_sum();
        if sum <= 0.0 {
            return *self;
        }
        let mut out = *self;
        for w in &mut out.weights {
            *w /= sum;
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    bone: u32,
    weight: f32,
}

/// Collects (bone, weight) contributions per global vertex index.
///
/// Contributions are uncapped until [`WeightAccumulator::finalize`] narrows
/// each vertex to its [`MAX_BONE_INFLUENCES`] heaviest bones.
#[derive(Debug, Clone, Default)]
pub struct WeightAccumulator {
    vertices: HashMap<u32, SmallVec<[Contribution; MAX_BONE_INFLUENCES]>>,
}

impl WeightAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, global_vertex: u32, bone_index: u32, weight: f32) {
        self.vertices
            .entry(global_vertex)
            .or_default()
            .push(Contribution {
                bone: bone_index,
                weight,
            });
    }

    /// Number of vertices with at least one contribution
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Narrow every vertex to its heaviest bones.
    ///
    /// Contributions are sorted by weight, descending; equal weights keep
    /// insertion order. Vertices without contributions are absent from the
    /// result.
    pub fn finalize(self) -> BTreeMap<u32, VertexBoneData> {
        self.vertices
            .into_iter()
            .map(|(vertex, mut contributions)| {
                // Stable sort: ties keep insertion order
                contributions.sort_by(|a, b| b.weight.total_cmp(&a.weight));

                if contributions.len() > MAX_BONE_INFLUENCES {
                    tracing::debug!(
                        "Vertex {} has {} bone influences, keeping the heaviest {}",
                        vertex,
                        contributions.len(),
                        MAX_BONE_INFLUENCES
                    );
                }

                let mut data = VertexBoneData::default();
                for (slot, c) in contributions.iter().take(MAX_BONE_INFLUENCES).enumerate() {
                    data.indices[slot] = c.bone;
                    data.weights[slot] = c.weight;
                }
                (vertex, data)
            })
            .collect()
    }

    /// Finalize into a dense per-vertex stream with all-zero defaults.
    ///
    /// Contributions for vertices at or beyond `vertex_count` are dropped.
    pub fn into_vertex_stream(self, vertex_count: usize) -> Vec<VertexBoneData> {
        let mut stream = vec![VertexBoneData::default(); vertex_count];
        let mut dropped = 0usize;

        for (vertex, data) in self.finalize() {
            match stream.get_mut(vertex as usize) {
                Some(slot) => *slot = data,
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(
                "Dropped bone weights for {} vertices outside the mesh ({} vertices)",
                dropped,
                vertex_count
            );
        }
        stream
    }
}
