//! Animation clip reading

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use armature::scene::{SourceChannel, SourceClip};
use armature::Keyframe;
use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::animation::Interpolation;

use crate::node_name;

pub fn read_clips(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Vec<SourceClip>> {
    document
        .animations()
        .map(|animation| read_clip(&animation, buffers))
        .collect()
}

/// Read one animation, grouping its channels by target node.
///
/// glTF key times are seconds, so the clip runs at one tick per second and
/// lasts until its latest key. Morph target weight channels are ignored.
pub fn read_clip(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> Result<SourceClip> {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    let mut channels: BTreeMap<usize, SourceChannel> = BTreeMap::new();
    let mut duration = 0.0f32;

    for channel in animation.channels() {
        let target = channel.target();
        let node = target.node();
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

        let times: Vec<f32> = reader
            .read_inputs()
            .with_context(|| format!("Animation '{}' has a channel without key times", name))?
            .collect();
        let outputs = reader
            .read_outputs()
            .with_context(|| format!("Animation '{}' has a channel without key values", name))?;

        if let ReadOutputs::MorphTargetWeights(_) = outputs {
            tracing::debug!(
                "Animation '{}': skipping morph weights on '{}'",
                name,
                node_name(&node)
            );
            continue;
        }

        let interpolation = channel.sampler().interpolation();
        if interpolation == Interpolation::Step {
            tracing::debug!(
                "Animation '{}': step interpolation on '{}' will be sampled linearly",
                name,
                node_name(&node)
            );
        }
        let cubic = interpolation == Interpolation::CubicSpline;

        let entry = channels
            .entry(node.index())
            .or_insert_with(|| SourceChannel {
                node_name: node_name(&node),
                ..Default::default()
            });

        match outputs {
            ReadOutputs::Translations(values) => {
                entry.position_keys = keys(&times, values.map(Vec3::from), cubic);
            }
            ReadOutputs::Rotations(values) => {
                entry.rotation_keys = keys(&times, values.into_f32().map(Quat::from_array), cubic);
            }
            ReadOutputs::Scales(values) => {
                entry.scale_keys = keys(&times, values.map(Vec3::from), cubic);
            }
            ReadOutputs::MorphTargetWeights(_) => {}
        }

        if let Some(&last) = times.last() {
            duration = duration.max(last);
        }
    }

    Ok(SourceClip {
        name,
        duration,
        ticks_per_second: 1.0,
        channels: channels.into_values().collect(),
    })
}

/// Pair key times with values.
///
/// Cubic spline samplers store (in-tangent, value, out-tangent) triples;
/// only the values are kept.
pub fn keys<T: Copy>(times: &[f32], values: impl Iterator<Item = T>, cubic: bool) -> Vec<Keyframe<T>> {
    let values: Vec<T> = if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    };

    if values.len() != times.len() {
        tracing::warn!(
            "Channel has {} key times but {} values, truncating",
            times.len(),
            values.len()
        );
    }

    times
        .iter()
        .zip(values)
        .map(|(&time, value)| Keyframe::new(time, value))
        .collect()
}
