//! Binding source clips to a skeleton

use hashbrown::HashMap;

use super::keyframe::{Animation, BoneKeyframes, Keyframe};
use crate::scene::{SceneNode, SourceChannel, SourceClip};
use crate::skeleton::{BoneId, Skeleton};

/// Attach the keys of `clip` to the bones of `skeleton`.
///
/// Walks the source node tree depth-first. A node contributes keys only if
/// the clip has a channel with its name and the skeleton has a bone with its
/// name; every other node is skipped but its children are still visited.
/// Never fails: a clip matching no bones yields a static animation.
pub fn bind_animation(clip: &SourceClip, root: &SceneNode, skeleton: &Skeleton) -> Animation {
    let mut channels = HashMap::new();
    bind_node(clip, root, skeleton, &mut channels);

    let unbound = clip.channels.len().saturating_sub(channels.len());
    if unbound > 0 {
        tracing::debug!(
            "Animation '{}': {} of {} channels target no bone",
            clip.name,
            unbound,
            clip.channels.len()
        );
    }

    Animation {
        name: clip.name.clone(),
        duration: clip.duration,
        ticks_per_second: clip.ticks_per_second,
        current_time: 0.0,
        channels,
    }
}

fn bind_node(
    clip: &SourceClip,
    node: &SceneNode,
    skeleton: &Skeleton,
    channels: &mut HashMap<BoneId, BoneKeyframes>,
) {
    if let Some(channel) = clip.channel(&node.name) {
        if let Some(bone) = skeleton.find_by_name(&node.name) {
            channels.insert(bone, extract_keys(&clip.name, channel));
        }
    }

    for child in &node.children {
        bind_node(clip, child, skeleton, channels);
    }
}

fn extract_keys(clip_name: &str, channel: &SourceChannel) -> BoneKeyframes {
    BoneKeyframes {
        positions: time_ordered(clip_name, &channel.node_name, &channel.position_keys),
        rotations: time_ordered(clip_name, &channel.node_name, &channel.rotation_keys),
        scales: time_ordered(clip_name, &channel.node_name, &channel.scale_keys),
    }
}

fn time_ordered<T: Copy>(clip_name: &str, node_name: &str, keys: &[Keyframe<T>]) -> Vec<Keyframe<T>> {
    let mut keys = keys.to_vec();
    if !keys.is_sorted_by(|a, b| a.time <= b.time) {
        tracing::warn!(
            "Animation '{}': keys for '{}' are out of order, sorting by time",
            clip_name,
            node_name
        );
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
    keys
}
