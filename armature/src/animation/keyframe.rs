//! Keyframe and animation types

use glam::{Quat, Vec3};
use hashbrown::HashMap;

use crate::skeleton::BoneId;

/// A (time, value) sample; time is in animation ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub const fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Position or scale key
pub type VectorKey = Keyframe<Vec3>;

/// Rotation key
pub type QuatKey = Keyframe<Quat>;

/// Independent, time-ordered key tracks for one bone.
///
/// Tracks do not share timestamps and any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneKeyframes {
    pub positions: Vec<VectorKey>,
    pub rotations: Vec<QuatKey>,
    pub scales: Vec<VectorKey>,
}

impl BoneKeyframes {
    /// True when no track has any key
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.positions.len() + self.rotations.len() + self.scales.len()
    }
}

/// A clip bound to a [`crate::Skeleton`].
///
/// Keys are stored per [`BoneId`]; the animation never owns bones, so any
/// number of animations can share one skeleton.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: String,
    /// Length in ticks
    pub duration: f32,
    pub ticks_per_second: f32,
    /// Playhead in ticks, driven by the caller
    pub current_time: f32,
    pub channels: HashMap<BoneId, BoneKeyframes>,
}

impl Animation {
    pub fn keyframes(&self, bone: BoneId) -> Option<&BoneKeyframes> {
        self.channels.get(&bone)
    }

    /// Number of bones with bound keys
    pub fn bound_bone_count(&self) -> usize {
        self.channels.len()
    }

    /// An animation without any bound bone leaves the bind pose untouched
    pub fn is_static(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > 0.0 {
            self.duration / self.ticks_per_second
        } else {
            0.0
        }
    }

    /// Looping animation time in ticks for a wall-clock time in seconds
    pub fn ticks_at(&self, seconds: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (seconds * self.ticks_per_second).rem_euclid(self.duration)
    }

    /// Move the playhead by `dt` seconds, wrapping at the end of the clip
    pub fn advance(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.current_time = 0.0;
            return;
        }
        self.current_time = (self.current_time + dt * self.ticks_per_second).rem_euclid(self.duration);
    }
}
