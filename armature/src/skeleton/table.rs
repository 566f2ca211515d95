//! Bone name registry

use glam::Mat4;
use hashbrown::HashMap;

/// Index and inverse bind matrix of one registered bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneEntry {
    pub index: u32,
    pub offset_matrix: Mat4,
}

/// Maps bone names to stable indices in first-seen order.
///
/// One table is threaded through a whole import so that a bone shared by
/// several submeshes resolves to a single index.
#[derive(Debug, Clone, Default)]
pub struct BoneTable {
    entries: HashMap<String, BoneEntry>,
    names: Vec<String>,
}

impl BoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bone and return its index.
    ///
    /// A name seen before keeps its original index and its original offset
    /// matrix; the offset passed here is ignored in that case.
    pub fn register(&mut self, name: &str, offset_matrix: Mat4) -> u32 {
        if let Some(entry) = self.entries.get(name) {
            return entry.index;
        }

        let index = self.names.len() as u32;
        self.entries.insert(
            name.to_owned(),
            BoneEntry {
                index,
                offset_matrix,
            },
        );
        self.names.push(name.to_owned());
        tracing::debug!("Registered bone '{}' as index {}", name, index);
        index
    }

    pub fn get(&self, name: &str) -> Option<&BoneEntry> {
        self.entries.get(name)
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.entries.get(name).map(|e| e.index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Bone name at `index`
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Offset matrix of the bone at `index`
    pub fn offset(&self, index: u32) -> Option<Mat4> {
        self.name(index)
            .and_then(|name| self.entries.get(name))
            .map(|e| e.offset_matrix)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Bones in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoneEntry)> {
        self.names
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), e)))
    }
}
