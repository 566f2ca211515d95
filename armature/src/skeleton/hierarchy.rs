//! Bone tree construction
//!
//! Bones live in a flat arena owned by [`Skeleton`]; parent and child links
//! are [`BoneId`]s into that arena, so there are no reference cycles and the
//! tree is trivially shareable once built.

use glam::Mat4;
use hashbrown::HashSet;

use super::table::BoneTable;
use crate::scene::SceneNode;

/// Arena slot of a bone inside its [`Skeleton`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(u32);

impl BoneId {
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

/// A scene node that is a registered bone
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index into the skinning matrix array
    pub index: u32,
    /// Bind-pose transform relative to the source parent node
    pub local_transform: Mat4,
    /// Bind-pose transform accumulated over every source ancestor
    pub bind_world_transform: Mat4,
    /// Inverse bind matrix from the bone table
    pub offset_matrix: Mat4,
    pub parent: Option<BoneId>,
    pub children: Vec<BoneId>,
}

/// Bone forest built from a source node tree.
///
/// Only nodes that are registered bones appear; intermediate non-bone nodes
/// are collapsed. Usually there is a single root, but sibling bone subtrees
/// without a common bone ancestor are all kept as roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    roots: Vec<BoneId>,
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// First root, if any bone exists
    pub fn root(&self) -> Option<BoneId> {
        self.roots.first().copied()
    }

    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    /// Bone stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this skeleton. Use
    /// [`Self::try_get`] for ids of unknown origin.
    pub fn get(&self, id: BoneId) -> &Bone {
        &self.bones[id.slot()]
    }

    pub fn try_get(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.slot())
    }

    /// # Panics
    ///
    /// Panics on an id from another skeleton, like [`Self::get`].
    pub fn parent_of(&self, id: BoneId) -> Option<BoneId> {
        self.get(id).parent
    }

    /// # Panics
    ///
    /// Panics on an id from another skeleton, like [`Self::get`].
    pub fn children_of(&self, id: BoneId) -> &[BoneId] {
        &self.get(id).children
    }

    /// Recursive search from the roots, first match in depth-first order
    pub fn find_by_name(&self, name: &str) -> Option<BoneId> {
        self.roots
            .iter()
            .find_map(|&root| self.find_in_subtree(root, name))
    }

    fn find_in_subtree(&self, id: BoneId, name: &str) -> Option<BoneId> {
        let bone = self.get(id);
        if bone.name == name {
            return Some(id);
        }
        bone.children
            .iter()
            .find_map(|&child| self.find_in_subtree(child, name))
    }

    pub fn find_by_index(&self, index: u32) -> Option<BoneId> {
        self.iter_depth_first()
            .into_iter()
            .find(|&id| self.get(id).index == index)
    }

    /// All reachable bones, parents before children
    pub fn iter_depth_first(&self) -> Vec<BoneId> {
        let mut order = Vec::with_capacity(self.bones.len());
        let mut stack: Vec<BoneId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.get(id).children.iter().rev().copied());
        }
        order
    }

    /// Check that parent and child links agree and every bone is reachable
    pub fn validate(&self) -> bool {
        let links_agree = self.bones.iter().enumerate().all(|(slot, bone)| {
            let id = BoneId(slot as u32);
            let parent_ok = match bone.parent {
                Some(parent) => self
                    .try_get(parent)
                    .is_some_and(|p| p.children.contains(&id)),
                None => self.roots.contains(&id),
            };
            let children_ok = bone
                .children
                .iter()
                .all(|&c| self.try_get(c).is_some_and(|child| child.parent == Some(id)));
            parent_ok && children_ok
        });
        links_agree && self.iter_depth_first().len() == self.bones.len()
    }
}

/// Build the bone forest for every node of `root` that is in `table`.
///
/// World transforms accumulate through every source node, bone or not. A
/// node name seen a second time is treated as a non-bone so that each bone
/// index maps to exactly one [`Bone`].
pub fn build_skeleton(root: &SceneNode, table: &BoneTable) -> Skeleton {
    let mut builder = Builder {
        table,
        bones: Vec::new(),
        seen: HashSet::new(),
    };
    let roots = builder.visit(root, Mat4::IDENTITY);

    if roots.len() > 1 {
        tracing::debug!("Skeleton has {} independent root bones", roots.len());
    }
    let unreached = table.len().saturating_sub(builder.bones.len());
    if unreached > 0 {
        tracing::warn!(
            "{} registered bones have no matching node in the scene",
            unreached
        );
    }

    Skeleton {
        bones: builder.bones,
        roots,
    }
}

struct Builder<'a> {
    table: &'a BoneTable,
    bones: Vec<Bone>,
    seen: HashSet<String>,
}

impl Builder<'_> {
    /// Returns the bone subtree roots produced by `node`: itself if it is a
    /// bone, otherwise every subtree promoted from its descendants.
    fn visit(&mut self, node: &SceneNode, parent_global: Mat4) -> Vec<BoneId> {
        let global = parent_global * node.transform;
        let table = self.table;

        let entry = match table.get(&node.name) {
            Some(entry) if self.seen.insert(node.name.clone()) => Some(*entry),
            Some(_) => {
                tracing::warn!(
                    "Bone '{}' appears more than once in the scene, ignoring the duplicate",
                    node.name
                );
                None
            }
            None => None,
        };

        let Some(entry) = entry else {
            return node
                .children
                .iter()
                .flat_map(|child| self.visit(child, global))
                .collect();
        };

        let id = BoneId(self.bones.len() as u32);
        self.bones.push(Bone {
            name: node.name.clone(),
            index: entry.index,
            local_transform: node.transform,
            bind_world_transform: global,
            offset_matrix: entry.offset_matrix,
            parent: None,
            children: Vec::new(),
        });

        for child in &node.children {
            for sub in self.visit(child, global) {
                self.bones[sub.slot()].parent = Some(id);
                self.bones[id.slot()].children.push(sub);
            }
        }

        vec![id]
    }
}
