//! Node lookup tables linking scene nodes, animation channels and bones
//!
//! Channels name their target node, and bones are registered by node name.
//! The lookup resolves both once per clip so that pose evaluation only deals
//! with indices.

use crate::bones::{BoneId, BoneRegistry};
use crate::scene::{NodeId, SceneGraph};

use super::types::AnimationChannel;

/// What a single scene node maps to within one clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupEntry {
    /// Index of the channel animating this node
    pub channel: Option<usize>,
    /// Bone driven by this node
    pub bone: Option<BoneId>,
}

/// Per-clip table with one entry for every scene node, indexed by [`NodeId`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLookup {
    entries: Vec<LookupEntry>,
}

impl NodeLookup {
    /// Resolve `channels` and `bones` against every node of `scene`
    ///
    /// Node names are matched with the scene's last-wins policy: when names
    /// repeat, only the last node in pre-order receives the channel and the
    /// bone of that name. Channels whose node is missing are skipped with a
    /// warning. `owner` is the model display name used in log messages.
    pub fn build(
        channels: &[AnimationChannel],
        scene: &SceneGraph,
        bones: &BoneRegistry,
        owner: &str,
    ) -> Self {
        let names = scene.name_map();
        let mut entries: Vec<Option<LookupEntry>> = vec![None; scene.len()];

        for (index, channel) in channels.iter().enumerate() {
            let Some(&node) = names.get(channel.node_name.as_str()) else {
                log::warn!(
                    "{}: animation channel {} targets unknown node '{}'",
                    owner,
                    index,
                    channel.node_name
                );
                continue;
            };

            if entries[node.index()].is_some() {
                log::debug!(
                    "{}: node '{}' is animated by more than one channel, channel {} wins",
                    owner,
                    channel.node_name,
                    index
                );
            }

            entries[node.index()] = Some(LookupEntry {
                channel: Some(index),
                bone: bones.get(&channel.node_name),
            });
        }

        let entries = entries
            .into_iter()
            .zip(scene.nodes())
            .enumerate()
            .map(|(index, (entry, node))| {
                entry.unwrap_or_else(|| {
                    let is_named_node = names.get(node.name.as_str()) == Some(&NodeId(index));
                    LookupEntry {
                        channel: None,
                        bone: if is_named_node {
                            bones.get(&node.name)
                        } else {
                            None
                        },
                    }
                })
            })
            .collect();

        Self { entries }
    }

    /// Entry for a node; nodes outside the table are neither animated nor bones
    pub fn get(&self, node: NodeId) -> LookupEntry {
        self.entries.get(node.index()).copied().unwrap_or_default()
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of nodes driven by a channel
    pub fn animated_count(&self) -> usize {
        self.entries.iter().filter(|e| e.channel.is_some()).count()
    }
}
