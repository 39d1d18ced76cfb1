//! Scene graph arena
//!
//! The imported node tree is flattened into a vector of nodes in pre-order.
//! Nodes refer to their parent and children by [`NodeId`], so every walk
//! over the hierarchy is plain index arithmetic.

use std::collections::HashMap;

use glam::Mat4;

use crate::error::{ModelError, Result};
use crate::import::ImportedNode;

/// Index of a node inside a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node of the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Indices into the model's mesh list
    pub meshes: Vec<usize>,
}

/// Tree of scene nodes stored in pre-order
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Flatten an imported node tree
    ///
    /// Every mesh index must be below `mesh_count`.
    pub fn from_imported(root: &ImportedNode, mesh_count: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        // (node, parent) pairs, children pushed in reverse so they pop in order
        let mut stack: Vec<(&ImportedNode, Option<NodeId>)> = vec![(root, None)];

        while let Some((imported, parent)) = stack.pop() {
            if let Some(&bad) = imported.meshes.iter().find(|&&m| m >= mesh_count) {
                return Err(ModelError::ReferenceError(format!(
                    "node '{}' references mesh {} but the scene has {} meshes",
                    imported.name, bad, mesh_count
                )));
            }

            let id = NodeId(nodes.len());
            nodes.push(SceneNode {
                name: imported.name.clone(),
                transform: imported.transform,
                parent,
                children: Vec::with_capacity(imported.children.len()),
                meshes: imported.meshes.clone(),
            });

            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }

            for child in imported.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        Ok(Self { nodes })
    }

    /// The root node, always the first node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of direct children of the root node
    pub fn root_child_count(&self) -> usize {
        self.nodes.first().map_or(0, |root| root.children.len())
    }

    /// Map of node names to nodes
    ///
    /// When several nodes share a name, the one visited last in pre-order wins.
    pub fn name_map(&self) -> HashMap<&str, NodeId> {
        let mut map = HashMap::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(previous) = map.insert(node.name.as_str(), NodeId(index)) {
                log::debug!(
                    "Duplicate node name '{}': node {} replaces node {}",
                    node.name,
                    index,
                    previous.0
                );
            }
        }
        map
    }

    /// Find a node by name, with the same last-wins policy as [`Self::name_map`]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .rposition(|node| node.name == name)
            .map(NodeId)
    }

    /// Model-space transform of a node: the product of local transforms from the root down
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut transform = Mat4::IDENTITY;
        let mut current = self.node(id);
        while let Some(node) = current {
            transform = node.transform * transform;
            current = node.parent.and_then(|parent| self.node(parent));
        }
        transform
    }

    /// Walk the hierarchy parent-before-children, threading an accumulated transform
    ///
    /// `visit` receives each node together with its parent's accumulated
    /// transform and returns the node's own accumulated transform, which is
    /// then handed to its children.
    pub fn traverse<F>(&self, initial: Mat4, mut visit: F)
    where
        F: FnMut(NodeId, &SceneNode, &Mat4) -> Mat4,
    {
        if self.nodes.is_empty() {
            return;
        }

        let mut stack = vec![(self.root(), initial)];
        while let Some((id, parent_transform)) = stack.pop() {
            let node = &self.nodes[id.0];
            let transform = visit(id, node, &parent_transform);
            for &child in node.children.iter().rev() {
                stack.push((child, transform));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn chain() -> ImportedNode {
        ImportedNode::new("root", Mat4::IDENTITY).with_child(
            ImportedNode::new("a", Mat4::from_translation(Vec3::X))
                .with_child(ImportedNode::new("b", Mat4::from_translation(Vec3::Y))),
        )
    }

    #[test]
    fn test_flatten_pre_order() {
        let root = ImportedNode::new("root", Mat4::IDENTITY)
            .with_child(ImportedNode::new("a", Mat4::IDENTITY).with_child(ImportedNode::new(
                "a1",
                Mat4::IDENTITY,
            )))
            .with_child(ImportedNode::new("b", Mat4::IDENTITY));

        let graph = SceneGraph::from_imported(&root, 0).unwrap();
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);

        assert_eq!(graph.node(NodeId(1)).unwrap().parent, Some(NodeId(0)));
        assert_eq!(graph.node(NodeId(3)).unwrap().parent, Some(NodeId(0)));
        assert_eq!(graph.node(NodeId(0)).unwrap().children, vec![NodeId(1), NodeId(3)]);
        assert_eq!(graph.root_child_count(), 2);
    }

    #[test]
    fn test_bad_mesh_reference() {
        let root = ImportedNode::new("root", Mat4::IDENTITY).with_mesh(2);
        let err = SceneGraph::from_imported(&root, 1).unwrap_err();
        assert!(matches!(err, ModelError::ReferenceError(_)));
    }

    #[test]
    fn test_world_transform_accumulates() {
        let graph = SceneGraph::from_imported(&chain(), 0).unwrap();
        let b = graph.find_by_name("b").unwrap();
        let p = graph.world_transform(b).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let root = ImportedNode::new("root", Mat4::IDENTITY)
            .with_child(ImportedNode::new("dup", Mat4::IDENTITY))
            .with_child(ImportedNode::new("dup", Mat4::IDENTITY));
        let graph = SceneGraph::from_imported(&root, 0).unwrap();

        assert_eq!(graph.find_by_name("dup"), Some(NodeId(2)));
        assert_eq!(graph.name_map()["dup"], NodeId(2));
    }

    #[test]
    fn test_traverse_visits_parents_first() {
        let graph = SceneGraph::from_imported(&chain(), 0).unwrap();
        let mut visited = Vec::new();
        graph.traverse(Mat4::IDENTITY, |id, node, parent| {
            visited.push((id, parent.transform_point3(Vec3::ZERO)));
            *parent * node.transform
        });

        assert_eq!(visited.len(), 3);
        assert_eq!(visited[0].0, NodeId(0));
        assert!((visited[2].1 - Vec3::X).length() < 0.001);
    }
}
