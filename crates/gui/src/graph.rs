//! Panorama adjacency graph
//!
//! Nodes come from the manifest file list, sorted by the number at the end of
//! each filename. The circular `prev`/`next` sequence is independent of the
//! explicit connection table that drives floor markers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use shared::{ConnectionTable, NodeIndex, UNNUMBERED_INDEX};

/// One panorama image and its place in the tour
#[derive(Debug, Clone, PartialEq)]
pub struct PanoNode {
    /// Trailing number of the filename, used as the graph key
    pub index: NodeIndex,
    /// Image reference, opaque to the engine
    pub file: String,
    /// Position in the sorted sequence
    pub sequence_position: usize,
    /// Sequence position of the previous node (wraps around)
    pub prev: usize,
    /// Sequence position of the next node (wraps around)
    pub next: usize,
    /// World yaw (degrees) the horizontal centre of the image faces
    pub orientation_offset: f32,
}

/// Parse the trailing integer of a filename, ignoring the extension.
///
/// `"room-10.jpg"` → `10`. Files without digits map to [`UNNUMBERED_INDEX`]
/// so they sort after every numbered file.
pub fn trailing_index(file: &str) -> NodeIndex {
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    let start = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[start..].parse().unwrap_or(UNNUMBERED_INDEX)
}

/// Immutable panorama graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<PanoNode>,
    lookup: HashMap<NodeIndex, usize>,
    edges: BTreeMap<NodeIndex, Vec<NodeIndex>>,
}

impl Graph {
    /// Build a graph from a manifest file list and an explicit connection table.
    ///
    /// With `symmetric` set, each declared edge also gets its reverse. Edges
    /// pointing at indices missing from the manifest are dropped.
    pub fn load(
        files: &[String],
        connections: &ConnectionTable,
        symmetric: bool,
        orientations: &BTreeMap<NodeIndex, f32>,
    ) -> Self {
        let mut keyed: Vec<(NodeIndex, &String)> =
            files.iter().map(|f| (trailing_index(f), f)).collect();
        // Stable: duplicates keep manifest order, first one wins the lookup
        keyed.sort_by_key(|(index, _)| *index);

        let len = keyed.len();
        let mut nodes = Vec::with_capacity(len);
        let mut lookup = HashMap::with_capacity(len);
        for (pos, (index, file)) in keyed.into_iter().enumerate() {
            lookup.entry(index).or_insert(pos);
            nodes.push(PanoNode {
                index,
                file: file.clone(),
                sequence_position: pos,
                prev: (pos + len - 1) % len,
                next: (pos + 1) % len,
                orientation_offset: orientations.get(&index).copied().unwrap_or(0.0),
            });
        }

        let mut edges: BTreeMap<NodeIndex, Vec<NodeIndex>> = BTreeMap::new();
        let mut add_edge = |from: NodeIndex, to: NodeIndex| {
            if !lookup.contains_key(&from) || !lookup.contains_key(&to) {
                tracing::debug!("Dropping edge {from} -> {to}: unknown node");
                return;
            }
            let list = edges.entry(from).or_default();
            if !list.contains(&to) {
                list.push(to);
            }
        };
        for (&from, targets) in connections {
            for &to in targets {
                add_edge(from, to);
                if symmetric {
                    add_edge(to, from);
                }
            }
        }

        Self {
            nodes,
            lookup,
            edges,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in sequence order
    pub fn nodes(&self) -> &[PanoNode] {
        &self.nodes
    }

    pub fn by_index(&self, index: NodeIndex) -> Option<&PanoNode> {
        self.lookup.get(&index).map(|&pos| &self.nodes[pos])
    }

    pub fn at_position(&self, pos: usize) -> Option<&PanoNode> {
        self.nodes.get(pos)
    }

    /// Declared neighbours of a node; empty when it has no edges
    pub fn neighbors_of(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.edges.get(&index).cloned().unwrap_or_default()
    }

    pub fn next_of(&self, index: NodeIndex) -> Option<&PanoNode> {
        self.by_index(index).and_then(|n| self.at_position(n.next))
    }

    pub fn prev_of(&self, index: NodeIndex) -> Option<&PanoNode> {
        self.by_index(index).and_then(|n| self.at_position(n.prev))
    }
}

/// Holder that swaps whole graphs on reload
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    current: Arc<Graph>,
}

impl GraphStore {
    pub fn new(graph: Graph) -> Self {
        Self {
            current: Arc::new(graph),
        }
    }

    /// Snapshot of the current graph; stays valid across later reloads
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current)
    }

    pub fn graph(&self) -> &Graph {
        &self.current
    }

    pub fn replace(&mut self, graph: Graph) {
        tracing::info!("Graph reloaded ({} nodes)", graph.len());
        self.current = Arc::new(graph);
    }
}
