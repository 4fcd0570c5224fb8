//! Install tree arena and the flat winner map built alongside it

use crate::package::{PackageKind, StorageKind};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// Index of a node in an [`InstallTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resolution decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDef {
    pub kind: PackageKind,
    pub name: String,
    /// Version literal; empty for root, provided and shadow entries
    pub version: String,
    /// Repository the package comes from; empty when nothing is fetched
    pub repo: String,
    pub storage: StorageKind,
    /// Dependency depth of the requirement that produced this entry
    pub depth: usize,
    pub url: String,
    pub parent: Option<NodeId>,
}

impl InstallDef {
    pub fn root() -> Self {
        Self::placeholder(PackageKind::Root, "root", None)
    }

    pub fn provided(name: impl Into<String>, parent: NodeId) -> Self {
        Self::placeholder(PackageKind::Provided, name, Some(parent))
    }

    pub fn shadow(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self::placeholder(PackageKind::Shadow, name, parent)
    }

    fn placeholder(kind: PackageKind, name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name: name.into(),
            version: String::new(),
            repo: String::new(),
            storage: StorageKind::default(),
            depth: 0,
            url: String::new(),
            parent,
        }
    }

    pub fn is_fetchable(&self) -> bool {
        self.kind.is_fetchable()
    }

    /// Directory the package occupies under the package root
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallNode {
    pub def: InstallDef,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Provenance tree of a resolution, stored as an arena
///
/// Nodes are never removed. When a shallower requirement supersedes an
/// earlier winner, the old node is rewritten into a shadow and its child
/// links are dropped, leaving the old subtree unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTree {
    nodes: Vec<InstallNode>,
}

impl InstallTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![InstallNode {
                def: InstallDef::root(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &InstallNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes in the arena, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add `def` as the last child of `parent`
    pub(crate) fn attach(&mut self, parent: NodeId, def: InstallDef) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(InstallNode {
            def,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Turn a superseded winner into a shadow in place
    pub(crate) fn overwrite_with_shadow(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.def = InstallDef::shadow(node.def.name.clone(), node.parent);
        node.children.clear();
    }

    /// Indented provenance listing, two spaces per level; shadows are omitted
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(Self::ROOT, 0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, level: usize, out: &mut String) {
        let def = &self.node(id).def;
        if def.kind == PackageKind::Shadow {
            return;
        }
        let indent = "  ".repeat(level);
        // Writing to a String cannot fail
        let _ = match def.kind {
            PackageKind::Root => writeln!(out, "{}{}", indent, def.kind),
            PackageKind::Provided => {
                writeln!(out, "{}{} {}", indent, def.kind, def.name)
            }
            _ => writeln!(
                out,
                "{}{} {} {} from {}",
                indent, def.kind, def.name, def.version, def.repo
            ),
        };
        for &child in self.children(id) {
            self.render_node(child, level + 1, out);
        }
    }
}

impl Default for InstallTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a resolution: the provenance tree plus one winner per name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSet {
    pub tree: InstallTree,
    winners: BTreeMap<String, InstallDef>,
    nodes: HashMap<String, NodeId>,
}

impl InstallSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Winning definition for `name`
    pub fn get(&self, name: &str) -> Option<&InstallDef> {
        self.winners.get(name)
    }

    /// Node currently holding the winner for `name`
    pub fn node_of(&self, name: &str) -> Option<NodeId> {
        self.nodes.get(name).copied()
    }

    /// All winners in name order, provided names included
    pub fn winners(&self) -> impl Iterator<Item = &InstallDef> {
        self.winners.values()
    }

    /// Winners that correspond to something on disk, in name order
    pub fn fetchable(&self) -> impl Iterator<Item = &InstallDef> {
        self.winners.values().filter(|def| def.is_fetchable())
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub(crate) fn record(&mut self, def: InstallDef, node: NodeId) {
        self.nodes.insert(def.name.clone(), node);
        self.winners.insert(def.name.clone(), def);
    }
}
