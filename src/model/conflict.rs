//! Convergence conflict data model
//!
//! A [`Conflict`] owns every dependency path Maven reported for one
//! artifact. Paths are stored as trees in a per-conflict arena; each
//! reported path contributes one root (the module being built) whose single
//! child is the dependency declared in that module's manifest.

use std::fmt::Write as _;

use super::{ArtifactId, Dependency, Scope, Version, VersionPolicy};

/// Index of a node in a conflict's arena
pub type NodeId = usize;

/// A node in a reported dependency path
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictPathNode {
    pub dependency: Dependency,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl ConflictPathNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent node; kept for diagnostics only
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// All reported paths to one conflicting artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    id: ArtifactId,
    version: Version,
    scope: Option<Scope>,
    nodes: Vec<ConflictPathNode>,
    roots: Vec<NodeId>,
}

impl Conflict {
    /// Start a conflict from the artifact named in the report header
    pub fn new(target: Dependency) -> Self {
        Self {
            id: target.id,
            version: target.version,
            scope: target.scope,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Highest version seen for this artifact across all paths
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Highest-priority scope seen for this artifact across all paths
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Roots of the reported paths, in report order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &ConflictPathNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[ConflictPathNode] {
        &self.nodes
    }

    /// Begin a new reported path
    pub fn add_root(&mut self, dependency: Dependency) -> NodeId {
        let id = self.push(dependency, None);
        self.roots.push(id);
        id
    }

    /// Attach `dependency` beneath `parent` and fold it into the aggregate
    /// version/scope when it is an occurrence of this conflict's artifact
    pub fn add_child(
        &mut self,
        parent: NodeId,
        dependency: Dependency,
        policy: &VersionPolicy,
    ) -> NodeId {
        self.absorb(&dependency, policy);
        let id = self.push(dependency, Some(parent));
        self.nodes[parent].children.push(id);
        id
    }

    fn push(&mut self, dependency: Dependency, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(ConflictPathNode {
            dependency,
            children: Vec::new(),
            parent,
        });
        self.nodes.len() - 1
    }

    fn absorb(&mut self, dependency: &Dependency, policy: &VersionPolicy) {
        if !dependency.matches(&self.id) {
            return;
        }
        if policy.compare(&self.id, &dependency.version, &self.version).is_gt() {
            self.version = dependency.version.clone();
        }
        if let Some(scope) = &dependency.scope
            && scope.outranks(self.scope.as_ref())
        {
            self.scope = Some(scope.clone());
        }
    }

    /// Whether any node of any path is an occurrence of `id`
    pub fn references(&self, id: &ArtifactId) -> bool {
        self.nodes.iter().any(|node| node.dependency.matches(id))
    }

    /// Leaf dependencies beneath `node` (the node itself when it has no
    /// children), in depth-first order
    pub fn leaves_under(&self, node: NodeId) -> Vec<&Dependency> {
        let mut leaves = Vec::new();
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let entry = &self.nodes[current];
            if entry.is_leaf() {
                leaves.push(&entry.dependency);
            } else {
                pending.extend(entry.children.iter().rev());
            }
        }
        leaves
    }

    /// Canonical rendering of every path, used to detect an unchanged
    /// report between iterations
    pub fn fingerprint(&self) -> String {
        let mut out = format!("{}\n", self.id);
        for &root in &self.roots {
            let mut pending = vec![(root, 0usize)];
            while let Some((node, depth)) = pending.pop() {
                let entry = &self.nodes[node];
                let _ = writeln!(out, "{:width$}{}", "", entry.dependency, width = depth * 2);
                pending.extend(entry.children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        out
    }
}
