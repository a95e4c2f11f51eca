//! BuildGraph - the resolved project graph of one invocation.
//!
//! Once built, a BuildGraph is read-only. Edges point from a project to the
//! projects it requires. Nodes are inserted in name order, so two graphs
//! over the same projects are identical no matter in which order the root
//! declared its members.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use petgraph::Direction;

use crate::core::ProjectName;
use crate::resolver::node::ProjectNode;

/// The closure of all project nodes reachable from the root.
#[derive(Debug)]
pub struct BuildGraph {
    /// Name of the owning root composite
    root: String,

    /// Project graph, edges point at requirements
    graph: DiGraph<ProjectName, ()>,

    /// Map from project name to node index
    index: HashMap<ProjectName, NodeIndex>,

    /// Materialized nodes by name
    nodes: BTreeMap<ProjectName, Arc<ProjectNode>>,

    /// Projects the root requires directly, in declaration order
    top_level: Vec<ProjectName>,
}

impl BuildGraph {
    /// Collect everything reachable from `top_level`.
    pub fn from_roots(root: impl Into<String>, top_level: &[Arc<ProjectNode>]) -> Self {
        let mut nodes = BTreeMap::new();
        let mut stack: Vec<Arc<ProjectNode>> = top_level.to_vec();
        while let Some(node) = stack.pop() {
            if nodes.contains_key(node.name()) {
                continue;
            }
            stack.extend(node.dependencies().iter().cloned());
            nodes.insert(node.name().clone(), node);
        }

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for name in nodes.keys() {
            index.insert(name.clone(), graph.add_node(name.clone()));
        }
        for (name, node) in &nodes {
            let from = index[name];
            for dep in node.dependencies() {
                let to = index[dep.name()];
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        BuildGraph {
            root: root.into(),
            graph,
            index,
            nodes,
            top_level: top_level.iter().map(|n| n.name().clone()).collect(),
        }
    }

    /// Name of the root composite.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of project nodes (the root itself is not a node).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Arc<ProjectNode>> {
        self.nodes.get(name)
    }

    /// All nodes, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<ProjectNode>> {
        self.nodes.values()
    }

    /// Projects the root requires directly.
    pub fn top_level(&self) -> &[ProjectName] {
        &self.top_level
    }

    /// Direct requirements of a project.
    pub fn deps(&self, name: &str) -> Vec<ProjectName> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Projects that require the given project.
    pub fn dependents(&self, name: &str) -> Vec<ProjectName> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<ProjectName> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<_> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names
    }

    /// Every edge as `(project, requirement)`.
    pub fn edges(&self) -> BTreeSet<(ProjectName, ProjectName)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].clone(), self.graph[b].clone()))
            .collect()
    }

    /// Project names, sorted.
    pub fn names(&self) -> BTreeSet<ProjectName> {
        self.nodes.keys().cloned().collect()
    }

    /// Projects with requirements before the projects that require them.
    pub fn build_order(&self) -> Vec<ProjectName> {
        let mut topo = Topo::new(&self.graph);
        let mut order = Vec::new();
        while let Some(idx) = topo.next(&self.graph) {
            order.push(self.graph[idx].clone());
        }
        // Topo yields a project before its requirements; flip it.
        order.reverse();
        order
    }

    /// Group projects into waves that can be built in parallel.
    ///
    /// Every project lands in the wave after the last of its requirements;
    /// projects without requirements form wave 0.
    pub fn waves(&self) -> Vec<Vec<ProjectName>> {
        let mut level: HashMap<ProjectName, usize> = HashMap::new();
        for name in self.build_order() {
            let wave = self
                .deps(name.as_str())
                .iter()
                .filter_map(|dep| level.get(dep))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            level.insert(name, wave);
        }

        let depth = level.values().copied().max().map_or(0, |m| m + 1);
        let mut waves = vec![Vec::new(); depth];
        for (name, wave) in level {
            waves[wave].push(name);
        }
        for wave in &mut waves {
            wave.sort();
        }
        waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionSet;
    use crate::core::target::TargetDescriptor;

    fn node(name: &str, deps: &[&Arc<ProjectNode>]) -> Arc<ProjectNode> {
        Arc::new(ProjectNode::new(
            ProjectName::new(name).unwrap(),
            name.into(),
            TargetDescriptor::exe(name).with_sources(["main.cpp"]),
            deps.iter().map(|d| Arc::clone(d)).collect(),
            Arc::new(OptionSet::new()),
        ))
    }

    #[test]
    fn test_shared_dependency_appears_once() {
        let d = node("d", &[]);
        let p1 = node("p1", &[&d]);
        let p2 = node("p2", &[&d]);

        let graph = BuildGraph::from_roots("root", &[p1, p2]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependents("d").len(), 2);
        assert_eq!(graph.deps("p1"), vec![ProjectName::new("d").unwrap()]);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_build_order_puts_requirements_first() {
        let c = node("c", &[]);
        let b = node("b", &[&c]);
        let a = node("a", &[&b]);

        let graph = BuildGraph::from_roots("root", &[a]);
        let order: Vec<_> = graph.build_order().iter().map(|n| n.to_string()).collect();

        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_waves() {
        let base = node("base", &[]);
        let util = node("util", &[]);
        let mid = node("mid", &[&base]);
        let app = node("app", &[&mid, &util]);
        let tool = node("tool", &[&base]);

        let graph = BuildGraph::from_roots("root", &[app, tool]);
        let waves: Vec<Vec<String>> = graph
            .waves()
            .into_iter()
            .map(|w| w.iter().map(|n| n.to_string()).collect())
            .collect();

        assert_eq!(
            waves,
            vec![
                vec!["base", "util"],
                vec!["mid", "tool"],
                vec!["app"],
            ]
        );
    }

    #[test]
    fn test_empty_graph() {
        let graph = BuildGraph::from_roots("root", &[]);
        assert!(graph.is_empty());
        assert!(graph.waves().is_empty());
        assert!(graph.build_order().is_empty());
    }
}
