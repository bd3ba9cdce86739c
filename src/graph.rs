//! Build the inter-definition dependency graph and topologically sort it.
//!
//! Emission order matters: a struct must be declared after every type it
//! names by value (not behind a `shared_handle<>` indirection), and aliases
//! must follow whatever they expand to. We model this as a graph over
//! `(Kind, name)` nodes and run Kahn's algorithm with a sorted frontier so
//! that two schemas with the same definitions in different source order
//! produce byte-identical output.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::diagnostics::Diagnostics;
use crate::flatten::collect_flattened_properties;
use crate::model::*;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Struct,
    Enum,
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
}

impl Node {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Node { kind, name: name.into() }
    }
}

/// Collect every node and its structural dependency edges.
fn build_nodes_and_edges(model: &SchemaModel, renderer: &Renderer) -> (Vec<Node>, Vec<(Node, Node)>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for name in model.structs.keys() {
        nodes.push(Node::new(NodeKind::Struct, name));
    }
    for name in model.enums.keys() {
        nodes.push(Node::new(NodeKind::Enum, name));
    }
    for name in model.aliases.keys() {
        if !is_recursive_alias(name) {
            nodes.push(Node::new(NodeKind::Alias, name));
        }
    }

    for (name, def) in &model.structs {
        if def.parents.len() > 1 {
            for parent in &def.parents {
                push_dependency_edge(model, &mut edges, Node::new(NodeKind::Struct, name), parent);
            }
        }
        for flat in collect_flattened_properties(model, name) {
            // The dependency *edge* always attaches to the struct whose emitted
            // block needs it (`name`), but self-recursion is judged against the
            // property's *declaring* struct, matching the renderer's own
            // `current_struct` choice (§4.6: flattened properties are walked
            // "using the property's declared-in struct as current_struct"), so
            // an inherited self-referencing field still breaks via
            // `shared_handle<T>` instead of forcing the parent to precede every
            // descendant that flattens it in.
            collect_type_dependencies(model, renderer, &flat.prop.type_expr, name, &flat.declared_in, &mut edges);
        }
    }

    for (name, def) in &model.aliases {
        if is_recursive_alias(name) {
            continue;
        }
        collect_type_dependencies(model, renderer, &def.type_expr, name, name, &mut edges);
    }

    (nodes, edges)
}

fn push_dependency_edge(model: &SchemaModel, edges: &mut Vec<(Node, Node)>, from: Node, dep_name: &str) {
    let to = if model.is_struct(dep_name) {
        Node::new(NodeKind::Struct, dep_name)
    } else if model.is_enum(dep_name) {
        Node::new(NodeKind::Enum, dep_name)
    } else if model.is_alias(dep_name) && !is_recursive_alias(dep_name) {
        Node::new(NodeKind::Alias, dep_name)
    } else {
        return;
    };
    if to != from {
        edges.push((from, to));
    }
}

fn node_kind_of(model: &SchemaModel, name: &str) -> NodeKind {
    if model.is_struct(name) {
        NodeKind::Struct
    } else if model.is_enum(name) {
        NodeKind::Enum
    } else {
        NodeKind::Alias
    }
}

/// Walk a type expression for by-value (non-self, non-recursive-alias)
/// dependencies on other definitions.
///
/// `from_name` is the definition whose emitted block the resulting edges
/// attach to (the struct/enum/alias actually being built); `self_ref` is the
/// definition the expression was *declared in*, used only to detect (and
/// skip) self-recursion. The two differ for an inherited property reached
/// through single-parent flattening: the edge belongs to the descendant
/// struct, but a field typed as the *parent* itself is still a self-reference
/// relative to the parent, broken by a `shared_handle<T>` indirection rather
/// than a hard edge, regardless of which descendant flattened it in.
fn collect_type_dependencies(
    model: &SchemaModel,
    renderer: &Renderer,
    expr: &TypeExpr,
    from_name: &str,
    self_ref: &str,
    edges: &mut Vec<(Node, Node)>,
) {
    match expr {
        TypeExpr::Base(_) => {}
        TypeExpr::Reference(name) => {
            if name == self_ref {
                return; // self-recursion: no structural edge, breaks via shared_handle
            }
            let from_kind = node_kind_of(model, from_name);
            push_dependency_edge(model, edges, Node::new(from_kind, from_name), name);
        }
        TypeExpr::Array(elem) => collect_type_dependencies(model, renderer, elem, from_name, self_ref, edges),
        TypeExpr::Map { key, value } => {
            collect_type_dependencies(model, renderer, key, from_name, self_ref, edges);
            collect_type_dependencies(model, renderer, value, from_name, self_ref, edges);
        }
        TypeExpr::Tuple(items) | TypeExpr::Or(items) | TypeExpr::And(items) => {
            for item in items {
                collect_type_dependencies(model, renderer, item, from_name, self_ref, edges);
            }
        }
        TypeExpr::Literal => {}
        TypeExpr::StringLiteral(value) => {
            if let Some(owner) = renderer.unique_owner_enum(value) {
                let from_kind = node_kind_of(model, from_name);
                push_dependency_edge(model, edges, Node::new(from_kind, from_name), owner);
            }
        }
        TypeExpr::IntegerLiteral(_) | TypeExpr::BooleanLiteral(_) => {}
    }
}

/// Topologically sort every struct/enum/alias node so that every
/// definition is emitted after the definitions it structurally depends on.
/// Ties are broken by `(kind, name)` order, which is what makes the output
/// independent of the input JSON's definition order. If the graph has a
/// cycle, a [`crate::diagnostics::DiagnosticKind::GraphAnomaly`] is raised
/// and the remaining nodes are appended in sorted order so emission can
/// still complete.
pub fn topo_sort(model: &SchemaModel, renderer: &Renderer, diagnostics: &mut Diagnostics) -> Vec<Node> {
    let (nodes, edges) = build_nodes_and_edges(model, renderer);

    let mut graph: DiGraph<Node, ()> = DiGraph::new();
    let mut index_of: BTreeMap<Node, NodeIndex> = BTreeMap::new();
    for node in &nodes {
        let idx = graph.add_node(node.clone());
        index_of.insert(node.clone(), idx);
    }

    let mut seen_edges = BTreeSet::new();
    for (from, to) in edges {
        if seen_edges.insert((from.clone(), to.clone())) {
            if let (Some(&fi), Some(&ti)) = (index_of.get(&from), index_of.get(&to)) {
                graph.add_edge(fi, ti, ());
            }
        }
    }

    // A dependency edge `from -> to` means "from requires to to come first",
    // so Kahn's algorithm here pops nodes whose dependencies are already
    // satisfied, i.e. zero *out*-degree remaining — we walk edges reversed
    // by tracking how many outgoing deps are left per node.
    let mut remaining_deps: BTreeMap<NodeIndex, usize> = BTreeMap::new();
    for idx in graph.node_indices() {
        remaining_deps.insert(idx, graph.edges(idx).count());
    }
    let mut dependents: BTreeMap<NodeIndex, Vec<NodeIndex>> = BTreeMap::new();
    for edge in graph.edge_indices() {
        let (source, target) = graph.edge_endpoints(edge).unwrap();
        dependents.entry(target).or_default().push(source);
    }

    let mut ready: BTreeSet<NodeIndex> = remaining_deps
        .iter()
        .filter(|(_, &count)| count == 0)
        .map(|(&idx, _)| idx)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    let mut emitted = vec![false; graph.node_count()];

    while let Some(&idx) = sorted_frontier(&ready, &graph).first() {
        ready.remove(&idx);
        emitted[idx.index()] = true;
        order.push(graph[idx].clone());

        if let Some(deps) = dependents.get(&idx) {
            for &dependent in deps {
                let left = remaining_deps.get_mut(&dependent).unwrap();
                *left -= 1;
                if *left == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() < nodes.len() {
        diagnostics.graph_anomaly(format!(
            "dependency graph has a cycle; {} of {} definitions could not be topologically ordered and were appended in sorted order",
            nodes.len() - order.len(),
            nodes.len()
        ));
        let mut leftover: Vec<Node> = graph
            .node_indices()
            .filter(|idx| !emitted[idx.index()])
            .map(|idx| graph[idx].clone())
            .collect();
        leftover.sort();
        order.extend(leftover);
    }

    order
}

fn sorted_frontier<'a>(ready: &BTreeSet<NodeIndex>, graph: &'a DiGraph<Node, ()>) -> Vec<NodeIndex> {
    let mut frontier: Vec<NodeIndex> = ready.iter().copied().collect();
    frontier.sort_by(|&a, &b| graph[a].cmp(&graph[b]));
    frontier
}
