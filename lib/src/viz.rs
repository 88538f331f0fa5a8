//! GraphViz export of the output graph.

use crate::graph::OutputGraph;
use oxigraph::model::{SubjectRef, TermRef};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

// keep the part after the last / or # so labels stay readable
fn local_name(iri: &str) -> String {
    iri.rsplit(['/', '#']).next().unwrap_or(iri).to_string()
}

fn term_label(term: TermRef<'_>) -> String {
    match term {
        TermRef::NamedNode(n) => local_name(n.as_str()),
        TermRef::Literal(l) => l.value().to_string(),
        other => other.to_string(),
    }
}

fn subject_label(subject: SubjectRef<'_>) -> String {
    match subject {
        SubjectRef::NamedNode(n) => local_name(n.as_str()),
        other => other.to_string(),
    }
}

/// Returns the GraphViz dot representation of the triple set: subjects and
/// objects become nodes, predicates become edge labels (local name only).
pub fn graph_to_dot(graph: &OutputGraph) -> String {
    let mut dot_graph: DiGraph<String, String> = DiGraph::new();
    let mut indexes: HashMap<String, NodeIndex> = HashMap::new();

    for triple in graph.iter() {
        let subject_index = *indexes
            .entry(triple.subject.to_string())
            .or_insert_with(|| dot_graph.add_node(subject_label(triple.subject)));
        let object_index = *indexes
            .entry(triple.object.to_string())
            .or_insert_with(|| dot_graph.add_node(term_label(triple.object)));
        dot_graph.add_edge(
            subject_index,
            object_index,
            local_name(triple.predicate.as_str()),
        );
    }

    // Display formatting keeps the String weights unescaped in the labels
    let dot = petgraph::dot::Dot::with_config(&dot_graph, &[]);
    format!("{}", dot)
}
