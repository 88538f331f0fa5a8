//! Mapping-driven construction of record subjects and their edges.
//!
//! `map_record` is the per-record entry point: it materializes one subject
//! per node rule, collects them in a named-subject table, then wires the
//! keymap's edges between them. All nodes are materialized before any edge
//! is wired, since edges reference nodes by rule name.

use crate::consts::TYPE;
use crate::graph::OutputGraph;
use crate::mapping::{Mapping, NodeRule};
use crate::record::{FieldData, Record};
use crate::uri::{sanitize_uri_component, NamespaceMap};
use anyhow::Result;
use log::{debug, warn};
use oxigraph::model::vocab::xsd;
use oxigraph::model::{Literal, NamedNode, TripleRef};
use serde_json::Value;
use std::collections::HashMap;

const ELABID_PLACEHOLDER: &str = "{elabid}";

/// Produces the subject for one node rule and appends its type, unit and
/// value triples to the graph. Returns the subject so the orchestrator can
/// record it under the rule's name for edge wiring.
pub fn materialize_node(
    rule: &NodeRule,
    record: &Record,
    namespaces: &NamespaceMap,
    unit_predicate: &NamedNode,
    value_predicate: &NamedNode,
    unit_namespace: &str,
    graph: &mut OutputGraph,
) -> Result<NamedNode> {
    let field_data = match rule.json_field.as_deref() {
        Some(name) => record.field_data(name),
        None => FieldData::default(),
    };

    let subject_str = rule
        .subject_template
        .replace(ELABID_PLACEHOLDER, &sanitize_uri_component(&record.elabid));
    let subject = namespaces.resolve(&subject_str)?;

    for rdf_type in &rule.types {
        let object = namespaces.resolve(rdf_type)?;
        graph.insert(TripleRef::new(&subject, TYPE, &object));
    }

    if let Some(unit) = &field_data.unit {
        let term = format!("{}:{}", unit_namespace, sanitize_uri_component(unit));
        let unit_uri = namespaces.resolve(&term)?;
        graph.insert(TripleRef::new(&subject, unit_predicate, &unit_uri));
    }

    if let Some(value) = &field_data.value {
        let literal = coerce_literal(value, field_data.is_numeric());
        graph.insert(TripleRef::new(&subject, value_predicate, &literal));
    }

    Ok(subject)
}

// A declared number that fails to parse degrades to a string literal;
// bad field data must not abort the record.
fn coerce_literal(value: &Value, numeric: bool) -> Literal {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if numeric {
        match text.parse::<f32>() {
            Ok(number) => return Literal::from(number),
            Err(_) => warn!("Could not convert value '{}' to a number. Using string.", text),
        }
    }
    Literal::new_typed_literal(text, xsd::STRING)
}

/// Appends one relationship triple per resolvable (source, target) pair in
/// the edge table. An edge end that was never materialized skips that one
/// edge with a warning; the remaining edges still get wired.
pub fn wire_edges(
    edges: &HashMap<String, HashMap<String, Vec<String>>>,
    subjects: &HashMap<String, NamedNode>,
    namespaces: &NamespaceMap,
    graph: &mut OutputGraph,
) -> Result<()> {
    for (predicate, source_targets) in edges {
        let predicate_uri = namespaces.resolve(predicate)?;
        for (source_name, target_names) in source_targets {
            let source = match subjects.get(source_name) {
                Some(source) => source,
                None => {
                    warn!(
                        "Edge {} references unmaterialized source node '{}'; skipping",
                        predicate, source_name
                    );
                    continue;
                }
            };
            for target_name in target_names {
                let target = match subjects.get(target_name) {
                    Some(target) => target,
                    None => {
                        warn!(
                            "Edge {} references unmaterialized target node '{}'; skipping",
                            predicate, target_name
                        );
                        continue;
                    }
                };
                graph.insert(TripleRef::new(source, &predicate_uri, target));
            }
        }
    }
    Ok(())
}

/// Maps one record into the shared output graph using the keymap.
pub fn map_record(record: &Record, mapping: &Mapping, graph: &mut OutputGraph) -> Result<()> {
    // prefixes bound at graph creation apply to every record
    let namespaces = graph.namespaces().clone();

    let unit_predicate = namespaces.resolve(&mapping.unit_predicate)?;
    let value_predicate = namespaces.resolve(&mapping.value_predicate)?;

    let mut subjects: HashMap<String, NamedNode> = HashMap::new();
    for (name, rule) in &mapping.nodes {
        let subject = materialize_node(
            rule,
            record,
            &namespaces,
            &unit_predicate,
            &value_predicate,
            &mapping.unit_namespace,
            graph,
        )?;
        debug!("Materialized node '{}' as {}", name, subject);
        subjects.insert(name.clone(), subject);
    }

    wire_edges(&mapping.edges, &subjects, &namespaces, graph)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Completeness;
    use serde_json::json;

    fn namespaces() -> NamespaceMap {
        [
            ("ex", "http://example.org/"),
            ("qudt", "http://qudt.org/vocab/unit/"),
        ]
        .into_iter()
        .collect()
    }

    fn record_with_field(name: &str, data: FieldData) -> Record {
        Record {
            elabid: "ab12cd".to_string(),
            group: "Lab-ab12".to_string(),
            institute: "Sample Institute".to_string(),
            last_name: "Curie".to_string(),
            experiments_links: vec![],
            fields: [(name.to_string(), data)].into_iter().collect(),
            completeness: Completeness::Complete,
        }
    }

    fn predicates(ns: &NamespaceMap) -> (NamedNode, NamedNode) {
        (
            ns.resolve("ex:hasUnit").unwrap(),
            ns.resolve("ex:hasValue").unwrap(),
        )
    }

    #[test]
    fn test_materialize_asserts_types() {
        let ns = namespaces();
        let (unit_p, value_p) = predicates(&ns);
        let rule = NodeRule {
            subject_template: "ex:Sample-{elabid}".to_string(),
            json_field: None,
            types: vec!["ex:Sample".to_string()],
        };
        let record = record_with_field("unused", FieldData::default());
        let mut graph = OutputGraph::new();

        let subject =
            materialize_node(&rule, &record, &ns, &unit_p, &value_p, "qudt", &mut graph).unwrap();
        assert_eq!(subject.as_str(), "http://example.org/Sample-ab12cd");
        assert_eq!(graph.len(), 1);
        let object = NamedNode::new("http://example.org/Sample").unwrap();
        assert!(graph.contains(TripleRef::new(&subject, TYPE, &object)));
    }

    #[test]
    fn test_materialize_unit_and_numeric_value() {
        let ns = namespaces();
        let (unit_p, value_p) = predicates(&ns);
        let rule = NodeRule {
            subject_template: "ex:Mass-{elabid}".to_string(),
            json_field: Some("mass".to_string()),
            types: vec![],
        };
        let data = FieldData {
            value: Some(json!("3.14")),
            unit: Some("milli gram".to_string()),
            kind: Some("number".to_string()),
        };
        let record = record_with_field("mass", data);
        let mut graph = OutputGraph::new();

        let subject =
            materialize_node(&rule, &record, &ns, &unit_p, &value_p, "qudt", &mut graph).unwrap();
        let unit = NamedNode::new("http://qudt.org/vocab/unit/milli_gram").unwrap();
        assert!(graph.contains(TripleRef::new(&subject, &unit_p, &unit)));
        let literal = Literal::from(3.14_f32);
        assert!(graph.contains(TripleRef::new(&subject, &value_p, &literal)));
    }

    #[test]
    fn test_coercion_failure_falls_back_to_string() {
        let ns = namespaces();
        let (unit_p, value_p) = predicates(&ns);
        let rule = NodeRule {
            subject_template: "ex:Mass-{elabid}".to_string(),
            json_field: Some("mass".to_string()),
            types: vec![],
        };
        let data = FieldData {
            value: Some(json!("abc")),
            unit: None,
            kind: Some("number".to_string()),
        };
        let record = record_with_field("mass", data);
        let mut graph = OutputGraph::new();

        let subject =
            materialize_node(&rule, &record, &ns, &unit_p, &value_p, "qudt", &mut graph).unwrap();
        let literal = Literal::new_typed_literal("abc", xsd::STRING);
        assert!(graph.contains(TripleRef::new(&subject, &value_p, &literal)));
    }

    #[test]
    fn test_identity_attribute_shadows_extra_fields() {
        let ns = namespaces();
        let (unit_p, value_p) = predicates(&ns);
        let rule = NodeRule {
            subject_template: "ex:Author-{elabid}".to_string(),
            json_field: Some("LastName".to_string()),
            types: vec![],
        };
        let record = record_with_field("unused", FieldData::default());
        let mut graph = OutputGraph::new();

        let subject =
            materialize_node(&rule, &record, &ns, &unit_p, &value_p, "qudt", &mut graph).unwrap();
        let literal = Literal::new_typed_literal("Curie", xsd::STRING);
        assert!(graph.contains(TripleRef::new(&subject, &value_p, &literal)));
    }

    #[test]
    fn test_wire_edges_connects_named_subjects() {
        let ns = namespaces();
        let a = NamedNode::new("http://example.org/a").unwrap();
        let b = NamedNode::new("http://example.org/b").unwrap();
        let subjects: HashMap<String, NamedNode> =
            [("a".to_string(), a.clone()), ("b".to_string(), b.clone())]
                .into_iter()
                .collect();
        let edges: HashMap<String, HashMap<String, Vec<String>>> = [(
            "ex:linksTo".to_string(),
            [("a".to_string(), vec!["b".to_string()])]
                .into_iter()
                .collect(),
        )]
        .into_iter()
        .collect();
        let mut graph = OutputGraph::new();

        wire_edges(&edges, &subjects, &ns, &mut graph).unwrap();
        assert_eq!(graph.len(), 1);
        let predicate = NamedNode::new("http://example.org/linksTo").unwrap();
        assert!(graph.contains(TripleRef::new(&a, &predicate, &b)));
    }

    #[test]
    fn test_unresolved_edge_skips_without_aborting() {
        let ns = namespaces();
        let a = NamedNode::new("http://example.org/a").unwrap();
        let b = NamedNode::new("http://example.org/b").unwrap();
        let subjects: HashMap<String, NamedNode> =
            [("a".to_string(), a.clone()), ("b".to_string(), b.clone())]
                .into_iter()
                .collect();
        // one edge references a node that was never materialized
        let edges: HashMap<String, HashMap<String, Vec<String>>> = [(
            "ex:linksTo".to_string(),
            [
                ("a".to_string(), vec!["ghost".to_string(), "b".to_string()]),
                ("ghost".to_string(), vec!["a".to_string()]),
            ]
            .into_iter()
            .collect(),
        )]
        .into_iter()
        .collect();
        let mut graph = OutputGraph::new();

        wire_edges(&edges, &subjects, &ns, &mut graph).unwrap();
        // only a -> b survives
        assert_eq!(graph.len(), 1);
        let predicate = NamedNode::new("http://example.org/linksTo").unwrap();
        assert!(graph.contains(TripleRef::new(&a, &predicate, &b)));
    }
}
