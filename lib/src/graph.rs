//! Append-only output graph: a triple set plus the prefix bindings that
//! apply to every record mapped during one run.

use crate::uri::NamespaceMap;
use anyhow::Result;
use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{Graph, TripleRef};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct OutputGraph {
    graph: Graph,
    namespaces: NamespaceMap,
}

impl OutputGraph {
    pub fn new() -> Self {
        OutputGraph {
            graph: Graph::new(),
            namespaces: NamespaceMap::new(),
        }
    }

    /// Creates a graph with the given prefixes bound. Bindings performed
    /// here apply to every record mapped into the graph afterwards.
    pub fn with_prefixes(prefixes: &HashMap<String, String>) -> Self {
        let mut graph = Self::new();
        for (prefix, base) in prefixes {
            graph.bind(prefix, base);
        }
        graph
    }

    pub fn bind(&mut self, prefix: &str, base: &str) {
        debug!("Binding prefix {} to URI {}", prefix, base);
        self.namespaces.bind(prefix, base);
    }

    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Appends a triple. Re-inserting an identical triple is a no-op, so
    /// mapping the same data twice cannot duplicate statements.
    pub fn insert(&mut self, triple: TripleRef<'_>) {
        self.graph.insert(triple);
    }

    pub fn contains(&self, triple: TripleRef<'_>) -> bool {
        self.graph.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.iter()
    }

    /// Serializes the triple set as Turtle with all bound prefixes.
    pub fn write_turtle(&self, file: &Path) -> Result<()> {
        info!(
            "Writing graph to file: {} with length {}",
            file.display(),
            self.graph.len()
        );
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for (prefix, base) in self.namespaces.iter() {
            serializer = serializer.with_prefix(prefix, base)?;
        }
        let mut file = std::fs::File::create(file)?;
        let mut writer = serializer.for_writer(&mut file);
        for triple in self.graph.iter() {
            writer.serialize_triple(triple)?;
        }
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::NamedNode;

    #[test]
    fn test_insert_is_idempotent() {
        let mut graph = OutputGraph::new();
        let s = NamedNode::new("http://example.org/s").unwrap();
        let p = NamedNode::new("http://example.org/p").unwrap();
        let o = NamedNode::new("http://example.org/o").unwrap();
        graph.insert(TripleRef::new(&s, &p, &o));
        graph.insert(TripleRef::new(&s, &p, &o));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_write_turtle_binds_prefixes() {
        let mut graph = OutputGraph::new();
        graph.bind("ex", "http://example.org/");
        let s = NamedNode::new("http://example.org/s").unwrap();
        let p = NamedNode::new("http://example.org/p").unwrap();
        let o = NamedNode::new("http://example.org/o").unwrap();
        graph.insert(TripleRef::new(&s, &p, &o));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ttl");
        graph.write_turtle(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("@prefix ex: <http://example.org/>"));
        assert!(content.contains("ex:s ex:p ex:o"));
    }
}
