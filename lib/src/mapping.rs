//! The declarative keymap driving node and edge construction.
//! Loaded once per run from YAML and shared read-only across all records.

use crate::consts::DEFAULT_UNIT_NAMESPACE;
use crate::errors::MappingStructureError;
use anyhow::Result;
use indexmap::IndexMap;
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;

fn default_unit_namespace() -> String {
    DEFAULT_UNIT_NAMESPACE.to_string()
}

/// One node rule: how one record field becomes one graph subject.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NodeRule {
    /// Subject IRI template; `{elabid}` is replaced with the sanitized
    /// record identifier before resolution.
    pub subject_template: String,
    /// Record field supplying value/unit data for this node, if any.
    #[serde(default)]
    pub json_field: Option<String>,
    /// Types asserted on the produced subject, prefixed or absolute.
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Mapping {
    /// Prefix → namespace base. Bound to the output graph once per run.
    pub namespaces: HashMap<String, String>,
    /// Node rules in declared order; edges reference them by name.
    pub nodes: IndexMap<String, NodeRule>,
    /// Predicate → source node name → target node names.
    #[serde(default)]
    pub edges: HashMap<String, HashMap<String, Vec<String>>>,
    #[serde(default = "default_unit_namespace")]
    pub unit_namespace: String,
    pub unit_predicate: String,
    pub value_predicate: String,
}

impl Mapping {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let mapping: Mapping = serde_yaml::from_str(s)?;
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mapping: Mapping = serde_yaml::from_reader(BufReader::new(file))?;
        mapping.validate()?;
        info!("Keymap loaded from {}", path.display());
        Ok(mapping)
    }

    /// A malformed keymap cannot safely process any record, so structural
    /// defects are fatal for the whole run.
    fn validate(&self) -> Result<(), MappingStructureError> {
        for (name, rule) in &self.nodes {
            if rule.subject_template.is_empty() {
                return Err(MappingStructureError {
                    section: format!("nodes.{name}"),
                    message: "subject_template must not be empty".to_string(),
                });
            }
        }
        for (section, value) in [
            ("unit_predicate", &self.unit_predicate),
            ("value_predicate", &self.value_predicate),
        ] {
            if value.is_empty() {
                return Err(MappingStructureError {
                    section: section.to_string(),
                    message: "predicate must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
