//! Prefixed-term resolution and URI component sanitization.

use anyhow::Result;
use oxigraph::model::NamedNode;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// characters that survive sanitization unencoded
const UNSAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~');

/// Normalizes a free-text field value into a fragment safe to embed in an
/// IRI: spaces become underscores, everything else outside
/// `[A-Za-z0-9_.~-]` is percent-encoded. Deterministic, so identical input
/// data yields identical subject IRIs across runs.
pub fn sanitize_uri_component(text: &str) -> String {
    let underscored = text.replace(' ', "_");
    utf8_percent_encode(&underscored, UNSAFE).to_string()
}

/// Prefix → namespace-base table used to expand prefixed terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceMap(HashMap<String, String>);

impl NamespaceMap {
    pub fn new() -> Self {
        NamespaceMap(HashMap::new())
    }

    pub fn bind(&mut self, prefix: &str, base: &str) {
        self.0.insert(prefix.to_string(), base.to_string());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, b)| (p.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expands `prefix:local` into an absolute IRI using the registered
    /// base for `prefix`. An unknown prefix, or a term with no delimiter
    /// at all, is not an error: the term is treated as already absolute.
    /// This fallback is a contract, not an accident, so keymaps can mix
    /// prefixed shorthand with full IRIs anywhere a term is expected.
    pub fn resolve(&self, term: &str) -> Result<NamedNode> {
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(base) = self.0.get(prefix) {
                return Ok(NamedNode::new(format!("{base}{local}"))?);
            }
        }
        // unknown prefix or no delimiter: already absolute
        Ok(NamedNode::new(term)?)
    }
}

impl From<HashMap<String, String>> for NamespaceMap {
    fn from(map: HashMap<String, String>) -> Self {
        NamespaceMap(map)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for NamespaceMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        NamespaceMap(
            iter.into_iter()
                .map(|(p, b)| (p.to_string(), b.to_string()))
                .collect(),
        )
    }
}
