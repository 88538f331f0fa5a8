//! Constant NamedNodeRefs and defaults used by the mapper.

use oxigraph::model::NamedNodeRef;

pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

/// Prefix used for unit terms when the keymap does not declare one.
pub const DEFAULT_UNIT_NAMESPACE: &str = "qudt";

/// Filename suffix matched against JSON entries inside an ELN export.
pub const DEFAULT_PATTERN: &str = "ftw.json";
