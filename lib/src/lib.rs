//! Converts elabFTW ELN exports into an RDF graph, driven entirely by a
//! declarative YAML keymap: node rules template subject IRIs from record
//! data, edge rules wire the produced subjects together.
//!
//! The per-record entry point is [`mapper::map_record`]; the surrounding
//! plumbing (archive iteration, record extraction, keymap loading, Turtle
//! serialization, dot export) lives in the sibling modules.

pub mod archive;
pub mod consts;
pub mod errors;
pub mod graph;
pub mod mapper;
pub mod mapping;
pub mod record;
pub mod uri;
pub mod viz;
