//! Typed records extracted from one exported JSON document.

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Value/unit/type data extracted for one record field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldData {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Declared datatype; `"number"` requests numeric coercion, anything
    /// else (or nothing) yields a textual literal.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl FieldData {
    pub fn from_value(value: Value) -> Self {
        FieldData {
            value: Some(value),
            unit: None,
            kind: None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.as_deref() == Some("number")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    Incomplete,
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Completeness::Complete => write!(f, "complete"),
            Completeness::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// One experiment's metadata: a fixed set of identity attributes plus the
/// extra-fields map. Built once per exported document and consumed exactly
/// once by the record mapper.
#[derive(Debug, Clone)]
pub struct Record {
    pub elabid: String,
    pub group: String,
    pub institute: String,
    pub last_name: String,
    pub experiments_links: Vec<Value>,
    pub fields: HashMap<String, FieldData>,
    pub completeness: Completeness,
}

impl Record {
    /// Field lookup for the node materializer. Identity attributes shadow
    /// the extra-fields map: when a node rule's `json_field` names one of
    /// them, the attribute is wrapped as a bare value with no unit or
    /// declared type. Unknown names yield empty field data.
    pub fn field_data(&self, name: &str) -> FieldData {
        match name {
            "elabid" => FieldData::from_value(self.elabid.clone().into()),
            "group" => FieldData::from_value(self.group.clone().into()),
            "Institute" => FieldData::from_value(self.institute.clone().into()),
            "LastName" => FieldData::from_value(self.last_name.clone().into()),
            "experiments_links" => {
                FieldData::from_value(Value::Array(self.experiments_links.clone()))
            }
            "data_completeness" => FieldData::from_value(self.completeness.to_string().into()),
            _ => self.fields.get(name).cloned().unwrap_or_default(),
        }
    }
}

/// Returns the title of the first linked item with category `Group`,
/// suffixed with `suffix`. A record with no group item gets the default
/// label and a warning; the mapper only ever sees the degraded field.
pub fn group_name(items: &[Value], suffix: &str, default: &str, separator: &str) -> String {
    for item in items {
        if item.get("category").and_then(Value::as_str) == Some("Group") {
            if let Some(title) = item.get("title").and_then(Value::as_str) {
                return format!("{title}{separator}{suffix}");
            }
        }
    }
    warn!("Group name is missing. Using default label.");
    default.to_string()
}

/// Extracts one [`Record`] from the JSON export of an elabFTW experiment.
/// Exports wrap the experiment in a single-element array; both the wrapped
/// and the bare form are accepted. Missing attributes degrade to empty
/// strings and mark the record incomplete rather than failing the run.
pub fn parse_export(json: &Value, institute: &str) -> Record {
    let json = json.get(0).unwrap_or(json);

    let elabid = json
        .get("elabid")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let suffix: String = elabid.chars().take(4).collect();

    let items_links = json
        .get("items_links")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let group = group_name(items_links, &suffix, "", "-");

    let last_name = json
        .get("lastname")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let experiments_links = json
        .get("experiments_links")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let fields = match json.get("metadata").and_then(|m| m.get("extra_fields")) {
        Some(extra) => match serde_json::from_value(extra.clone()) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Could not parse extra_fields: {}", e);
                HashMap::new()
            }
        },
        None => {
            warn!("Record '{}' carries no extra_fields metadata", elabid);
            HashMap::new()
        }
    };

    let identity = [&elabid, &group, institute, &last_name];
    let completeness = if identity.iter().any(|s| s.is_empty()) {
        Completeness::Incomplete
    } else {
        Completeness::Complete
    };

    Record {
        elabid,
        group,
        institute: institute.to_string(),
        last_name,
        experiments_links,
        fields,
        completeness,
    }
}
