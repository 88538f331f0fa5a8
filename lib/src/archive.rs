//! Iteration over JSON documents inside an ELN (zip) export.

use anyhow::Result;
use log::{info, warn};
use serde_json::Value;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Collects every JSON document in the archive whose entry name ends with
/// `pattern`, recursing into nested `.eln` archives. Unreadable entries
/// and undecodable JSON are logged and skipped; macOS resource-fork
/// entries are ignored.
pub fn read_records<R: Read + Seek>(reader: R, pattern: &str) -> Result<Vec<(String, Value)>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut records = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading archive entry {}: {}", index, e);
                continue;
            }
        };
        let name = entry.name().to_string();
        if name.contains("__MACOSX") {
            continue;
        }
        if name.ends_with(pattern) {
            let mut contents = String::new();
            if let Err(e) = entry.read_to_string(&mut contents) {
                warn!("Error processing file {}: {}", name, e);
                continue;
            }
            match serde_json::from_str(&contents) {
                Ok(data) => {
                    info!("Processing file {}", name);
                    records.push((name, data));
                }
                Err(e) => warn!("Error decoding JSON from file {}: {}", name, e),
            }
        } else if name.ends_with(".eln") {
            // nested export; recurse into it
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                warn!("Error reading nested archive ({}): {}", name, e);
                continue;
            }
            info!("Processing ELN export: ({})", name);
            match read_records(Cursor::new(bytes), pattern) {
                Ok(nested) => records.extend(nested),
                Err(e) => warn!("Error processing nested archive ({}): {}", name, e),
            }
        }
    }
    Ok(records)
}

pub fn read_records_from_file(path: &Path, pattern: &str) -> Result<Vec<(String, Value)>> {
    let file = std::fs::File::open(path)?;
    read_records(file, pattern)
}
