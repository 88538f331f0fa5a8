// Keymap structure error

use std::fmt;

#[derive(Debug)]
pub struct MappingStructureError {
    pub section: String,
    pub message: String,
}

impl fmt::Display for MappingStructureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Malformed keymap section '{}': {}",
            self.section, self.message
        )
    }
}

impl std::error::Error for MappingStructureError {}
