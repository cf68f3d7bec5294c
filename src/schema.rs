use std::io;
use std::path::Path;

/// A structural type description: the target type name plus the TypeScript
/// interface source declaring the expected shape of the JSON output.
///
/// Loaded once per validator instance and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: String,
    source: String,
}

impl Schema {
    pub fn new(type_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// Read the schema source from a `.ts` file on disk.
    pub fn from_file(type_name: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::new(type_name, source))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
