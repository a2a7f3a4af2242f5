use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const RESIDUE_KEY_LEN: usize = 3;

/// Reactive atom names per residue type.
///
/// Names keep the order in which they first appear in the source; the radical
/// assignment pass walks them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactiveAtomRegistry {
    registry: HashMap<String, Vec<String>>,
}

#[derive(Debug, Error)]
pub enum ReactiveSpecError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("Line {line}: expected 'atom-name residue-name', found '{content}'")]
    Parse { line: usize, content: String },
}

impl ReactiveAtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ReactiveSpecError> {
        let file = std::fs::File::open(path).map_err(|e| ReactiveSpecError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, ReactiveSpecError> {
        let mut registry = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut columns = trimmed.split_whitespace();
            match (columns.next(), columns.next()) {
                (Some(atom_name), Some(residue_name)) => registry.insert(residue_name, atom_name),
                _ => {
                    return Err(ReactiveSpecError::Parse {
                        line: idx + 1,
                        content: line.clone(),
                    });
                }
            }
        }
        Ok(registry)
    }

    pub fn insert(&mut self, residue_name: &str, atom_name: &str) {
        let names = self.registry.entry(residue_name.to_string()).or_default();
        if !names.iter().any(|n| n == atom_name) {
            names.push(atom_name.to_string());
        }
    }

    /// Reactive atom names registered for a residue, looked up by its first three characters.
    pub fn atom_names(&self, residue_name: &str) -> Option<&[String]> {
        self.registry
            .get(residue_key(residue_name))
            .map(|names| names.as_slice())
    }

    pub fn is_reactive(&self, residue_name: &str, atom_name: &str) -> bool {
        self.atom_names(residue_name)
            .is_some_and(|names| names.iter().any(|n| n == atom_name))
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

fn residue_key(residue_name: &str) -> &str {
    match residue_name.char_indices().nth(RESIDUE_KEY_LEN) {
        Some((idx, _)) => &residue_name[..idx],
        None => residue_name,
    }
}
