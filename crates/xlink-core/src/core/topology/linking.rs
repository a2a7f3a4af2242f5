use crate::core::models::atom::Atom;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

// --- Default partner rules for the surface functional groups ---
#[rustfmt::skip]
static DEFAULT_POSITIONAL_NUMBERS: Map<&'static str, u32> = phf_map! {
    "C" => 2, // CX3 -> CX2
};

#[rustfmt::skip]
static DEFAULT_NITROGEN_CODES: Map<&'static str, u32> = phf_map! {
    "6" => 4, // N6 -> N4
    "3" => 1, // N3 -> N1
};

/// How the partner atom name is derived for one element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case", deny_unknown_fields)]
pub enum LinkingRule {
    /// Partner is `element + position_code + number`.
    Positional { number: u32 },
    /// Partner is `element + codes[position_code]`.
    Explicit { codes: HashMap<String, u32> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkingError {
    #[error("No linking rule for element '{element}' (atom '{atom_name}')")]
    UnsupportedElement { element: String, atom_name: String },
    #[error("Atom name '{atom_name}' has no position code")]
    MissingPositionCode { atom_name: String },
    #[error("Position code '{code}' of atom '{atom_name}' has no partner mapping")]
    UnmappedPositionCode { atom_name: String, code: char },
}

#[derive(Debug, Error)]
pub enum LinkingTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Element-keyed rules resolving a surface atom to its linking partner within the
/// same chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LinkingTable {
    rules: HashMap<String, LinkingRule>,
}

impl Default for LinkingTable {
    fn default() -> Self {
        let mut rules: HashMap<String, LinkingRule> = DEFAULT_POSITIONAL_NUMBERS
            .entries()
            .map(|(element, number)| {
                (
                    element.to_string(),
                    LinkingRule::Positional { number: *number },
                )
            })
            .collect();
        rules.insert(
            "N".to_string(),
            LinkingRule::Explicit {
                codes: DEFAULT_NITROGEN_CODES
                    .entries()
                    .map(|(code, number)| (code.to_string(), *number))
                    .collect(),
            },
        );
        Self { rules }
    }
}

impl LinkingTable {
    pub fn load(path: &Path) -> Result<Self, LinkingTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| LinkingTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| LinkingTableError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn rule(&self, element: &str) -> Option<&LinkingRule> {
        self.rules.get(element)
    }

    /// Derives the name of the atom's linking partner.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError`] if the element has no rule, the name carries no
    /// position code, or an explicit rule has no entry for the code.
    pub fn partner_name(&self, atom: &Atom) -> Result<String, LinkingError> {
        let rule = self
            .rule(&atom.element)
            .ok_or_else(|| LinkingError::UnsupportedElement {
                element: atom.element.clone(),
                atom_name: atom.name.clone(),
            })?;
        let code = atom
            .position_code()
            .ok_or_else(|| LinkingError::MissingPositionCode {
                atom_name: atom.name.clone(),
            })?;

        match rule {
            LinkingRule::Positional { number } => Ok(format!("{}{}{}", atom.element, code, number)),
            LinkingRule::Explicit { codes } => codes
                .get(&code.to_string())
                .map(|number| format!("{}{}", atom.element, number))
                .ok_or(LinkingError::UnmappedPositionCode {
                    atom_name: atom.name.clone(),
                    code,
                }),
        }
    }
}
