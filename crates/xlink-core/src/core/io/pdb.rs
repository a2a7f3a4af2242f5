use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

const CHAIN_TYPE_LEN: usize = 3;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("No ATOM records found")]
    Empty,
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Reader for the `ATOM` records of a PDB file.
///
/// Each residue sequence number becomes one chain whose type is the first three
/// characters of the residue name on its first record. All other record types are
/// ignored.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut structure = Structure::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if slice_and_trim(&line, 0, 6) != "ATOM" {
                continue;
            }

            let serial = parse_int(&line, line_num, 6, 11)?;
            let serial = usize::try_from(serial).map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidInt {
                    columns: "7-11".into(),
                    value: serial.to_string(),
                },
            })?;
            let name = slice_and_trim(&line, 12, 17);
            if name.is_empty() {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::MissingRequiredField {
                        columns: "13-17".into(),
                    },
                });
            }
            let res_name = slice_and_trim(&line, 17, 21);
            let res_seq = parse_int(&line, line_num, 22, 26)?;
            let x = parse_float(&line, line_num, 30, 38)?;
            let y = parse_float(&line, line_num, 38, 46)?;
            let z = parse_float(&line, line_num, 46, 54)?;
            let element = match slice_and_trim(&line, 76, 78) {
                "" => name
                    .chars()
                    .find(|c| c.is_ascii_alphabetic())
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                symbol => symbol.to_string(),
            };

            if structure.find_atom_by_serial(serial).is_some() {
                return Err(PdbError::Inconsistency(format!(
                    "Duplicate atom serial: {}",
                    serial
                )));
            }

            let chain_type: String = res_name.chars().take(CHAIN_TYPE_LEN).collect();
            let chain_id = structure.add_chain(res_seq, &chain_type);
            if structure
                .chain(chain_id)
                .is_some_and(|chain| chain.has_atom_named(name))
            {
                return Err(PdbError::Inconsistency(format!(
                    "Duplicate atom name '{}' in residue {}",
                    name, res_seq
                )));
            }

            let atom = Atom::new(serial, name, &element, Point3::new(x, y, z));
            structure.add_atom_to_chain(chain_id, atom).ok_or_else(|| {
                PdbError::Inconsistency(format!("Failed to add atom {} to residue {}", serial, res_seq))
            })?;
        }

        if structure.atom_count() == 0 {
            return Err(PdbError::Empty);
        }
        Ok(structure)
    }
}
