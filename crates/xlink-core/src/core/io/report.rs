use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const PAIR_OUTPUT_SUFFIX: &str = "_pair_output.txt";
pub const CORE_PAIR_OUTPUT_SUFFIX: &str = "_core_pair_output.txt";
pub const SURFACE_PAIR_OUTPUT_SUFFIX: &str = "_sur_pair_output.txt";
pub const RADICAL_OUTPUT_SUFFIX: &str = "_radical_output.txt";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    File { path: String, source: io::Error },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

/// Builds the visualization selection string `+s1+s2+s3+s4...` for a list of pairs.
pub fn selection_string(pairs: &[(usize, usize)]) -> String {
    pairs
        .iter()
        .map(|(a, b)| format!("+{}+{}", a, b))
        .collect()
}

/// Writes pairs as space-separated `serial1 serial2` lines in the given order.
///
/// # Arguments
///
/// * `writer` - Destination of the report.
/// * `pairs` - Serial-number pairs in commit order.
/// * `with_selection` - Whether to prefix the listing with a selection line.
///
/// # Errors
///
/// Returns [`ReportError`] if writing fails.
pub fn write_pairs<W: Write>(
    mut writer: W,
    pairs: &[(usize, usize)],
    with_selection: bool,
) -> Result<(), ReportError> {
    if with_selection {
        writeln!(writer, "{}", selection_string(pairs))?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for (a, b) in pairs {
        wtr.serialize((a, b))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one radical serial per line.
pub fn write_radicals<W: Write>(mut writer: W, radicals: &[usize]) -> Result<(), ReportError> {
    for serial in radicals {
        writeln!(writer, "{}", serial)?;
    }
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    let file = File::create(path).map_err(|e| ReportError::File {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

pub fn write_pairs_to_path(
    path: &Path,
    pairs: &[(usize, usize)],
    with_selection: bool,
) -> Result<(), ReportError> {
    write_pairs(create(path)?, pairs, with_selection)
}

pub fn write_radicals_to_path(path: &Path, radicals: &[usize]) -> Result<(), ReportError> {
    write_radicals(create(path)?, radicals)
}
