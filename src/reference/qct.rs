use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use hashbrown::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::open_error;
use crate::error::ReferenceError;
use crate::models::fips::{zero_pad, FIPS_WIDTH};
use crate::models::FipsCode;

const FIPS_COLUMN: &str = "fips";

/// Qualified Census Tract codes, zero-padded to 11 characters
#[derive(Debug, Clone, Default)]
pub struct QctSet {
    codes: HashSet<String>,
    rows: usize,
}

impl QctSet {
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for code in codes {
            set.insert(code.as_ref());
        }
        set
    }

    fn insert(&mut self, raw: &str) {
        self.rows += 1;
        self.codes.insert(zero_pad(raw));
    }

    /// Exact match against the padded codes
    pub fn contains(&self, fips: &FipsCode) -> bool {
        self.codes.contains(fips.as_str())
    }

    /// Number of distinct codes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Rows read, duplicates included
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Codes that are not 11 ASCII digits even after padding
    pub fn nonconforming(&self) -> impl Iterator<Item = &str> {
        self.codes
            .iter()
            .filter(|c| c.len() != FIPS_WIDTH || !c.bytes().all(|b| b.is_ascii_digit()))
            .map(String::as_str)
    }
}

/// Load QCT codes from the `fips` column of a CSV (optionally gzipped)
pub fn load_qct_set(path: &Path) -> Result<QctSet, ReferenceError> {
    info!("Loading QCT list from {}", path.display());

    let file = File::open(path).map_err(|source| open_error(path, source))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let set = read_qct_set(reader, path)?;

    let bad = set.nonconforming().count();
    if bad > 0 {
        warn!(
            "{} QCT codes are not {} digits after padding and will never match",
            bad, FIPS_WIDTH
        );
    }

    info!("Loaded {} QCT codes ({} rows)", set.len(), set.rows());
    Ok(set)
}

/// Parse QCT codes from any CSV reader; `path` is only used in errors
pub fn read_qct_set<R: Read>(reader: R, path: &Path) -> Result<QctSet, ReferenceError> {
    let csv_error = |source: csv::Error| ReferenceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();

    // Find column index
    let fips_idx = headers
        .iter()
        .position(|h| h == FIPS_COLUMN)
        .ok_or_else(|| ReferenceError::MissingColumn {
            path: path.to_path_buf(),
            column: FIPS_COLUMN.to_string(),
        })?;

    let mut set = QctSet::default();
    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;
        match record.get(fips_idx) {
            Some(value) if !value.is_empty() => set.insert(value),
            _ => continue,
        }
    }

    Ok(set)
}
