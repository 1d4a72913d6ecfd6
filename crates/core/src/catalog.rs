//! Reference catalog of U.S. states
//!
//! The catalog is built once from the bundled `data/states.json` dataset and is
//! read-only afterwards, so a single `&'static Catalog` can be shared by every
//! request without synchronization.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

const BUILTIN_DATASET: &str = include_str!("../data/states.json");

/// States outside the contiguous 48.
pub const NON_CONTIGUOUS_CODES: [&str; 2] = ["AK", "HI"];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::from_json(BUILTIN_DATASET).unwrap_or_else(|e| panic!("bundled dataset: {e}"))
});

/// Immutable reference record for a single state
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StateRecord {
    #[serde(rename = "state")]
    pub name: String,
    pub slug: String,
    pub code: String,
    pub nickname: String,
    pub admission_date: String,
    pub admission_number: u32,
    pub capital_city: String,
    pub population: u64,
    pub population_rank: u32,
}

impl StateRecord {
    pub fn is_contiguous(&self) -> bool {
        !NON_CONTIGUOUS_CODES.contains(&self.code.as_str())
    }
}

/// Contiguity filter accepted by the list operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contiguity {
    /// The lower 48.
    Contiguous,
    /// Alaska and Hawaii.
    NonContiguous,
}

impl Contiguity {
    /// Parse the `contig` query value.
    ///
    /// Only the literal strings "true" and "false" select a filter; anything
    /// else means "no filter".
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value {
            Some("true") => Some(Contiguity::Contiguous),
            Some("false") => Some(Contiguity::NonContiguous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<StateRecord>,
}

impl Catalog {
    /// The catalog built from the bundled dataset.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Build a catalog from a JSON array of state records.
    ///
    /// Codes are normalized to uppercase. Duplicate codes, codes that are not
    /// two ASCII letters and admission dates that are not `YYYY-MM-DD` are
    /// rejected.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut records: Vec<StateRecord> =
            serde_json::from_str(json).map_err(|e| Error::Dataset(e.to_string()))?;

        let mut seen = HashSet::new();
        for record in &mut records {
            record.code = record.code.to_ascii_uppercase();

            if record.code.len() != 2 || !record.code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::Dataset(format!(
                    "invalid state code '{}'",
                    record.code
                )));
            }
            if !seen.insert(record.code.clone()) {
                return Err(Error::Dataset(format!(
                    "duplicate state code '{}'",
                    record.code
                )));
            }
            NaiveDate::parse_from_str(&record.admission_date, "%Y-%m-%d").map_err(|e| {
                Error::Dataset(format!(
                    "invalid admission date '{}' for {}: {e}",
                    record.admission_date, record.code
                ))
            })?;
        }

        Ok(Self { records })
    }

    /// Case-insensitive exact lookup. Surrounding whitespace does not match.
    pub fn lookup(&self, code: &str) -> Option<&StateRecord> {
        self.records
            .iter()
            .find(|record| record.code.eq_ignore_ascii_case(code))
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Lookup that fails with [`Error::InvalidStateCode`].
    pub fn resolve(&self, code: &str) -> Result<&StateRecord, Error> {
        self.lookup(code).ok_or(Error::InvalidStateCode)
    }

    pub fn all(&self) -> &[StateRecord] {
        &self.records
    }

    pub fn filter_by_contiguity(&self, contiguity: Contiguity) -> Vec<&StateRecord> {
        let want_contiguous = contiguity == Contiguity::Contiguous;
        self.records
            .iter()
            .filter(|record| record.is_contiguous() == want_contiguous)
            .collect()
    }

    /// All records, or the subset selected by `contiguity`, in load order.
    pub fn select(&self, contiguity: Option<Contiguity>) -> Vec<&StateRecord> {
        match contiguity {
            Some(contiguity) => self.filter_by_contiguity(contiguity),
            None => self.records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
