//! Fun-fact merge and mutation rules
//!
//! Everything here works on plain values: the shell loads a [`FunFactEntry`]
//! from its store, hands it to these functions and persists whatever comes
//! back. Validation of request payloads also lives here so every error is
//! detected before anything is written.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::StateRecord;
use crate::error::Error;

pub const FUNFACTS_REQUIRED: &str = "State fun facts value required";
pub const FUNFACTS_NOT_ARRAY: &str = "State fun facts value must be an array";
pub const FUNFACTS_NOT_STRINGS: &str = "State fun facts value must be an array of strings";
pub const INDEX_REQUIRED: &str = "State fun fact index value required";
pub const FUNFACT_REQUIRED: &str = "State fun fact value required";
pub const FUNFACT_BLANK: &str = "State fun facts must not be blank";

/// Persisted fun facts for one state, one document per state code
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunFactEntry {
    #[serde(rename = "stateCode")]
    pub state_code: String,
    pub funfacts: Vec<String>,
}

impl FunFactEntry {
    pub fn new(state_code: impl Into<String>, funfacts: Vec<String>) -> Self {
        Self {
            state_code: state_code.into(),
            funfacts,
        }
    }

    /// Convert a 1-based index into a position in `funfacts`.
    fn position(&self, record: &StateRecord, index: usize) -> Result<usize, Error> {
        if self.funfacts.is_empty() {
            return Err(Error::NoFunFacts {
                state: record.name.clone(),
            });
        }
        if index == 0 || index > self.funfacts.len() {
            return Err(Error::IndexOutOfRange {
                state: record.name.clone(),
            });
        }
        Ok(index - 1)
    }
}

/// A state record with its fun facts overlaid
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MergedStateView {
    #[serde(flatten)]
    pub record: StateRecord,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub funfacts: Option<Vec<String>>,
}

/// Merge a record with its stored entry.
///
/// `funfacts` is only attached when the entry exists and is non-empty.
pub fn merge_state(record: &StateRecord, entry: Option<FunFactEntry>) -> MergedStateView {
    MergedStateView {
        record: record.clone(),
        funfacts: entry
            .map(|entry| entry.funfacts)
            .filter(|facts| !facts.is_empty()),
    }
}

/// Response of the random fun fact operation
///
/// An absent or empty list is a data response, not an error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RandomFunFact {
    Fact { funfact: String },
    Message { message: String },
}

pub fn pick_random_fun_fact<R: Rng + ?Sized>(
    record: &StateRecord,
    entry: Option<&FunFactEntry>,
    rng: &mut R,
) -> RandomFunFact {
    match entry.map(|e| e.funfacts.as_slice()) {
        Some(facts) if !facts.is_empty() => RandomFunFact::Fact {
            funfact: facts[rng.gen_range(0..facts.len())].clone(),
        },
        _ => RandomFunFact::Message {
            message: format!("No Fun Facts found for {}", record.name),
        },
    }
}

/// A change to a state's fun-fact list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunFactMutation {
    /// Create the entry or append to it.
    Append(Vec<String>),
    /// Overwrite the fact at a 1-based index.
    Replace { index: usize, fact: String },
    /// Remove the fact at a 1-based index.
    Remove { index: usize },
}

impl FunFactMutation {
    /// Apply the mutation to the stored entry (if any) and return the entry to
    /// persist.
    ///
    /// On error the caller must not write anything. An entry emptied by
    /// `Remove` is returned as-is, never dropped.
    pub fn apply(
        self,
        record: &StateRecord,
        existing: Option<FunFactEntry>,
    ) -> Result<FunFactEntry, Error> {
        match self {
            FunFactMutation::Append(facts) => Ok(match existing {
                Some(mut entry) => {
                    entry.funfacts.extend(facts);
                    entry
                }
                None => FunFactEntry::new(record.code.clone(), facts),
            }),
            FunFactMutation::Replace { index, fact } => {
                let mut entry = existing.ok_or_else(|| Error::NoFunFacts {
                    state: record.name.clone(),
                })?;
                let position = entry.position(record, index)?;
                entry.funfacts[position] = fact;
                Ok(entry)
            }
            FunFactMutation::Remove { index } => {
                let mut entry = existing.ok_or_else(|| Error::NoFunFacts {
                    state: record.name.clone(),
                })?;
                let position = entry.position(record, index)?;
                entry.funfacts.remove(position);
                Ok(entry)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// Facts made only of whitespace are rejected on create and replace alike.
pub fn check_fact(fact: &str) -> Result<(), Error> {
    if fact.trim().is_empty() {
        return Err(Error::validation(FUNFACT_BLANK));
    }
    Ok(())
}

/// Validate a `{ "funfacts": [...] }` body.
pub fn parse_create_payload(body: &Value) -> Result<Vec<String>, Error> {
    let value = body.get("funfacts");
    if is_blank(value) {
        return Err(Error::validation(FUNFACTS_REQUIRED));
    }

    let Some(Value::Array(items)) = value else {
        return Err(Error::validation(FUNFACTS_NOT_ARRAY));
    };

    let facts = items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::validation(FUNFACTS_NOT_STRINGS))
        })
        .collect::<Result<Vec<_>, _>>()?;

    facts.iter().try_for_each(|fact| check_fact(fact))?;
    Ok(facts)
}

/// Read a positive 1-based `index` from a body.
///
/// Accepts a JSON integer or a string holding one.
pub fn parse_index(body: &Value) -> Result<usize, Error> {
    let index = match body.get("index") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    index
        .filter(|i| *i >= 1)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| Error::validation(INDEX_REQUIRED))
}

/// Validate a `{ "index": n, "funfact": "..." }` body.
pub fn parse_replace_payload(body: &Value) -> Result<FunFactMutation, Error> {
    let index = parse_index(body)?;
    let fact = match body.get("funfact") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return Err(Error::validation(FUNFACT_REQUIRED)),
    };
    check_fact(&fact)?;
    Ok(FunFactMutation::Replace { index, fact })
}

/// Validate a `{ "index": n }` body.
pub fn parse_remove_payload(body: &Value) -> Result<FunFactMutation, Error> {
    Ok(FunFactMutation::Remove {
        index: parse_index(body)?,
    })
}
