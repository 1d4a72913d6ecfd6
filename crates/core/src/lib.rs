//! Core library for states
//!
//! This crate implements the **Functional Core** of the states application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`states_core`** (this crate): the reference catalog, payload validation
//!   and the fun-fact merge and mutation rules, with zero I/O
//! - **`states`**: the SQLite document store, the HTTP server and the CLI
//!   (the Imperative Shell)
//!
//! The shell loads a state's stored fun facts, calls into this crate to
//! validate, merge or mutate them, and persists the result. Nothing in here
//! knows where the data came from or where it goes.
//!
//! # Module Organization
//!
//! - [`catalog`]: the immutable table of 50 [`StateRecord`]s and contiguity filtering
//! - [`funfacts`]: [`FunFactEntry`], [`MergedStateView`], mutations and payload validation
//! - [`projections`]: single-field views (capital, nickname, population, admission)
//! - [`error`]: the [`Error`] taxonomy shared with the shell
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use states_core::{merge_state, Catalog, FunFactEntry, FunFactMutation};
//!
//! let record = Catalog::builtin().resolve("ca")?;
//! let entry = FunFactMutation::Append(vec!["fact1".into()]).apply(record, None)?;
//!
//! let merged = merge_state(record, Some(entry));
//! assert_eq!(merged.funfacts, Some(vec!["fact1".to_string()]));
//! ```

pub mod catalog;
pub mod error;
pub mod funfacts;
pub mod projections;

pub use catalog::{Catalog, Contiguity, StateRecord};
pub use error::Error;
pub use funfacts::{
    merge_state, pick_random_fun_fact, FunFactEntry, FunFactMutation, MergedStateView,
    RandomFunFact,
};
