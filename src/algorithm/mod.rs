//! Classification engine for vaccination status reporting
//!
//! This module holds the status-reconciliation core: the per-program
//! policies and the classifier that partitions an eligible roster into
//! mutually exclusive vaccination statuses.

pub mod classifier;
pub mod programs;

pub use classifier::{ClassifierInput, Roster, STATUS_ROWS, StatusSets, classify};
pub use programs::{Lookback, ProgramPolicy};
