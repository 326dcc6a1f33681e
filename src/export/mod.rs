//! Side-file exports for case-management follow-up

pub mod missed;

pub use missed::MissedRosterExporter;
