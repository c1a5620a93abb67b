// Compatibility Checker: rendered résumé + job role → score and suggestions.

pub mod checker;
pub mod client;

pub use checker::{check, CheckError, CheckOutcome, GENERIC_FAILURE};
pub use client::{AtsReport, AtsRequest, AtsScorer, RemoteScorer, ScoringError, Suggestion};
