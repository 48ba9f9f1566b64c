pub mod filter;
pub mod format;
pub mod schedule;
pub mod simulation;
