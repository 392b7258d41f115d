//! Core type definitions for result rows
//!
//! - [`FilterPolicy`]: which extractor entries become output columns
//! - [`OutputRow`]: one patient's column names and values
//! - [`RowBuilder`]: applies a policy and prepends the patient column

mod filter;
mod row;

pub use filter::{FilterPolicy, DIAGNOSTIC_ENTRY_COUNT};
pub use row::{OutputRow, RowBuilder, PATIENT_COLUMN};
