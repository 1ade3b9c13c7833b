//! Cedar - Lebanese audit checklists and local formatting
//! ---
//!
//! Audit checklists roll their item statuses up into an overall status and a
//! completion percentage. Around that sit the helpers an accounting front-end
//! needs in Lebanon: LBP amounts, `DD/MM/YYYY` dates, Arabic-Indic numerals and
//! the filter set of the Lebanese general ledger report.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Checklist model and aggregation.
///
/// [`Checklist`][checklist::Checklist] owns its items; status and completion
/// percentage are derived and recomputed on every status change or removal.
/// The acting user and date are passed in as an [`Actor`][checklist::Actor].
pub mod checklist;

/// Form level actions: mark all completed, submit checks, reports, dashboard.
pub mod form;

pub mod format;

/// Declarative filters for the general ledger report.
pub mod report;

pub mod settings;

/// Plain text checklist documents.
pub mod parser;

pub use checklist::{Actor, Checklist, ChecklistItem, ChecklistStatus, ItemStatus, Priority};
pub use parser::{parse, parse_file, Document};
