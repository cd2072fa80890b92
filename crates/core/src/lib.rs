//! # Family History Core
//!
//! The family history workflow for a single patient, built on the `fhir` value types.
//!
//! This crate contains:
//! - The [`FhirStore`] seam to the FHIR server and an [`InMemoryStore`] implementation
//! - [`FamilyHistoryService`]: the patient's record list, kept in step with the store
//! - [`EditSession`]: type-state editing of one record on a deep copy
//! - Edit-field input normalisers, table rows and the patient header summary
//!
//! **No transport concerns**: HTTP clients, authentication and launch context belong to
//! [`FhirStore`] implementations outside this crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod input;
pub mod service;
pub mod session;
pub mod store;
pub mod table;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use famhx_types::NonEmptyText;
pub use header::PatientHeader;
pub use input::{AgeRangeInput, QuantityInput};
pub use service::FamilyHistoryService;
pub use session::{Closed, EditSession, Editing, SaveRequest};
pub use store::{FhirStore, InMemoryStore};
pub use table::{sort_rows, FamilyHistoryRow, SortColumn};
