#![forbid(unsafe_code)]

//! Core domain model and business logic for the Remedy prescription system.
//!
//! This crate provides:
//! - Domain types (drugs, dosages, treatments, periods, direction modes)
//! - A composable validation-rule engine for raw requests
//! - The prescribe-treatment use case with overlap rejection
//! - Day-by-day treatment usage resolution
//! - Persistence gateways (in-memory and file-backed) and CSV export

pub mod types;
pub mod error;
pub mod period;
pub mod direction;
pub mod validation;
pub mod request;
pub mod gateway;
pub mod memory;
pub mod store;
pub mod prescribe;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use period::{PeriodUnit, TreatmentPeriod};
pub use direction::{decreasing_days_until_limit, DirectionMode};
pub use request::PrescribeTreatmentRequest;
pub use gateway::{DosageGateway, DrugGateway, TreatmentGateway};
pub use config::Config;
pub use prescribe::{prescribe_treatment, prescribed_drugs};
pub use export::treatments_to_csv;
