//! Gateway traits for the external persistence collaborators.
//!
//! The core never talks to a concrete store: drugs, dosages and treatments
//! are looked up and saved through these traits. `save` assigns the record's
//! identity and returns the persisted value. Implementations must behave
//! like a database with copy-on-read/write isolation: mutating a value after
//! saving or reading it must not alter what the store returns later.

use crate::types::{Dosage, Drug, Treatment};
use crate::Result;

/// Lookup and persistence for drugs
pub trait DrugGateway {
    fn find_by_id(&self, id: &str) -> Result<Option<Drug>>;

    fn find_all(&self) -> Result<Vec<Drug>>;

    fn save(&mut self, drug: Drug) -> Result<Drug>;
}

/// Lookup and persistence for dosages
pub trait DosageGateway {
    fn find_by_id(&self, id: &str) -> Result<Option<Dosage>>;

    fn save(&mut self, dosage: Dosage) -> Result<Dosage>;
}

/// Lookup and persistence for treatments, plus the overlap query
pub trait TreatmentGateway {
    fn find_by_id(&self, id: &str) -> Result<Option<Treatment>>;

    fn find_all(&self) -> Result<Vec<Treatment>>;

    /// Whether any persisted treatment overlaps the candidate (same drug,
    /// intersecting inclusive date ranges)
    fn exists_overlapping(&self, candidate: &Treatment) -> Result<bool>;

    fn save(&mut self, treatment: Treatment) -> Result<Treatment>;
}
