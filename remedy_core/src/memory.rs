//! In-memory gateway implementations.
//!
//! These behave like a real database rather than a bag of shared objects:
//! records are cloned on save and on read, so a value held by the caller can
//! be mutated freely without changing what the store returns afterwards.
//! Identity is assigned on save as a fresh UUID string.

use crate::gateway::{DosageGateway, DrugGateway, TreatmentGateway};
use crate::types::{Dosage, Drug, Treatment};
use crate::Result;
use std::collections::HashMap;
use uuid::Uuid;

fn next_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory drug store
#[derive(Debug, Default)]
pub struct InMemoryDrugs {
    records: HashMap<String, Drug>,
}

impl InMemoryDrugs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrugGateway for InMemoryDrugs {
    fn find_by_id(&self, id: &str) -> Result<Option<Drug>> {
        Ok(self.records.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Drug>> {
        let mut drugs: Vec<Drug> = self.records.values().cloned().collect();
        drugs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(drugs)
    }

    fn save(&mut self, mut drug: Drug) -> Result<Drug> {
        let id = next_id();
        drug.id = Some(id.clone());
        self.records.insert(id, drug.clone());
        Ok(drug)
    }
}

/// In-memory dosage store
#[derive(Debug, Default)]
pub struct InMemoryDosages {
    records: HashMap<String, Dosage>,
}

impl InMemoryDosages {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DosageGateway for InMemoryDosages {
    fn find_by_id(&self, id: &str) -> Result<Option<Dosage>> {
        Ok(self.records.get(id).cloned())
    }

    fn save(&mut self, mut dosage: Dosage) -> Result<Dosage> {
        let id = next_id();
        dosage.id = Some(id.clone());
        self.records.insert(id, dosage.clone());
        Ok(dosage)
    }
}

/// In-memory treatment store
#[derive(Debug, Default)]
pub struct InMemoryTreatments {
    records: HashMap<String, Treatment>,
}

impl InMemoryTreatments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreatmentGateway for InMemoryTreatments {
    fn find_by_id(&self, id: &str) -> Result<Option<Treatment>> {
        Ok(self.records.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Treatment>> {
        let mut treatments: Vec<Treatment> = self.records.values().cloned().collect();
        treatments.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(treatments)
    }

    fn exists_overlapping(&self, candidate: &Treatment) -> Result<bool> {
        Ok(self.records.values().any(|t| t.overlaps(candidate)))
    }

    fn save(&mut self, mut treatment: Treatment) -> Result<Treatment> {
        let id = next_id();
        treatment.id = Some(id.clone());
        self.records.insert(id, treatment.clone());
        Ok(treatment)
    }
}
