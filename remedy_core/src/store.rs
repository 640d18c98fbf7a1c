//! File-backed gateway implementations.
//!
//! Each collection lives in one JSON document under the data directory
//! (`drugs.json`, `dosages.json`, `treatments.json`). Reads take a shared
//! lock; writes go through a locked temp file that is atomically renamed
//! over the original, so a crashed writer never leaves a half-written
//! collection behind.
//!
//! Unlike ephemeral caches, prescription data must not be silently dropped:
//! a present but unparsable collection file is an error, not a default.

use crate::gateway::{DosageGateway, DrugGateway, TreatmentGateway};
use crate::types::{Dosage, Drug, Treatment};
use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!("No collection file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    Ok(serde_json::from_str(&contents)?)
}

fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("collection path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    // Unique temp file in the same directory for an atomic rename
    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(records)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}

fn next_id() -> String {
    Uuid::new_v4().to_string()
}

/// Drug collection backed by `drugs.json`
pub struct FileDrugs {
    path: PathBuf,
}

impl FileDrugs {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("drugs.json"),
        }
    }
}

impl DrugGateway for FileDrugs {
    fn find_by_id(&self, id: &str) -> Result<Option<Drug>> {
        let records: Vec<Drug> = load_records(&self.path)?;
        Ok(records.into_iter().find(|d| d.id.as_deref() == Some(id)))
    }

    fn find_all(&self) -> Result<Vec<Drug>> {
        let mut records: Vec<Drug> = load_records(&self.path)?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn save(&mut self, mut drug: Drug) -> Result<Drug> {
        drug.id = Some(next_id());

        let mut records: Vec<Drug> = load_records(&self.path)?;
        records.push(drug.clone());
        save_records(&self.path, &records)?;

        Ok(drug)
    }
}

/// Dosage collection backed by `dosages.json`
pub struct FileDosages {
    path: PathBuf,
}

impl FileDosages {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("dosages.json"),
        }
    }
}

impl DosageGateway for FileDosages {
    fn find_by_id(&self, id: &str) -> Result<Option<Dosage>> {
        let records: Vec<Dosage> = load_records(&self.path)?;
        Ok(records.into_iter().find(|d| d.id.as_deref() == Some(id)))
    }

    fn save(&mut self, mut dosage: Dosage) -> Result<Dosage> {
        dosage.id = Some(next_id());

        let mut records: Vec<Dosage> = load_records(&self.path)?;
        records.push(dosage.clone());
        save_records(&self.path, &records)?;

        Ok(dosage)
    }
}

/// Treatment collection backed by `treatments.json`
pub struct FileTreatments {
    path: PathBuf,
}

impl FileTreatments {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("treatments.json"),
        }
    }
}

impl TreatmentGateway for FileTreatments {
    fn find_by_id(&self, id: &str) -> Result<Option<Treatment>> {
        let records: Vec<Treatment> = load_records(&self.path)?;
        Ok(records.into_iter().find(|t| t.id.as_deref() == Some(id)))
    }

    fn find_all(&self) -> Result<Vec<Treatment>> {
        let mut records: Vec<Treatment> = load_records(&self.path)?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn exists_overlapping(&self, candidate: &Treatment) -> Result<bool> {
        let records: Vec<Treatment> = load_records(&self.path)?;
        Ok(records.iter().any(|t| t.overlaps(candidate)))
    }

    fn save(&mut self, mut treatment: Treatment) -> Result<Treatment> {
        treatment.id = Some(next_id());

        let mut records: Vec<Treatment> = load_records(&self.path)?;
        records.push(treatment.clone());
        save_records(&self.path, &records)?;

        Ok(treatment)
    }
}
