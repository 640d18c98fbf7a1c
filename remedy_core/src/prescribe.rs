//! Prescribe-treatment orchestration.
//!
//! The end-to-end use case: validate the raw request, resolve the referenced
//! drug and dosage, build the typed period and direction mode, prolong the
//! period when a decreasing taper outlasts it, reject overlapping
//! treatments, and persist. Every step gates the next; nothing is written
//! before the final save.

use crate::direction::{decreasing_days_until_limit, DirectionMode};
use crate::gateway::{DosageGateway, DrugGateway, TreatmentGateway};
use crate::period::{PeriodUnit, TreatmentPeriod};
use crate::request::{keys, validator, PrescribeTreatmentRequest};
use crate::types::{Drug, Treatment};
use crate::validation::RequestParameters;
use crate::{Error, Result};
use chrono::NaiveDate;

/// Prescribe a treatment from a raw request.
///
/// Returns the persisted treatment, including its assigned id. Any failed
/// step aborts with a business error; no retry is attempted.
pub fn prescribe_treatment(
    drugs: &dyn DrugGateway,
    dosages: &dyn DosageGateway,
    treatments: &mut dyn TreatmentGateway,
    request: &PrescribeTreatmentRequest,
) -> Result<Treatment> {
    let outcome = validator().validate(request);
    if !outcome.is_valid() {
        return Err(Error::Validation(outcome.joined()));
    }

    let drug_id = request.parameter(keys::DRUG_ID).unwrap_or_default();
    let drug = drugs
        .find_by_id(drug_id)?
        .ok_or_else(|| Error::NotFound(format!("No drug found with '{}' id", drug_id)))?;

    let dosage_id = request.parameter(keys::DOSAGE_ID).unwrap_or_default();
    let dosage = dosages
        .find_by_id(dosage_id)?
        .ok_or_else(|| Error::NotFound(format!("No dosage found with '{}' id", dosage_id)))?;

    let starts_on = parse_start_date(request)?;
    let mut period = parse_period(request)?;

    let direction_mode = DirectionMode::resolve(
        request.parameter(keys::DIRECTION_MODE_TYPE),
        request.parameter(keys::DIRECTION_MODE_TAKEN),
        request.parameter(keys::DIRECTION_MODE_INTERVAL),
        request.parameter(keys::DIRECTION_MODE_DELTA),
        request.parameter(keys::DIRECTION_MODE_LIMIT),
    )?;

    if let DirectionMode::Decreasing { delta, limit } = direction_mode {
        let taper_days = decreasing_days_until_limit(dosage.daily_intake_amount, delta, limit);
        period = period.extend_if_duration_longer(taper_days);
    }

    let stops_on = period.calc_end(starts_on);

    let treatment = Treatment {
        id: None,
        drug,
        dosage,
        starts_on,
        period,
        stops_on,
        direction_mode,
    };

    if treatments.exists_overlapping(&treatment)? {
        return Err(Error::Overlap(format!(
            "Treatment being created overlaps with an already prescribed drug: \
             start date {} end date {}",
            treatment.starts_on, treatment.stops_on
        )));
    }

    let persisted = treatments.save(treatment)?;

    tracing::info!(
        "Prescribed treatment {:?}: {} from {} to {}, {}",
        persisted.id,
        persisted.drug.name,
        persisted.starts_on,
        persisted.stops_on,
        persisted.direction_mode
    );

    Ok(persisted)
}

/// All distinct drugs that appear on persisted treatments
pub fn prescribed_drugs(treatments: &dyn TreatmentGateway) -> Result<Vec<Drug>> {
    let mut drugs: Vec<Drug> = Vec::new();
    for treatment in treatments.find_all()? {
        if !drugs.contains(&treatment.drug) {
            drugs.push(treatment.drug);
        }
    }
    Ok(drugs)
}

fn parse_start_date(request: &PrescribeTreatmentRequest) -> Result<NaiveDate> {
    let raw = request.parameter(keys::START_DATE).unwrap_or_default();
    raw.parse().map_err(|_| {
        Error::Validation(format!(
            "'Start Date' is malformed: '{}'. Accepted format is 'yyyy-MM-dd'",
            raw
        ))
    })
}

fn parse_period(request: &PrescribeTreatmentRequest) -> Result<TreatmentPeriod> {
    let raw_amount = request.parameter(keys::PERIOD_AMOUNT).unwrap_or_default();
    let amount: i32 = raw_amount.parse().map_err(|_| {
        Error::Validation(format!(
            "'Amount of Treatment Period' is malformed: '{}'",
            raw_amount
        ))
    })?;

    let raw_unit = request.parameter(keys::PERIOD_UNIT).unwrap_or_default();
    let unit = PeriodUnit::parse(raw_unit)?;

    Ok(TreatmentPeriod::new(amount, unit))
}
