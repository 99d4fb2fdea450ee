//! Schema-driven assessment endpoints
//!
//! Each handler builds the prompt for its page, asks the generator once, and
//! turns whatever text comes back into a complete record. A missing or
//! failing generator is not an error here: the record is built from empty
//! text and every field carries its fallback.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use mymedi_core::catalog::{diabetes, medicine, symptom};
use mymedi_core::{ExtractedRecord, Generation, Schema, Table, Urgency, build_record, build_table};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Response envelope shared by all assessment endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<Generation>,
    pub record: ExtractedRecord,
    /// Keys whose value came from the schema fallback
    pub fallbacks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<BTreeMap<String, Table>>,
}

/// Last accepted assessment of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub kind: &'static str,
    pub generation: Generation,
    pub updated_at: DateTime<Utc>,
    pub assessment: Assessment,
}

#[derive(Debug, Deserialize)]
pub struct MedicineRequest {
    pub medicine: String,
    pub session: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SymptomRequest {
    pub body_part: String,
    pub symptoms: String,
    pub session: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DiabetesRequest {
    pub profile: diabetes::DiabetesProfile,
    pub session: Option<Uuid>,
}

/// POST /api/medicine
pub async fn medicine(
    State(state): State<AppState>,
    Json(req): Json<MedicineRequest>,
) -> Result<Json<Assessment>, AppError> {
    let name = required("medicine", &req.medicine)?;
    let schema = medicine::schema(name)?;

    run(&state, "medicine", req.session, &medicine::prompt(name), &schema, |_, _| {}).await
}

/// POST /api/symptom-analysis
pub async fn symptom_analysis(
    State(state): State<AppState>,
    Json(req): Json<SymptomRequest>,
) -> Result<Json<Assessment>, AppError> {
    let body_part = required("body_part", &req.body_part)?;
    let symptoms = required("symptoms", &req.symptoms)?;
    let schema = symptom::schema()?;

    run(
        &state,
        "symptom-analysis",
        req.session,
        &symptom::prompt(body_part, symptoms),
        &schema,
        |text, assessment| {
            assessment.urgency = Some(symptom::urgency(text, &assessment.record));
        },
    )
    .await
}

/// POST /api/diabetes-plan
pub async fn diabetes_plan(
    State(state): State<AppState>,
    Json(req): Json<DiabetesRequest>,
) -> Result<Json<Assessment>, AppError> {
    required("profile.full_name", &req.profile.full_name)?;
    required("profile.diabetes_type", &req.profile.diabetes_type)?;
    let schema = diabetes::schema()?;

    run(
        &state,
        "diabetes-plan",
        req.session,
        &diabetes::prompt(&req.profile),
        &schema,
        |text, assessment| {
            let tables = diabetes::tables()
                .iter()
                .map(|spec| (spec.name.clone(), build_table(text, spec)))
                .collect();
            assessment.tables = Some(tables);
        },
    )
    .await
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("'{}' must not be empty", field)));
    }
    Ok(value)
}

/// Generate, extract, and publish one assessment.
///
/// `finish` adds the endpoint-specific parts computed from the raw text.
async fn run(
    state: &AppState,
    kind: &'static str,
    session: Option<Uuid>,
    prompt: &str,
    schema: &Schema,
    finish: impl FnOnce(&str, &mut Assessment),
) -> Result<Json<Assessment>, AppError> {
    let generation = session.map(|id| state.sessions.begin(&id));
    let text = generate(state, kind, prompt).await;

    if let (Some(id), Some(generation)) = (session, generation) {
        if !state.sessions.is_current(&id, generation) {
            tracing::info!(session = %id, %generation, "Skipping extraction for superseded request");
            return Err(AppError::Conflict(format!(
                "Superseded by a newer request: generation {} is no longer current",
                generation
            )));
        }
    }

    let record = build_record(&text, schema);
    let fallbacks: Vec<String> = record
        .fallback_keys()
        .into_iter()
        .map(str::to_string)
        .collect();

    if !fallbacks.is_empty() {
        metrics::counter!("extraction_fallbacks_total", "kind" => kind)
            .increment(fallbacks.len() as u64);
    }
    tracing::info!(
        kind,
        fields = record.len(),
        fallbacks = fallbacks.len(),
        "Built assessment record"
    );

    let mut assessment = Assessment {
        session,
        generation,
        record,
        fallbacks,
        urgency: None,
        tables: None,
    };
    finish(&text, &mut assessment);

    if let (Some(id), Some(generation)) = (session, generation) {
        let snapshot = SessionSnapshot {
            kind,
            generation,
            updated_at: Utc::now(),
            assessment: assessment.clone(),
        };
        state
            .sessions
            .publish(&id, generation, snapshot)
            .inspect_err(|err| tracing::info!(session = %id, error = %err, "Discarded stale assessment"))?;
    }

    Ok(Json(assessment))
}

/// Text from the generator, or `""` when there is none or it failed
async fn generate(state: &AppState, kind: &str, prompt: &str) -> String {
    let Some(generator) = &state.generator else {
        tracing::warn!(kind, "No text generator configured, using fallbacks");
        return String::new();
    };

    match generator.generate(kind, prompt).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(kind, error = %err, "Text generation failed, using fallbacks");
            String::new()
        }
    }
}
