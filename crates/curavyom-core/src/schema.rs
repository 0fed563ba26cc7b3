//! JSON Schema validation for result envelopes.
//!
//! Envelopes are validated against `schema/envelope.schema.json`, which is
//! embedded at compile time and compiled once.

use std::sync::OnceLock;
use thiserror::Error;

use crate::envelope::ResultEnvelope;

const ENVELOPE_SCHEMA_JSON: &str = include_str!("../schema/envelope.schema.json");

static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),

    #[error("Envelope does not serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Envelope failed schema validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(ENVELOPE_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

/// Validate a raw JSON value against the envelope schema.
///
/// Returns every violation, each suffixed with its instance path.
pub fn validate_envelope_json(value: &serde_json::Value) -> Result<(), SchemaError> {
    let validator = get_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(errors))
    }
}

/// Validate a typed envelope as it would appear on the wire.
pub fn validate_envelope(envelope: &ResultEnvelope) -> Result<(), SchemaError> {
    let value = serde_json::to_value(envelope)?;
    validate_envelope_json(&value)
}

pub fn is_valid_envelope(value: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(value))
        .unwrap_or(false)
}
