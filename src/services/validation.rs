use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::models::application::{
    ApplicationCandidate, ApplicationStatus, NewApplication, StatusPatch, StatusPatchCandidate,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Status must be one of: {}", ApplicationStatus::allowed_values())]
    InvalidStatus,
    #[error("Progress must be a valid number between 0 and 100")]
    InvalidProgress,
    #[error("{0}")]
    InvalidField(String),
}

/// Checks a full create/replace body. Missing fields are reported before
/// anything else, then status, then progress.
pub fn validate_candidate(candidate: &ApplicationCandidate) -> Result<NewApplication, ValidationError> {
    let company = candidate
        .company
        .as_ref()
        .ok_or(ValidationError::MissingField("company"))?;
    let position = candidate
        .position
        .as_ref()
        .ok_or(ValidationError::MissingField("position"))?;
    let status = candidate
        .status
        .as_ref()
        .ok_or(ValidationError::MissingField("status"))?;
    let progress = candidate
        .progress
        .as_ref()
        .ok_or(ValidationError::MissingField("progress"))?;

    let application = NewApplication {
        company: company.clone(),
        position: position.clone(),
        status: parse_status(status)?,
        progress: parse_progress(progress)?,
    };

    application.validate().map_err(field_error)?;

    Ok(application)
}

pub fn validate_patch(candidate: &StatusPatchCandidate) -> Result<StatusPatch, ValidationError> {
    let status = candidate
        .status
        .as_ref()
        .ok_or(ValidationError::MissingField("status"))?;
    let status = parse_status(status)?;

    let progress = match &candidate.progress {
        Some(raw) => Some(parse_progress(raw)?),
        None => None,
    };

    Ok(StatusPatch { status, progress })
}

fn parse_status(raw: &Value) -> Result<ApplicationStatus, ValidationError> {
    raw.as_str()
        .and_then(ApplicationStatus::parse)
        .ok_or(ValidationError::InvalidStatus)
}

/// Accepts integers, finite floats (truncated) and numeric strings.
fn parse_progress(raw: &Value) -> Result<i64, ValidationError> {
    let progress = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidProgress)?;

    if !(0..=100).contains(&progress) {
        return Err(ValidationError::InvalidProgress);
    }

    Ok(progress)
}

fn field_error(errors: validator::ValidationErrors) -> ValidationError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    let message = fields
        .first()
        .and_then(|(field, field_errors)| {
            field_errors.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
            })
        })
        .unwrap_or_else(|| "Invalid application data".to_string());

    ValidationError::InvalidField(message)
}
