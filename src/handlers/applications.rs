use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use std::collections::HashMap;

use crate::{
    models::application::{
        ApplicationCandidate, ApplicationStats, JobApplication, MessageResponse, StatusPatchCandidate,
    },
    services::{
        analytics::AnalyticsService,
        applications::ApplicationService,
        validation::{validate_candidate, validate_patch},
    },
    utils::{errors::AppError, logger::LOGGER},
    AppState,
};

pub async fn get_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let applications = ApplicationService::new(state.db.clone()).get_all().await?;
    Ok(Json(applications))
}

pub async fn create_application(
    State(state): State<AppState>,
    payload: Result<Json<ApplicationCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let Json(payload) = payload?;
    let new_application = validate_candidate(&payload)?;

    let application = ApplicationService::new(state.db.clone())
        .create(&new_application)
        .await?;

    LOGGER.log_business_event(
        "application_created",
        Some(application.id),
        HashMap::from([(
            "status".to_string(),
            serde_json::Value::from(application.status.as_str()),
        )]),
    );

    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn get_application(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<JobApplication>, AppError> {
    let Path(id) = id?;
    let application = ApplicationService::new(state.db.clone()).get_by_id(id).await?;
    Ok(Json(application))
}

pub async fn update_application(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ApplicationCandidate>, JsonRejection>,
) -> Result<Json<JobApplication>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let new_application = validate_candidate(&payload)?;

    let application = ApplicationService::new(state.db.clone())
        .replace(id, &new_application)
        .await?;

    LOGGER.log_business_event("application_updated", Some(application.id), HashMap::new());

    Ok(Json(application))
}

pub async fn patch_application(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusPatchCandidate>, JsonRejection>,
) -> Result<Json<JobApplication>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = validate_patch(&payload)?;

    let application = ApplicationService::new(state.db.clone())
        .patch_status(id, &patch)
        .await?;

    LOGGER.log_business_event(
        "application_status_changed",
        Some(application.id),
        HashMap::from([
            ("status".to_string(), serde_json::Value::from(application.status.as_str())),
            ("progress".to_string(), serde_json::Value::from(application.progress)),
        ]),
    );

    Ok(Json(application))
}

pub async fn delete_application(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    ApplicationService::new(state.db.clone()).delete(id).await?;

    LOGGER.log_business_event("application_deleted", Some(id), HashMap::new());

    Ok(Json(MessageResponse {
        message: "Application deleted successfully".to_string(),
    }))
}

pub async fn get_application_stats(
    State(state): State<AppState>,
) -> Result<Json<ApplicationStats>, AppError> {
    let stats = AnalyticsService::new(state.db.clone()).get_stats().await?;
    Ok(Json(stats))
}
