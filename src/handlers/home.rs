use axum::response::Json;
use serde_json::{json, Value};

pub async fn home() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Job Application API",
        "endpoints": {
            "GET/POST /api/applications": "Get all or create new applications",
            "GET/PUT/PATCH/DELETE /api/applications/<id>": "Get, replace, update the status of, or delete a specific application",
            "GET /api/applications/stats": "Get application statistics"
        }
    }))
}

pub async fn health() -> &'static str {
    "OK"
}
