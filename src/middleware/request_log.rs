use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::utils::logger::LOGGER;

pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    LOGGER.log_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start_time.elapsed().as_millis(),
    );

    response
}
