//! Chirp validation endpoint.
//!
//! Accepts JSON `{"body": "<text>"}` and enforces the 140-character limit.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::http;
use crate::logger;

const MAX_CHIRP_LEN: usize = 140;

#[derive(Deserialize)]
struct ChirpRequest {
    body: String,
}

/// Validate a posted chirp.
pub async fn validate(req: Request<Incoming>) -> Response<Full<Bytes>> {
    let whole_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            logger::log_api_request("POST", "/api/validate_chirp", 400);
            return http::build_json_response(
                StatusCode::BAD_REQUEST,
                &json!({"error": "Failed to read request body"}),
            );
        }
    };

    let (status, body) = match validate_chirp(&whole_body) {
        Ok(()) => (StatusCode::OK, json!({"valid": true})),
        Err(reason) => (StatusCode::BAD_REQUEST, json!({"error": reason})),
    };
    logger::log_api_request("POST", "/api/validate_chirp", status.as_u16());
    http::build_json_response(status, &body)
}

/// Decode and length-check a chirp payload.
fn validate_chirp(payload: &[u8]) -> Result<(), String> {
    let chirp: ChirpRequest =
        serde_json::from_slice(payload).map_err(|e| format!("Invalid JSON: {e}"))?;
    if chirp.body.chars().count() > MAX_CHIRP_LEN {
        return Err("Chirp is too long".to_string());
    }
    Ok(())
}
