//! Health endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /health.
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    /// Always `"pass"` once the server is listening.
    status: &'static str,
    /// Application version.
    version: String,
    /// Safe mode applied to C4 sources.
    safe_mode: &'static str,
}

/// Handle GET /health.
pub(crate) async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "pass",
        version: state.version.clone(),
        safe_mode: state.c4plantuml.safe_mode().as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "pass",
            version: "0.1.0".to_owned(),
            safe_mode: "secure",
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "pass");
        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["safe_mode"], "secure");
    }
}
