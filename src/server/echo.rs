use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct EchoRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EchoResponse {
    pub echo: String,
}

/// `POST /echo`: returns the posted text unchanged.
pub async fn echo(Json(req): Json<EchoRequest>) -> Json<EchoResponse> {
    Json(EchoResponse { echo: req.text })
}
