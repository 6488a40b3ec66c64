use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request fields are Option + default so a missing field surfaces as the
// gateway's own 400 message instead of the extractor's generic rejection.

#[derive(Debug, Clone, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "photoBase64")]
    pub photo_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub ok: bool,
    pub phone: String,
    #[serde(rename = "otpSent")]
    pub otp_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub ok: bool,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub ok: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub ok: bool,
    pub classification: Classification,
}

/// Fixed output contract of the classification flow. Always fully populated;
/// `raw` carries the upstream body verbatim for client-side debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: Option<String>,
    pub confidence: f64,
    pub source: Option<String>,
    pub raw: Value,
}
