use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Success envelope: `{ "message": ..., "status": "success", ...data }`.
///
/// The fields of `data` are flattened next to `message` and `status`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = serde_json::Value> {
    pub message: String,
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            status: ResponseStatus::Success,
            data: Some(data),
        }
    }
}

impl ApiResponse {
    /// Acknowledgement without a payload.
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: ResponseStatus::Success,
            data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    pub status: ResponseStatus,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: ResponseStatus::Error,
            code: code.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct PublicKey {
        #[serde(rename = "publicKey")]
        public_key: String,
    }

    #[test]
    fn data_is_flattened_into_envelope() {
        let resp = ApiResponse::ok("ok", PublicKey { public_key: "BEl6".into() });
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], "ok");
        assert_eq!(value["publicKey"], "BEl6");
    }

    #[test]
    fn ack_has_only_message_and_status() {
        let value = serde_json::to_value(ApiResponse::ack("Suscripción guardada exitosamente")).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 2);
        assert_eq!(obj["status"], "success");
    }
}
