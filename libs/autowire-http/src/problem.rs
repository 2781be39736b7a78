//! RFC 9457 Problem Details returned for failed calls

use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;

use autowire::ServiceFault;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(serialize_with = "serialize_status_code")]
    pub status: StatusCode,
    pub detail: String,
    /// Request path the problem occurred on.
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
        }
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn endpoint_not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            format!("no endpoint bound at '{path}'"),
        )
        .with_code("ENDPOINT_NOT_FOUND")
    }

    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", detail).with_code("INVALID_PAYLOAD")
    }
}

impl From<ServiceFault> for Problem {
    fn from(fault: ServiceFault) -> Self {
        let detail = fault.to_string();
        match fault {
            ServiceFault::UnknownOperation(_) => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", detail).with_code("UNKNOWN_OPERATION")
            }
            ServiceFault::InvalidInput(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", detail).with_code("INVALID_INPUT")
            }
            ServiceFault::Failed(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                detail,
            )
            .with_code("SERVICE_FAULT"),
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = match serde_json::to_vec(&self) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize problem details");
                return status.into_response();
            }
        };

        let mut resp = (status, body).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let resp = Problem::invalid_payload("not json").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn faults_map_to_statuses() {
        let cases = [
            (ServiceFault::UnknownOperation("x".to_owned()), StatusCode::NOT_FOUND),
            (ServiceFault::InvalidInput("x".to_owned()), StatusCode::BAD_REQUEST),
            (ServiceFault::Failed("x".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (fault, status) in cases {
            assert_eq!(Problem::from(fault).status, status);
        }
    }

    #[test]
    fn status_serializes_as_number() {
        let v = serde_json::to_value(Problem::endpoint_not_found("/Nope")).unwrap();
        assert_eq!(v["status"], 404);
        assert_eq!(v["type"], "about:blank");
        assert_eq!(v["code"], "ENDPOINT_NOT_FOUND");
    }
}
