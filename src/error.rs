use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Internal,
    Config,
    ServiceFailure,
    MalformedResponse,
    MissingLocation,
    InvalidInput,
    Busy,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            1 => ErrorKind::Config,
            3 | 4 => ErrorKind::ServiceFailure,
            6 => ErrorKind::MalformedResponse,
            100 => ErrorKind::Busy,
            101 => ErrorKind::InvalidInput,
            102 => ErrorKind::MissingLocation,
            _ => ErrorKind::Internal,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        malformed_response_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn busy_error() -> Error {
    Error {
        code: 100,
        message: "session busy".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn missing_location_error() -> Error {
    Error {
        code: 102,
        message: "no location fix available".into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        message: format!("environment variable error: {}", err),
    }
}

pub fn config_error(detail: impl Display) -> Error {
    Error {
        code: 1,
        message: format!("configuration error: {}", detail),
    }
}

pub fn session_closed_error() -> Error {
    Error {
        code: 2,
        message: "session closed".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: format!("reqwest error: {}", err),
    }
}

pub fn upstream_error(detail: impl Display) -> Error {
    Error {
        code: 4,
        message: format!("upstream error: {}", detail),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn malformed_response_error<T: Debug>(detail: T) -> Error {
    Error {
        code: 6,
        message: format!("malformed response: {:?}", detail),
    }
}

#[test]
fn error_kinds_follow_codes() {
    assert_eq!(busy_error().kind(), ErrorKind::Busy);
    assert_eq!(missing_location_error().kind(), ErrorKind::MissingLocation);
    assert_eq!(upstream_error("OVER_QUERY_LIMIT").kind(), ErrorKind::ServiceFailure);
    assert_eq!(
        malformed_response_error("no geocoded_waypoints").kind(),
        ErrorKind::MalformedResponse
    );
    assert_eq!(unexpected_error().kind(), ErrorKind::Internal);
}

#[test]
fn client_errors_keep_their_message() {
    let response = invalid_input_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upstream_error("REQUEST_DENIED").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
