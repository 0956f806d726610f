//! Gateway error type

use reqwest::StatusCode;
use thiserror::Error;

use crate::core::cache::CacheError;

/// Everything that can go wrong talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connect, transport or timeout failure; no response was received
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server rejected the request (4xx other than 401)
    #[error("Request failed ({status}){}", fmt_message(.message))]
    Client {
        status: u16,
        message: Option<String>,
    },

    /// The server failed (5xx)
    #[error("Server error ({status}){}", fmt_message(.message))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The token was missing, expired or refused; the session has ended
    #[error("Not signed in{}", fmt_message(.message))]
    Unauthenticated { message: Option<String> },

    /// The body was not the JSON shape the endpoint promises
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),

    /// A record id that cannot be used as a path segment
    #[error("Invalid record id '{0}'")]
    InvalidId(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

fn fmt_message(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl ApiError {
    /// Categorize a non-success HTTP status
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthenticated { message }
        } else if status.is_server_error() {
            ApiError::Server {
                status: status.as_u16(),
                message,
            }
        } else {
            ApiError::Client {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// The `message` the server sent back, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Client { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Unauthenticated { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message, or `fallback` when the server gave none
    ///
    /// This is the text shown to the user after a failed operation.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthenticated { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated { .. })
    }
}
