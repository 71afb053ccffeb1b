use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Custom error type for sign-in/sign-out, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP Error: {0}")]
    HTTP(String),
    #[error("Sign-in refused ({status}): {body}")]
    Refused { status: StatusCode, body: String },
    #[error("Sign-out failed ({status}): {body}")]
    SignOut { status: StatusCode, body: String },
    #[error("Decoding credentials: {0}")]
    Decoding(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::HTTP(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Decoding(e.to_string())
    }
}

/// Everything that can go wrong while looking up or downloading content
///
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP Error: {0}")]
    HTTP(#[from] reqwest::Error),
    #[error("Error({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Decoding response: {0}")]
    Decoding(#[from] serde_json::Error),
    #[error("No filename in Content-Disposition")]
    NoFilename,
    #[error("Can not write {0:?}: {1}")]
    Write(PathBuf, io::Error),
}
