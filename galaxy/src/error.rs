use crate::markdown;
use hyper::http;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Hyper error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("Http Error: {0}")]
    HttpError(#[from] http::Error),
    #[error("Invalid header name")]
    InvalidHeaderName(#[from] hyper::header::InvalidHeaderName),
    #[error("Invalid header value")]
    InvalidHeaderValue(#[from] hyper::header::InvalidHeaderValue),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("The database service hasn't been configured: {0}")]
    NotConfigured(String),
    #[error("Transcript error: {0}")]
    TranscriptError(#[from] markdown::error::Error),
}
