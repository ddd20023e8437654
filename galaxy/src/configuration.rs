use crate::{
    http_client::HttpClient, request_builder::QueryEncoding, steps::Variant, HyperHttpClient,
};
use std::{path::PathBuf, sync::Arc};

/// What a run does with 4xx/5xx responses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StatusPolicy {
    /// Log every response as a result and keep going.
    LogAll,
    /// Stop the run on the first 4xx/5xx response.
    FailOnError,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        StatusPolicy::LogAll
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfiguration {
    variant: Variant,
    query_encoding: QueryEncoding,
    status_policy: StatusPolicy,
    transcript_path: Option<PathBuf>,
    check_transcript: bool,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl RunnerConfiguration {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            query_encoding: QueryEncoding::default(),
            status_policy: StatusPolicy::default(),
            transcript_path: None,
            check_transcript: false,
            http_client: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn set_query_encoding(&mut self, query_encoding: QueryEncoding) {
        self.query_encoding = query_encoding;
    }

    pub fn query_encoding(&self) -> QueryEncoding {
        self.query_encoding
    }

    pub fn set_status_policy(&mut self, status_policy: StatusPolicy) {
        self.status_policy = status_policy;
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Every run writes its interactions to this markdown file.
    pub fn set_transcript_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.transcript_path = Some(path.into());
    }

    pub fn transcript_path(&self) -> Option<&PathBuf> {
        self.transcript_path.as_ref()
    }

    /// Compare each run with the existing transcript before overwriting it.
    pub fn set_check_transcript(&mut self, value: bool) {
        self.check_transcript = value;
    }

    pub fn check_transcript(&self) -> bool {
        self.check_transcript
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(HyperHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }
}

impl Default for RunnerConfiguration {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}
