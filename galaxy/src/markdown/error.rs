use std::{fmt, io};
use thiserror::Error;

#[derive(Debug)]
pub struct InteractionDifference {
    pub interaction_number: usize,
    pub old_request: Option<String>,
    pub new_request: Option<String>,
}

impl fmt::Display for InteractionDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |request: &Option<String>| match request {
            Some(request) => request.escape_default().to_string(),
            None => String::from("<no interaction>"),
        };

        write!(
            f,
            "Interaction {} differs. Old: \"{}\". New: \"{}\"",
            self.interaction_number,
            describe(&self.old_request),
            describe(&self.new_request)
        )
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Markdown format is invalid")]
    InvalidMarkdownFormat,
    #[error("Couldn't parse interaction number from the markdown file")]
    InvalidInteractionNumber,
    #[error("The status code is invalid")]
    InvalidStatusCode,
    #[error("{0}")]
    TranscriptsDiffer(InteractionDifference),
}
