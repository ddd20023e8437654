//! Markdown transcripts of a run: one section per request/response pair.

pub mod error;

use crate::InteractionData;
use error::{Error, InteractionDifference};
use fs::File;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashMap, fs, io::Write, path::Path};

lazy_static! {
    static ref HEADER_REGEX: Regex =
        Regex::new(r"(?m)(?P<header_key>[a-zA-Z\-]+): (?P<header_value>.*?)$").unwrap();
    static ref MARKDOWN_REGEX: Regex = Regex::new(
        "(?ms)\
            \\#\\# Interaction (?P<interaction_number>[0-9]+): (?P<http_method>[A-Z]+) (?P<uri>[^\r\n]*)\\s*\
            \\#\\#\\# Request headers recorded for playback.*?\
            ```\\s*(?P<request_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Request body recorded for playback.*?\
            ```\\s*(?P<request_body_part>.*?)\\s*```.*?\
            \\#\\#\\# Response headers recorded for playback.*?\
            ```\\s*(?P<response_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Response body recorded for playback \\((?P<status_code>[0-9]+)[^)]*\\).*?\
            ```\\s*(?P<response_body_part>.*?)\\s*```"
    )
    .unwrap();
}

#[derive(Debug, Clone)]
pub struct MarkdownData {
    pub interaction_number: usize,
    pub uri: String,
    pub method: String,
    pub request_headers: HashMap<String, String>,
    pub request_body: String,

    pub status_code: u16,
    pub response_headers: HashMap<String, String>,
    pub response_body: String,
}

pub fn load_markdown<P: AsRef<Path>>(filename: P) -> Result<Vec<MarkdownData>, Error> {
    let file_contents = fs::read_to_string(filename)?;
    parse_markdown(&file_contents)
}

pub fn parse_markdown(file_contents: &str) -> Result<Vec<MarkdownData>, Error> {
    let mut data = Vec::new();

    for captures in MARKDOWN_REGEX.captures_iter(file_contents) {
        let uri = &captures["uri"];
        let interaction_number = captures["interaction_number"]
            .parse()
            .map_err(|_| Error::InvalidInteractionNumber)?;
        let request_headers_part = &captures["request_headers_part"];
        let request_body_part = &captures["request_body_part"];
        let status_code = captures["status_code"]
            .parse()
            .map_err(|_| Error::InvalidStatusCode)?;
        let method = &captures["http_method"];
        let response_headers_part = &captures["response_headers_part"];
        let response_body_part = &captures["response_body_part"];

        let response_headers = parse_headers(response_headers_part);
        let request_headers = parse_headers(request_headers_part);

        data.push(MarkdownData {
            request_body: request_body_part.into(),
            interaction_number,
            status_code,
            method: method.into(),
            request_headers,
            response_headers,
            response_body: response_body_part.into(),
            uri: uri.trim().into(),
        });
    }

    if data.is_empty() {
        Err(Error::InvalidMarkdownFormat)
    } else {
        Ok(data)
    }
}

fn parse_headers<T: AsRef<str>>(headers_part: T) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for capture in HEADER_REGEX.captures_iter(headers_part.as_ref()) {
        headers.insert(
            String::from(capture["header_key"].trim()),
            String::from(capture["header_value"].trim()),
        );
    }

    headers
}

pub fn save_interactions<'a, P: AsRef<Path>, I: IntoIterator<Item = &'a InteractionData>>(
    markdown_path: P,
    interactions: I,
) -> Result<(), Error> {
    let mut file = File::create(markdown_path.as_ref())?;
    write_interactions(&mut file, interactions)?;
    Ok(())
}

pub fn write_interactions<'a, W: Write, I: IntoIterator<Item = &'a InteractionData>>(
    writer: &mut W,
    interactions: I,
) -> Result<(), Error> {
    for interaction in interactions {
        write!(
            writer,
            "## Interaction {}: {} {}\r\n\r\n",
            interaction.interaction_number,
            interaction.request_data.method,
            interaction.request_data.uri
        )?;
        write!(
            writer,
            "### Request headers recorded for playback:\r\n\r\n```\r\n"
        )?;
        for (key, value) in sorted(&interaction.request_data.headers) {
            write!(writer, "{}: {}\r\n", key, value)?;
        }
        write!(writer, "```\r\n\r\n")?;

        write!(
            writer,
            "### Request body recorded for playback ():\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
            &interaction.request_data.body,
        )?;
        write!(
            writer,
            "### Response headers recorded for playback:\r\n\r\n```\r\n"
        )?;
        for (key, value) in sorted(&interaction.response_data.headers) {
            write!(writer, "{}: {}\r\n", key, value)?;
        }
        write!(writer, "```\r\n\r\n")?;
        write!(
            writer,
            "### Response body recorded for playback ({}: {}):\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
            interaction.response_data.status_code,
            interaction
                .response_data
                .headers
                .get("content-type")
                .map(String::as_str)
                .unwrap_or(""),
            &interaction.response_data.body
        )?;
    }

    Ok(())
}

fn sorted(headers: &HashMap<String, String>) -> Vec<(&String, &String)> {
    let mut headers: Vec<_> = headers.iter().collect();
    headers.sort();
    headers
}

/// Checks that a run issued the same requests, in the same order, as the saved transcript.
/// Bodies are not compared: server-assigned identifiers legitimately differ between runs.
pub fn check_structure_unchanged<'a, P: AsRef<Path>, I: IntoIterator<Item = &'a InteractionData>>(
    markdown_path: P,
    interactions: I,
) -> Result<(), Error> {
    let markdown_data = load_markdown(markdown_path)?;
    let old_requests: Vec<String> = markdown_data
        .iter()
        .map(|data| format!("{} {}", data.method, data.uri))
        .collect();
    let new_requests: Vec<String> = interactions
        .into_iter()
        .map(|interaction| {
            format!(
                "{} {}",
                interaction.request_data.method, interaction.request_data.uri
            )
        })
        .collect();

    for interaction_number in 0..old_requests.len().max(new_requests.len()) {
        let old_request = old_requests.get(interaction_number);
        let new_request = new_requests.get(interaction_number);

        if old_request != new_request {
            return Err(Error::TranscriptsDiffer(InteractionDifference {
                interaction_number,
                old_request: old_request.cloned(),
                new_request: new_request.cloned(),
            }));
        }
    }

    Ok(())
}
