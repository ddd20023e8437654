mod configuration;
mod credentials;
mod data;
mod error;
mod http_client;
pub mod markdown;
pub mod render;
mod request_builder;
mod run_log;
mod runner;
pub mod sample;
mod server;
mod session;
pub mod steps;
mod util;

pub use configuration::{RunnerConfiguration, StatusPolicy};
pub use credentials::{Credentials, EnvironmentSettings, DEFAULT_SERVICE_NAME};
pub use data::{InteractionData, RequestData, ResponseData};
pub use error::Error;
pub use http_client::{HttpClient, HyperHttpClient};
pub use request_builder::{
    Method, QueryEncoding, QueryParam, RequestDescriptor, COMMAND_RESOURCE, JOIN_RESOURCE,
    SQL_RESOURCE,
};
pub use run_log::{EntryOutcome, LogEntry, RunLog, RunState};
pub use runner::{run_demo, Runner};
pub use server::{handle_request, serve, DemoApp};
pub use session::Session;
pub use steps::{Step, StepGroup, Variant};
