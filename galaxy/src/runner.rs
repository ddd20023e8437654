use crate::{
    configuration::{RunnerConfiguration, StatusPolicy},
    credentials::{Credentials, EnvironmentSettings},
    error::Error,
    markdown,
    run_log::{LogEntry, RunLog},
    session::Session,
    steps::{self, Step},
    InteractionData,
};
use tracing::{debug, error, info, warn};

/// Drives the step table: one request at a time, each only after the previous response.
#[derive(Debug)]
pub struct Runner {
    configuration: RunnerConfiguration,
    steps: Vec<Step>,
}

impl Runner {
    pub fn new(configuration: RunnerConfiguration) -> Self {
        let steps = steps::steps(configuration.variant());

        Self {
            configuration,
            steps,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step in order. A transport error, or a rejected status under
    /// `StatusPolicy::FailOnError`, ends the run after its error entry.
    pub async fn run(&self, mut session: Session) -> RunLog {
        let http_client = self.configuration.http_client();
        let encoding = self.configuration.query_encoding();
        let mut log = RunLog::new();

        for (index, step) in self.steps.iter().enumerate() {
            let mut request_data = step.request().to_request_data(session.base_url(), encoding);
            session.decorate(&mut request_data);

            debug!(
                step = index + 1,
                method = %request_data.method,
                url = %request_data.uri,
                "sending request"
            );

            let mut response_data = match http_client.make_request(&request_data).await {
                Ok(response_data) => response_data,
                Err(e) => {
                    error!(step = index + 1, label = step.label(), error = %e, "request failed");
                    log.push(LogEntry::transport_error(step, e.to_string()));
                    log.abort(index);
                    break;
                }
            };

            session.observe(&response_data);
            info!(
                step = index + 1,
                label = step.label(),
                status = response_data.status_code,
                "received response"
            );

            let rejected = self.configuration.status_policy() == StatusPolicy::FailOnError
                && response_data.status_code >= 400;
            if rejected {
                warn!(step = index + 1, status = response_data.status_code, "response rejected");
                log.push(LogEntry::application_error(step, &response_data));
            } else {
                log.push(LogEntry::response(step, &response_data));
            }

            Session::redact(&mut request_data);
            Session::redact_response(&mut response_data);
            log.record(InteractionData {
                interaction_number: index,
                request_data,
                response_data,
            });

            if rejected {
                log.abort(index);
                break;
            }
        }

        if !log.is_aborted() {
            log.complete();
        }

        log
    }

    /// Writes the run's interactions to the configured transcript. With transcript checking
    /// on, an existing transcript whose request sequence differs is kept and reported instead.
    pub fn save_transcript(&self, log: &RunLog) -> Result<(), Error> {
        let path = match self.configuration.transcript_path() {
            Some(path) => path,
            None => return Ok(()),
        };

        if self.configuration.check_transcript() && path.exists() {
            markdown::check_structure_unchanged(path, log.interactions())?;
            info!(path = %path.display(), "run matches the saved transcript");
        }

        markdown::save_interactions(path, log.interactions())?;
        debug!(path = %path.display(), "transcript saved");

        Ok(())
    }
}

/// Resolves credentials, runs the demo once and saves its transcript.
pub async fn run_demo(
    configuration: &RunnerConfiguration,
    settings: &EnvironmentSettings,
) -> RunLog {
    let credentials = match Credentials::resolve(settings) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "couldn't resolve database credentials");
            return RunLog::not_started(e.to_string());
        }
    };

    info!(
        base_url = %credentials.base_url,
        variant = ?configuration.variant(),
        "running database test"
    );

    let runner = Runner::new(configuration.clone());
    let log = runner.run(Session::new(&credentials)).await;

    if let Err(e) = runner.save_transcript(&log) {
        warn!(error = %e, "transcript not saved");
    }

    log
}
