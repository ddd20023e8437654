use crate::{steps::Step, InteractionData, ResponseData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Any HTTP response, whatever its status.
    Response { status_code: u16 },
    /// A 4xx/5xx response rejected by `StatusPolicy::FailOnError`.
    ApplicationError { status_code: u16 },
    /// No response was received.
    TransportError,
    /// The run could not start.
    ConfigurationError,
}

/// One line of the run log, together with the headings printed before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub headings: &'static [&'static str],
    pub label: &'static str,
    pub outcome: EntryOutcome,
    pub line: String,
}

impl LogEntry {
    pub fn response(step: &Step, response_data: &ResponseData) -> Self {
        Self {
            headings: step.headings(),
            label: step.label(),
            outcome: EntryOutcome::Response {
                status_code: response_data.status_code,
            },
            line: format!("   -  {}: {}", step.label(), response_data.body),
        }
    }

    pub fn application_error(step: &Step, response_data: &ResponseData) -> Self {
        Self {
            headings: step.headings(),
            label: step.label(),
            outcome: EntryOutcome::ApplicationError {
                status_code: response_data.status_code,
            },
            line: format!(
                "ERROR: {} {}",
                response_data.status_code, response_data.body
            ),
        }
    }

    pub fn transport_error<M: AsRef<str>>(step: &Step, message: M) -> Self {
        Self {
            headings: step.headings(),
            label: step.label(),
            outcome: EntryOutcome::TransportError,
            line: format!("ERROR: {}", message.as_ref()),
        }
    }

    pub fn configuration_error<M: AsRef<str>>(message: M) -> Self {
        Self {
            headings: &[],
            label: "Configuration",
            outcome: EntryOutcome::ConfigurationError,
            line: format!("ERROR: {}", message.as_ref()),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self.outcome, EntryOutcome::Response { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    /// Stopped at the zero-based step index.
    Aborted { step: usize },
}

/// Append-only record of one run.
#[derive(Debug, Clone)]
pub struct RunLog {
    entries: Vec<LogEntry>,
    interactions: Vec<InteractionData>,
    state: RunState,
}

impl RunLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            interactions: Vec::new(),
            state: RunState::Running,
        }
    }

    /// A log for a run that failed before its first step.
    pub fn not_started<M: AsRef<str>>(message: M) -> Self {
        let mut log = Self::new();
        log.push(LogEntry::configuration_error(message));
        log.state = RunState::Aborted { step: 0 };
        log
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn interactions(&self) -> &[InteractionData] {
        &self.interactions
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.state, RunState::Aborted { .. })
    }

    /// The step labels in order, which stay the same from run to run.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.label).collect()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn record(&mut self, interaction: InteractionData) {
        self.interactions.push(interaction);
    }

    pub(crate) fn complete(&mut self) {
        self.state = RunState::Completed;
    }

    pub(crate) fn abort(&mut self, step: usize) {
        self.state = RunState::Aborted { step };
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}
