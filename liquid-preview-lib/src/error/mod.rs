use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse sample data JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to render template '{name}'")]
    Render {
        name: String,
        #[source]
        source: liquid::Error,
    },
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template file not found: {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("Invalid sample data: {0}")]
    InvalidSampleData(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PreviewError {
    /// The top-level message followed by the message of every inner cause.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut source = self.source();
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }
        messages
    }

    /// Log the error and each inner cause.
    pub fn report(&self) {
        let mut chain = self.chain().into_iter();
        if let Some(message) = chain.next() {
            tracing::error!("Error: {}", message);
        }
        for inner in chain {
            tracing::error!("  Inner: {}", inner);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingMessage {
    pub message: String,
    pub source: Option<String>,
}

impl ProcessingMessage {
    pub fn new(message: impl Into<String>, source: Option<String>) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// Non-fatal problems collected while rendering one document.
#[derive(Debug, Default, Clone)]
pub struct ProcessingState {
    warnings: Vec<ProcessingMessage>,
}

impl ProcessingState {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>, source: Option<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(ProcessingMessage::new(message, source));
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn get_warnings(&self) -> &[ProcessingMessage] {
        &self.warnings
    }

    pub fn merge(&mut self, other: ProcessingState) {
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, PartialEq)]
pub enum ProcessingOutcome {
    Success,
    SuccessWithWarnings(Vec<ProcessingMessage>),
}

impl ProcessingOutcome {
    pub fn from_state(state: ProcessingState) -> Self {
        if state.warnings.is_empty() {
            ProcessingOutcome::Success
        } else {
            ProcessingOutcome::SuccessWithWarnings(state.warnings)
        }
    }
}
