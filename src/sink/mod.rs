mod rest;
mod sqlite;

pub use rest::RestSink;
pub use sqlite::SqliteSink;

use crate::answers::AnswerSet;
use crate::assessment::AssessmentResult;
use crate::settings::{SinkBackend, SinkConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("results storage is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("results store answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("cannot encode answers: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What a save attempt produced. Sinks never surface anything else to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed { reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

impl From<Result<(), SinkError>> for SaveOutcome {
    fn from(result: Result<(), SinkError>) -> Self {
        match result {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist assessment result");
                SaveOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Insert payload for the hosted results table. The local store adds `severity`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow<'a> {
    pub subject_name: &'a str,
    pub score: u32,
    pub category: &'a str,
    pub answers: &'a AnswerSet,
    pub completed_at: DateTime<Utc>,
}

impl<'a> From<&'a AssessmentResult> for ResultRow<'a> {
    fn from(result: &'a AssessmentResult) -> Self {
        Self {
            subject_name: &result.subject_name,
            score: result.total_score,
            category: &result.band_label,
            answers: &result.answers,
            completed_at: result.completed_at,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait ResultsSink {
    /// Best-effort liveness check. False on any failure.
    async fn probe_connectivity(&self) -> bool;

    async fn persist(&self, result: &AssessmentResult) -> SaveOutcome;
}

pub enum Sink {
    Rest(RestSink),
    Sqlite(SqliteSink),
    Disabled,
}

impl Sink {
    pub fn from_config(config: &SinkConfig) -> Result<Self, SinkError> {
        match config.backend {
            SinkBackend::Rest => Ok(Sink::Rest(RestSink::new(&config.rest)?)),
            SinkBackend::Sqlite => Ok(Sink::Sqlite(SqliteSink::open(&config.sqlite)?)),
            SinkBackend::Disabled => Ok(Sink::Disabled),
        }
    }

    pub fn backend(&self) -> SinkBackend {
        match self {
            Sink::Rest(_) => SinkBackend::Rest,
            Sink::Sqlite(_) => SinkBackend::Sqlite,
            Sink::Disabled => SinkBackend::Disabled,
        }
    }
}

impl ResultsSink for Sink {
    async fn probe_connectivity(&self) -> bool {
        match self {
            Sink::Rest(sink) => sink.probe_connectivity().await,
            Sink::Sqlite(sink) => sink.probe_connectivity().await,
            Sink::Disabled => false,
        }
    }

    async fn persist(&self, result: &AssessmentResult) -> SaveOutcome {
        match self {
            Sink::Rest(sink) => sink.persist(result).await,
            Sink::Sqlite(sink) => sink.persist(result).await,
            Sink::Disabled => SaveOutcome::from(Err::<(), _>(SinkError::NotConfigured)),
        }
    }
}
