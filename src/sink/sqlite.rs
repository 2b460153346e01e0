use super::{ResultRow, ResultsSink, SaveOutcome, SinkError};
use crate::assessment::AssessmentResult;
use crate::db::{self, DbPool, NewResult};
use crate::settings::Sqlite;

pub struct SqliteSink {
    pool: DbPool,
}

impl SqliteSink {
    /// Opens the pool and applies pending migrations.
    pub fn open(config: &Sqlite) -> Result<Self, SinkError> {
        let pool = db::establish_pool(&config.database_url, config.pool_size)?;
        {
            let mut conn = pool.get()?;
            db::configure_connection(&mut conn)?;
            let applied = db::run_migrations(&mut conn).map_err(SinkError::Migration)?;
            if applied > 0 {
                tracing::info!(applied, "applied results migrations");
            }
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn try_probe(&self) -> Result<(), SinkError> {
        let mut conn = self.pool.get()?;
        db::first_result_id(&mut conn)?;
        Ok(())
    }

    fn try_persist(&self, result: &AssessmentResult) -> Result<(), SinkError> {
        let row = ResultRow::from(result);
        let new_result = NewResult {
            subject_name: row.subject_name.to_string(),
            score: row.score as i32,
            category: row.category.to_string(),
            severity: result.severity.to_string(),
            answers: serde_json::to_string(row.answers)?,
            completed_at: row.completed_at.timestamp(),
        };

        let mut conn = self.pool.get()?;
        db::insert_result(&mut conn, &new_result)?;
        Ok(())
    }
}

impl ResultsSink for SqliteSink {
    async fn probe_connectivity(&self) -> bool {
        match self.try_probe() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "probe failed");
                false
            }
        }
    }

    async fn persist(&self, result: &AssessmentResult) -> SaveOutcome {
        self.try_persist(result).into()
    }
}
