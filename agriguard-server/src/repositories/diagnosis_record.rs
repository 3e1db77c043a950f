use std::sync::Arc;

use agriguard_api::models::{DiagnosisRecordResponse, DiseaseAnalysis};
use anyhow::Context;
use sqlx::{Error, Sqlite, SqlitePool, Transaction};
use time::{Duration, OffsetDateTime};

use crate::configs::Storage;
use crate::models::DiagnosisRecord;
use crate::services::HistoryStore;

pub struct DiagnosisRecordRepository {
    storage: Arc<Storage>,
    retention: Duration,
}

impl DiagnosisRecordRepository {
    pub fn new(storage: Arc<Storage>, retention_hours: i64) -> Self {
        Self {
            storage,
            retention: Duration::hours(retention_hours.max(1)),
        }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        self.storage.get_pool()
    }

    pub async fn create(
        &self,
        item: &DiagnosisRecord,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO diagnosis_records (id, crop_name, status, analysis, time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.crop_name)
        .bind(&item.status)
        .bind(&item.analysis)
        .bind(item.time)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<DiagnosisRecord>, Error> {
        let record: Option<DiagnosisRecord> =
            sqlx::query_as("SELECT * FROM diagnosis_records WHERE id = $1")
                .bind(id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(record)
    }

    // Newest first
    pub async fn find_since(&self, since: OffsetDateTime) -> Result<Vec<DiagnosisRecord>, Error> {
        let records: Vec<DiagnosisRecord> = sqlx::query_as(
            r#"
            SELECT * FROM diagnosis_records
            WHERE time >= $1
            ORDER BY time DESC
            "#,
        )
        .bind(since)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(records)
    }

    pub async fn delete_before_time(
        &self,
        time: OffsetDateTime,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM diagnosis_records WHERE time < $1")
            .bind(time)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl HistoryStore for DiagnosisRecordRepository {
    async fn append(
        &self,
        analysis: DiseaseAnalysis,
        time: OffsetDateTime,
    ) -> anyhow::Result<DiagnosisRecordResponse> {
        let record = DiagnosisRecord::new(analysis, time);

        let mut tx = self.get_pool().begin().await?;
        let pruned = self.delete_before_time(time - self.retention, &mut tx).await?;
        self.create(&record, &mut tx).await?;
        tx.commit().await?;

        if pruned > 0 {
            tracing::debug!(pruned, "expired diagnosis records removed");
        }

        DiagnosisRecordResponse::try_from(record).context("stored diagnosis id is not a uuid")
    }

    async fn recent(&self, now: OffsetDateTime) -> anyhow::Result<Vec<DiagnosisRecordResponse>> {
        self.find_since(now - self.retention)
            .await?
            .into_iter()
            .map(|record| {
                DiagnosisRecordResponse::try_from(record).context("stored diagnosis id is not a uuid")
            })
            .collect()
    }

    async fn prune(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut tx = self.get_pool().begin().await?;
        let pruned = self.delete_before_time(now - self.retention, &mut tx).await?;
        tx.commit().await?;

        tracing::debug!(pruned, "diagnosis history pruned");

        Ok(pruned)
    }
}
