// Scan record emission
// Completed scans are handed off fire-and-forget; the document store is written in batches

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{app_config::PersistenceConfig, models::scan::ScanRecord};

#[derive(Error, Debug)]
pub enum RecordSinkError {
    #[error("Scan record queue is closed")]
    QueueClosed,

    #[error("Scan record queue is full")]
    QueueFull,

    #[error("Document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store rejected batch with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Destination for completed scan records. Must not block the caller.
pub trait ScanRecordSink: Send + Sync {
    fn submit(&self, record: ScanRecord) -> Result<(), RecordSinkError>;
}

/// Pick the sink matching the persistence configuration
pub fn record_sink_from_config(
    config: &PersistenceConfig,
) -> Result<Arc<dyn ScanRecordSink>, RecordSinkError> {
    match config.document_store_url.as_deref() {
        Some(endpoint) => {
            info!("Scan records will be written to {}", endpoint);
            let client = reqwest::Client::builder()
                .timeout(Duration::from_millis(config.request_timeout_ms))
                .build()?;

            Ok(Arc::new(DocumentStoreWriter::new(
                client,
                endpoint,
                config.batch_size,
                Duration::from_millis(config.flush_interval_ms),
                config.queue_capacity,
            )))
        },
        None => {
            info!("No document store configured, scan records will only be logged");
            Ok(Arc::new(LoggingRecordSink))
        },
    }
}

// =============================================================================
// LOGGING SINK
// =============================================================================

/// Logs records instead of storing them
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRecordSink;

impl ScanRecordSink for LoggingRecordSink {
    fn submit(&self, record: ScanRecord) -> Result<(), RecordSinkError> {
        info!(
            record_id = %record.id,
            user_id = %record.user_id,
            mode = %record.mode,
            score = record.score,
            "Scan record: {} -> {}",
            record.target,
            record.status
        );
        Ok(())
    }
}

// =============================================================================
// DOCUMENT STORE WRITER
// =============================================================================

/// Batches records and POSTs them as a JSON array to the document store.
///
/// At most `queue_capacity` records wait behind an in-flight write; further
/// submissions are refused with `QueueFull`. Request timeouts belong on `client`.
pub struct DocumentStoreWriter {
    tx: mpsc::Sender<ScanRecord>,
}

impl DocumentStoreWriter {
    /// Spawns the background flush task; must be called inside a tokio runtime
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        batch_size: usize,
        flush_interval: Duration,
        queue_capacity: usize,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<ScanRecord>(queue_capacity.max(1));
        let endpoint = endpoint.into();
        let batch_size = batch_size.max(1);

        tokio::spawn(async move {
            let mut batch = Vec::with_capacity(batch_size);
            let mut ticker = interval_at(Instant::now() + flush_interval, flush_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(record) => {
                            batch.push(record);

                            if batch.len() >= batch_size {
                                Self::write_batch(&client, &endpoint, &mut batch).await;
                            }
                        },
                        None => {
                            // All senders dropped: drain what is left and stop
                            Self::write_batch(&client, &endpoint, &mut batch).await;
                            debug!("Scan record writer stopped");
                            break;
                        },
                    },
                    _ = ticker.tick() => {
                        if !batch.is_empty() {
                            Self::write_batch(&client, &endpoint, &mut batch).await;
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    async fn write_batch(client: &reqwest::Client, endpoint: &str, batch: &mut Vec<ScanRecord>) {
        if batch.is_empty() {
            return;
        }

        let records: Vec<ScanRecord> = batch.drain(..).collect();
        match Self::post_batch(client, endpoint, &records).await {
            Ok(()) => info!("Wrote batch of {} scan records", records.len()),
            Err(e) => error!("Failed to write {} scan records: {}", records.len(), e),
        }
    }

    async fn post_batch(
        client: &reqwest::Client,
        endpoint: &str,
        records: &[ScanRecord],
    ) -> Result<(), RecordSinkError> {
        let response = client.post(endpoint).json(records).send().await?;

        if !response.status().is_success() {
            return Err(RecordSinkError::Rejected(response.status()));
        }
        Ok(())
    }
}

impl ScanRecordSink for DocumentStoreWriter {
    fn submit(&self, record: ScanRecord) -> Result<(), RecordSinkError> {
        self.tx.try_send(record).map_err(|e| match e {
            TrySendError::Full(_) => RecordSinkError::QueueFull,
            TrySendError::Closed(_) => RecordSinkError::QueueClosed,
        })
    }
}
