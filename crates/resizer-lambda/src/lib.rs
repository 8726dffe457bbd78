//! Resizer entry points
//!
//! Shared by the serverless handler and the local runner: building the pipeline
//! from configuration, mapping S3 notifications to records, and translating the
//! runtime deadline.

use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent};
use resizer_core::{Derivative, NotificationRecord, ResizeError, ResizeResult, ResizerConfig};
use resizer_infra::report_error;
use resizer_processing::{EventPipeline, PipelineSettings};
use resizer_storage::{create_storage_client, StorageGateway};
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

/// Response of a successful invocation
#[derive(Debug, Clone, Serialize)]
pub struct InvocationSummary {
    pub records: usize,
    pub derivatives: Vec<Derivative>,
}

/// Load and validate configuration from the environment.
pub fn load_config() -> ResizeResult<ResizerConfig> {
    ResizerConfig::from_env().map_err(ResizeError::from)
}

/// Build the storage client, gateway and pipeline for `config`. Called once per process.
pub async fn build_pipeline(config: &ResizerConfig) -> ResizeResult<EventPipeline> {
    let client = create_storage_client(config).await?;
    let pipeline = EventPipeline::new(StorageGateway::new(client), PipelineSettings::from(config));

    tracing::info!(
        backend = %config.storage_backend,
        derivatives = pipeline.catalog().len(),
        max_object_size_bytes = config.max_object_size_bytes,
        storage_timeout_secs = config.storage_timeout.as_secs(),
        "Pipeline ready"
    );
    Ok(pipeline)
}

/// Map every S3 record to a notification record, in delivery order.
///
/// Object keys arrive form-encoded (`+` for space, `%XX` escapes). A record
/// without a bucket or key fails the whole event.
pub fn records_from_event(event: &S3Event) -> ResizeResult<Vec<NotificationRecord>> {
    event
        .records
        .iter()
        .map(|record| {
            let bucket = record
                .s3
                .bucket
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ResizeError::Format("S3 record without bucket name".to_string()))?;
            let key = record
                .s3
                .object
                .key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| ResizeError::Format("S3 record without object key".to_string()))?;

            Ok(NotificationRecord::new(bucket, decode_key(key)?))
        })
        .collect()
}

/// Decode an S3 notification object key.
pub fn decode_key(raw: &str) -> ResizeResult<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| ResizeError::Format(format!("object key {} is not valid UTF-8: {}", raw, e)))
}

/// Convert the runtime deadline (milliseconds since the Unix epoch) into a tokio
/// instant. A zero deadline means the runtime did not provide one.
pub fn invocation_deadline(deadline_ms: u64, now: SystemTime) -> Option<Instant> {
    if deadline_ms == 0 {
        return None;
    }
    let deadline = UNIX_EPOCH + Duration::from_millis(deadline_ms);
    let remaining = deadline.duration_since(now).unwrap_or(Duration::ZERO);
    Some(Instant::now() + remaining)
}

/// Handle one S3 notification batch.
pub async fn handle_event(
    pipeline: &EventPipeline,
    event: LambdaEvent<S3Event>,
) -> Result<InvocationSummary, Error> {
    let LambdaEvent { payload, context } = event;
    let deadline = invocation_deadline(context.deadline, SystemTime::now());

    let result = match records_from_event(&payload) {
        Ok(records) => pipeline
            .process_batch(&records, deadline)
            .await
            .map(|derivatives| InvocationSummary {
                records: records.len(),
                derivatives,
            }),
        Err(err) => Err(err),
    };

    result.map_err(|err| {
        report_error(&err);
        Error::from(err)
    })
}
