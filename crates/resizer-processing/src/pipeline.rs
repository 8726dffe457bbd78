//! Event pipeline: one notification in, one derivative per catalog entry out.
//!
//! The source object is checked, fetched and decoded once. Every output spec then
//! gets its own task that resizes, encodes and uploads. All tasks are joined before
//! the pipeline returns; the first failure observed is reported and the remaining
//! tasks still run to completion. Derivatives already written by succeeding tasks
//! are left in place.

use crate::compression::ImageCompressor;
use crate::image::{ColorAwareResizer, ColorModel, ImageProcessor};
use crate::validator::SourceValidator;
use bytes::Bytes;
use image::DynamicImage;
use resizer_core::constants::{
    DEFAULT_JPEG_QUALITY, DEFAULT_KEY_SUFFIX, DEFAULT_MAX_OBJECT_SIZE_BYTES,
    DEFAULT_STORAGE_TIMEOUT, DERIVATIVE_CONTENT_TYPE,
};
use resizer_core::{
    Derivative, KeyTransform, NotificationRecord, OutputSpec, ResizeError, ResizeResult,
    ResizerConfig, SizeCatalog,
};
use resizer_storage::{CallTimeout, StorageGateway};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;

/// Settings that stay fixed for the lifetime of a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub catalog: SizeCatalog,
    pub keys: KeyTransform,
    pub key_suffix: String,
    pub max_object_size: u64,
    pub storage_timeout: Duration,
    pub jpeg_quality: u8,
}

impl From<&ResizerConfig> for PipelineSettings {
    fn from(config: &ResizerConfig) -> Self {
        Self {
            catalog: config.catalog.clone(),
            keys: config.key_transform(),
            key_suffix: config.key_suffix.clone(),
            max_object_size: config.max_object_size_bytes,
            storage_timeout: config.storage_timeout,
            jpeg_quality: config.jpeg_quality,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            catalog: SizeCatalog::default(),
            keys: KeyTransform::default(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
            max_object_size: DEFAULT_MAX_OBJECT_SIZE_BYTES,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

pub struct EventPipeline {
    gateway: StorageGateway,
    catalog: Arc<SizeCatalog>,
    keys: Arc<KeyTransform>,
    key_suffix: Arc<str>,
    validator: SourceValidator,
    storage_timeout: Duration,
    jpeg_quality: u8,
}

impl EventPipeline {
    pub fn new(gateway: StorageGateway, settings: PipelineSettings) -> Self {
        Self {
            gateway,
            catalog: Arc::new(settings.catalog),
            keys: Arc::new(settings.keys),
            key_suffix: Arc::from(settings.key_suffix),
            validator: SourceValidator::new(settings.max_object_size),
            storage_timeout: settings.storage_timeout,
            jpeg_quality: settings.jpeg_quality,
        }
    }

    pub fn catalog(&self) -> &SizeCatalog {
        &self.catalog
    }

    /// Process one notification. `deadline` is the deadline of the surrounding
    /// invocation, if any; no storage call is allowed to run past it.
    #[tracing::instrument(
        skip(self, record, deadline),
        fields(bucket = %record.bucket, key = %record.key)
    )]
    pub async fn handle(
        &self,
        record: &NotificationRecord,
        deadline: Option<Instant>,
    ) -> ResizeResult<Vec<Derivative>> {
        let started = std::time::Instant::now();
        let timeout = CallTimeout::new(self.storage_timeout).with_invocation_deadline(deadline);

        let metadata = self
            .gateway
            .head(&record.bucket, &record.key, timeout.next())
            .await?;

        if let Err(err) = self.validator.validate_size(&metadata) {
            tracing::warn!(
                size_bytes = metadata.content_length,
                limit_bytes = self.validator.max_object_size(),
                "Source object exceeds the size limit"
            );
            return Err(err);
        }

        let body = self
            .gateway
            .get(&record.bucket, &record.key, timeout.next())
            .await?;

        let probe = ImageProcessor::probe(&body)?;
        tracing::debug!(
            width = probe.width,
            height = probe.height,
            color_model = ?probe.color_model,
            size_bytes = body.len(),
            "Source image probed"
        );

        let image = Arc::new(decode(body, probe.color_model).await?);

        let mut tasks = JoinSet::new();
        for (index, spec) in self.catalog.iter().enumerate() {
            let task = ResizeTask {
                index,
                spec: spec.clone(),
                bucket: record.bucket.clone(),
                source_key: record.key.clone(),
                image: Arc::clone(&image),
                color_model: probe.color_model,
                gateway: self.gateway.clone(),
                keys: Arc::clone(&self.keys),
                key_suffix: Arc::clone(&self.key_suffix),
                jpeg_quality: self.jpeg_quality,
                timeout,
            };
            let span = tracing::info_span!("resize_task", derivative = %spec.name);
            tasks.spawn(task.run().instrument(span));
        }

        let mut derivatives = Vec::with_capacity(self.catalog.len());
        let mut first_error: Option<ResizeError> = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.unwrap_or_else(|e| {
                Err(ResizeError::Internal(format!("resize task failed: {}", e)))
            });
            match outcome {
                Ok(done) => derivatives.push(done),
                Err(err) => {
                    tracing::warn!(error = %err, "Resize task failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_error {
            tracing::error!(
                error = %err,
                written = derivatives.len(),
                expected = self.catalog.len(),
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Notification failed"
            );
            return Err(err);
        }

        derivatives.sort_by_key(|(index, _)| *index);
        let derivatives: Vec<Derivative> = derivatives.into_iter().map(|(_, d)| d).collect();

        tracing::info!(
            derivatives = derivatives.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Notification processed"
        );

        Ok(derivatives)
    }

    /// Process records in order. The first failing record aborts the batch and
    /// later records are not attempted.
    pub async fn process_batch(
        &self,
        records: &[NotificationRecord],
        deadline: Option<Instant>,
    ) -> ResizeResult<Vec<Derivative>> {
        let mut derivatives = Vec::with_capacity(records.len() * self.catalog.len());
        for record in records {
            derivatives.extend(self.handle(record, deadline).await?);
        }
        Ok(derivatives)
    }
}

/// Decode the source and convert it once into the layout its color path resizes in.
async fn decode(body: Bytes, color_model: ColorModel) -> ResizeResult<DynamicImage> {
    let decoded = tokio::task::spawn_blocking(move || {
        ImageProcessor::decode(&body).map(|image| ColorAwareResizer::prepare(image, color_model))
    })
    .await
    .map_err(|e| ResizeError::Internal(format!("decode task failed: {}", e)))?;

    decoded.inspect_err(|err| tracing::warn!(error = %err, "Source image could not be decoded"))
}

/// Everything one output spec needs, owned so the task can run on its own.
struct ResizeTask {
    index: usize,
    spec: OutputSpec,
    bucket: String,
    source_key: String,
    image: Arc<DynamicImage>,
    color_model: ColorModel,
    gateway: StorageGateway,
    keys: Arc<KeyTransform>,
    key_suffix: Arc<str>,
    jpeg_quality: u8,
    timeout: CallTimeout,
}

impl ResizeTask {
    async fn run(self) -> ResizeResult<(usize, Derivative)> {
        let started = std::time::Instant::now();
        let OutputSpec {
            name,
            width,
            height,
        } = self.spec;

        let image = self.image;
        let color_model = self.color_model;
        let quality = self.jpeg_quality;
        let encoded = tokio::task::spawn_blocking(move || {
            let resized = ColorAwareResizer::resize(&image, width, height, color_model);
            ImageCompressor::compress_jpeg(&resized, quality)
        })
        .await
        .map_err(|e| ResizeError::Internal(format!("resize of {} failed: {}", name, e)))??;

        let key = self
            .keys
            .derive_key(&self.source_key, &name, &self.key_suffix)?;
        let size_bytes = encoded.len() as u64;

        self.gateway
            .put(
                &self.bucket,
                &key,
                encoded,
                DERIVATIVE_CONTENT_TYPE,
                self.timeout.next(),
            )
            .await?;

        tracing::info!(
            derivative_key = %key,
            width = width,
            height = height,
            size_bytes = size_bytes,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Derivative written"
        );

        Ok((
            self.index,
            Derivative {
                name,
                key,
                width,
                height,
                size_bytes,
            },
        ))
    }
}
