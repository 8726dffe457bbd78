//! Serverless handler: one invocation per S3 notification batch.
//!
//! Configuration, logging and the storage client are set up once at cold start
//! and shared by every invocation of the process.

use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use resizer_infra::init_telemetry;
use resizer_lambda::{build_pipeline, handle_event, load_config};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = load_config()?;
    init_telemetry(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.log_format,
    )?;

    tracing::info!(
        environment = %config.environment,
        region = %config.s3_region,
        "Starting resizer handler"
    );

    let pipeline = build_pipeline(&config).await?;

    run(service_fn(|event: LambdaEvent<S3Event>| {
        handle_event(&pipeline, event)
    }))
    .await
}
