use anyhow::{Context, Result};
use clap::Parser;
use resizer_core::NotificationRecord;
use resizer_infra::{init_telemetry, report_error};
use resizer_lambda::{build_pipeline, load_config};

/// Run the resize pipeline once for a stored object, using the configured backend.
#[derive(Parser, Debug)]
#[command(name = "resize_object")]
#[command(about = "Produce every configured derivative of one source image")]
struct Args {
    /// Bucket holding the source object
    #[arg(long, env = "RESIZE_BUCKET")]
    bucket: String,

    /// Source object key, e.g. original/100/fashion/abcdef.jpg
    #[arg(long)]
    key: String,

    /// Print the derivatives as JSON instead of one key per line
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config().context("Failed to load configuration")?;
    init_telemetry(
        env!("CARGO_BIN_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.log_format,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let pipeline = build_pipeline(&config)
        .await
        .context("Failed to build the pipeline")?;
    let record = NotificationRecord::new(args.bucket, args.key);

    let derivatives = match pipeline.handle(&record, None).await {
        Ok(derivatives) => derivatives,
        Err(err) => {
            report_error(&err);
            return Err(err)
                .with_context(|| format!("Failed to resize {}/{}", record.bucket, record.key));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&derivatives)?);
    } else {
        for derivative in &derivatives {
            println!(
                "{}\t{}x{}\t{} bytes",
                derivative.key, derivative.width, derivative.height, derivative.size_bytes
            );
        }
    }

    Ok(())
}
