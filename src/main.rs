use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use miniflux_export::api::MinifluxClient;
use miniflux_export::config::{output_path, validate_host, ExportConfig};
use miniflux_export::export;

#[derive(Parser, Debug)]
#[command(
    name = "miniflux-export",
    about = "Exports Miniflux subscriptions as OPML and starred entries as an RSS feed"
)]
struct Args {
    /// Destination for the OPML subscription export, e.g. /tmp/opml.xml
    #[arg(long, value_name = "FILE")]
    output_opml: Option<String>,

    /// Destination for the starred-entry RSS export, e.g. /tmp/bookmarks.xml
    #[arg(long, value_name = "FILE")]
    output_bookmarks: Option<String>,

    /// Miniflux username
    #[arg(long, default_value = "")]
    user: String,

    /// Miniflux password
    #[arg(long, default_value = "")]
    pass: String,

    /// Miniflux server address
    #[arg(long, default_value = "http://localhost:8080", value_name = "URL")]
    host: String,

    /// Miniflux API token; takes precedence over --user/--pass
    #[arg(long, value_name = "TOKEN")]
    api_key: Option<String>,

    /// Suppress non-error output
    #[arg(short = 's', long)]
    silent: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // --silent drops the happy-flow summary lines; RUST_LOG still overrides
    let default_filter = if args.silent { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = ExportConfig {
        opml_path: output_path(args.output_opml),
        bookmark_path: output_path(args.output_bookmarks),
        host: validate_host(&args.host)?,
        username: args.user,
        password: args.pass,
        api_key: args.api_key,
        silent: args.silent,
    };

    let client = MinifluxClient::new(
        &config.host,
        &config.username,
        &config.password,
        config.api_key.as_deref(),
    );

    let report = export::run(&config, &client).await;

    Ok(if report.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
