//! Request command implementation.

use anyhow::{Context as _, Result, bail};
use clap::Args;
use colored::Colorize;
use tokio::sync::broadcast::error::TryRecvError;

use authwire_client::{RequestOptions, SessionEvent};
use authwire_core::{Body, Method};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Extra header as NAME:VALUE (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(long = "query", short = 'q')]
    pub query: Vec<String>,

    /// Send this many identical requests concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}

pub async fn run(args: RequestArgs, context: &Context) -> Result<()> {
    let method: Method = args.method.parse().context("Invalid method")?;
    let options = options(&args)?;
    let client = context.client()?;
    let mut events = client.subscribe();

    let calls = (0..args.concurrency).map(|_| {
        let client = client.clone();
        let options = options.clone();
        let path = args.path.clone();
        async move { client.request(method, &path, options).await }
    });
    let results = futures_util::future::join_all(calls).await;

    let mut failures = 0;
    for (i, result) in results.iter().enumerate() {
        if args.concurrency > 1 {
            eprintln!("{}", format!("--- request {} ---", i + 1).dimmed());
        }
        match result {
            Ok(response) => {
                output::field("Status", &response.status.to_string());
                output::body(response);
            }
            Err(e) => {
                failures += 1;
                output::error(&e.to_string());
                if let Some(status) = e.status() {
                    output::field("Status", &status.to_string());
                }
            }
        }
    }

    loop {
        match events.try_recv() {
            Ok(SessionEvent::LoggedOut) => {
                output::warning("Session ended; log in again to continue");
            }
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    if failures > 0 {
        bail!("{} of {} requests failed", failures, results.len());
    }
    Ok(())
}

fn options(args: &RequestArgs) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();

    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Header '{header}' is not NAME:VALUE"))?;
        options = options.header(name.trim(), value.trim());
    }

    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Query parameter '{pair}' is not KEY=VALUE"))?;
        options = options.query(key, value);
    }

    if let Some(data) = &args.data {
        let value: serde_json::Value =
            serde_json::from_str(data).context("--data is not valid JSON")?;
        options = options.body(Body::Json(value));
    }

    Ok(options)
}
