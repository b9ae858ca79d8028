//! Load generator for a running sale.
//!
//! Fires `--requests` purchase attempts at one product, at most `--concurrency` at a
//! time, one distinct user each, and writes a JSON and a Markdown report.

use actor_framework::tracing::setup_tracing;
use anyhow::Context;
use clap::Parser;
use flash_sale::http::dto::FlashSaleResponse;
use flash_sale::model::Outcome;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "stress", about = "Burst of purchase attempts against a flash sale server")]
struct Args {
    /// Base URL of the server.
    #[arg(long, env = "FLASHSALE_HOST", default_value = "http://127.0.0.1:8000")]
    host: String,

    #[arg(long)]
    product: u32,

    /// Sends the first attempt as this user; the rest use distinct ids from `--first-user`.
    #[arg(long)]
    my_user: Option<u64>,

    #[arg(long, default_value_t = 1)]
    first_user: u64,

    #[arg(long, default_value_t = 1000)]
    requests: usize,

    #[arg(long, default_value_t = 200)]
    concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, default_value = "report.json")]
    json: PathBuf,

    #[arg(long, default_value = "report.md")]
    markdown: PathBuf,
}

impl Args {
    fn users(&self) -> Vec<u64> {
        let mut users = Vec::with_capacity(self.requests);
        users.extend(self.my_user);
        let mut next = self.first_user;
        while users.len() < self.requests {
            if Some(next) != self.my_user {
                users.push(next);
            }
            next += 1;
        }
        users.truncate(self.requests);
        users
    }
}

/// One finished request. `http_status` is `None` when no response arrived.
#[derive(Debug, Clone)]
struct Sample {
    http_status: Option<u16>,
    outcome: Option<Outcome>,
    latency: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Report {
    product: u32,
    total_requests: usize,
    concurrency: usize,
    elapsed_s: f64,
    qps: f64,
    success_count: usize,
    fail_count: usize,
    transport_errors: usize,
    outcomes: BTreeMap<String, usize>,
    avg_latency_s: f64,
    p50_latency_s: f64,
    p90_latency_s: f64,
    p99_latency_s: f64,
}

impl Report {
    fn new(product: u32, concurrency: usize, elapsed: Duration, samples: &[Sample]) -> Self {
        let mut latencies: Vec<Duration> = samples.iter().map(|s| s.latency).collect();
        latencies.sort_unstable();

        let mut outcomes = BTreeMap::new();
        for outcome in samples.iter().filter_map(|s| s.outcome) {
            *outcomes.entry(outcome.as_str().to_string()).or_insert(0) += 1;
        }

        let total = samples.len();
        let success = samples
            .iter()
            .filter(|s| s.outcome.is_some_and(Outcome::is_granted))
            .count();
        let transport_errors = samples.iter().filter(|s| s.http_status.is_none()).count();
        let avg = if total == 0 {
            Duration::ZERO
        } else {
            latencies.iter().sum::<Duration>() / total as u32
        };
        let qps = if elapsed.is_zero() {
            0.0
        } else {
            total as f64 / elapsed.as_secs_f64()
        };

        Self {
            product,
            total_requests: total,
            concurrency,
            elapsed_s: round(elapsed.as_secs_f64(), 3),
            qps: round(qps, 2),
            success_count: success,
            fail_count: total - success,
            transport_errors,
            outcomes,
            avg_latency_s: round(avg.as_secs_f64(), 4),
            p50_latency_s: round(percentile(&latencies, 50.0).as_secs_f64(), 4),
            p90_latency_s: round(percentile(&latencies, 90.0).as_secs_f64(), 4),
            p99_latency_s: round(percentile(&latencies, 99.0).as_secs_f64(), 4),
        }
    }

    fn to_markdown(&self) -> String {
        let mut out = String::from("# Flash sale load report\n\n| Metric | Value |\n|---|---|\n");
        let rows: [(&str, String); 12] = [
            ("Product", self.product.to_string()),
            ("Total requests", self.total_requests.to_string()),
            ("Concurrency", self.concurrency.to_string()),
            ("Elapsed (s)", self.elapsed_s.to_string()),
            ("QPS", self.qps.to_string()),
            ("Success", self.success_count.to_string()),
            ("Failed", self.fail_count.to_string()),
            ("Transport errors", self.transport_errors.to_string()),
            ("Avg latency (s)", self.avg_latency_s.to_string()),
            ("p50 latency (s)", self.p50_latency_s.to_string()),
            ("p90 latency (s)", self.p90_latency_s.to_string()),
            ("p99 latency (s)", self.p99_latency_s.to_string()),
        ];
        for (metric, value) in rows {
            let _ = writeln!(out, "| {metric} | {value} |");
        }
        if !self.outcomes.is_empty() {
            out.push_str("\n| Outcome | Count |\n|---|---|\n");
            for (outcome, count) in &self.outcomes {
                let _ = writeln!(out, "| {outcome} | {count} |");
            }
        }
        out
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn round(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

async fn send_one(client: &reqwest::Client, url: String) -> Sample {
    let started = Instant::now();
    match client.post(&url).send().await {
        Ok(response) => {
            let http_status = response.status().as_u16();
            let outcome = response
                .json::<FlashSaleResponse>()
                .await
                .ok()
                .and_then(|body| body.outcome);
            Sample {
                http_status: Some(http_status),
                outcome,
                latency: started.elapsed(),
            }
        }
        Err(e) => {
            warn!(%url, error = %e, "Request failed");
            Sample {
                http_status: None,
                outcome: None,
                latency: started.elapsed(),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let args = Args::parse();
    anyhow::ensure!(args.concurrency > 0, "concurrency must be at least 1");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .pool_max_idle_per_host(args.concurrency)
        .build()
        .context("building the HTTP client")?;
    let limit = Arc::new(Semaphore::new(args.concurrency.min(Semaphore::MAX_PERMITS)));
    let base = args.host.trim_end_matches('/').to_string();

    info!(
        host = %base,
        product = args.product,
        requests = args.requests,
        concurrency = args.concurrency,
        "Starting burst"
    );

    let started = Instant::now();
    let mut tasks = Vec::with_capacity(args.requests);
    for user in args.users() {
        let client = client.clone();
        let limit = Arc::clone(&limit);
        let url = format!("{base}/api/flashsale/{user}/{}", args.product);
        tasks.push(tokio::spawn(async move {
            let _slot = limit.acquire_owned().await.ok();
            send_one(&client, url).await
        }));
    }

    let mut samples = Vec::with_capacity(tasks.len());
    for task in tasks {
        samples.push(task.await.context("request task panicked")?);
    }
    let report = Report::new(args.product, args.concurrency, started.elapsed(), &samples);

    let json = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&args.json, json)
        .await
        .with_context(|| format!("writing {}", args.json.display()))?;
    tokio::fs::write(&args.markdown, report.to_markdown())
        .await
        .with_context(|| format!("writing {}", args.markdown.display()))?;

    info!(
        success = report.success_count,
        failed = report.fail_count,
        qps = report.qps,
        p99 = report.p99_latency_s,
        json = %args.json.display(),
        markdown = %args.markdown.display(),
        "Report written"
    );
    Ok(())
}
