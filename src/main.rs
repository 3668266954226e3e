mod batch;
mod config;
mod confirm;
mod error;
mod extractor;
mod sink;
mod source;
mod transmit;

use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};

use config::Config;
use transmit::{Outcome, TransmissionResult};

const USER_AGENT: &str = concat!("feedsplit/", env!("CARGO_PKG_VERSION"));
/// Floor for request/response time; feed batches can be large.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(name = "feedsplit", about = "Split a listings feed into batches and submit them")]
struct Cli {
    /// Feed source: local file path or URL
    #[arg(env = "FEED_SOURCE")]
    source: String,

    /// Endpoint that receives each confirmed batch
    #[arg(long, env = "FEED_ENDPOINT")]
    endpoint: String,

    /// Bearer token for the endpoint
    #[arg(long, env = "FEED_TOKEN")]
    token: Option<String>,

    /// Records per batch
    #[arg(long, env = "FEED_BATCH_SIZE", default_value_t = 130)]
    batch_size: usize,

    /// Processing-size hint forwarded to the endpoint
    #[arg(long, env = "FEED_CHUNK_SIZE")]
    chunk_size: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = Config::new(cli.source, cli.endpoint, cli.token, cli.batch_size, cli.chunk_size);

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let results = run(&client, &config, |batch, total| {
        confirm::ask(batch, total, &config.endpoint)
    })
    .await?;
    print_summary(&results);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

/// One full run: load → extract → partition, then per batch
/// persist → confirm → (transmit | skip). The confirmation gate is passed in
/// so the loop can be driven without a console.
async fn run(
    client: &reqwest::Client,
    config: &Config,
    mut gate: impl FnMut(&batch::Batch, usize) -> std::io::Result<bool>,
) -> anyhow::Result<Vec<TransmissionResult>> {
    let raw = source::load(client, &config.source).await?;
    let (records, wrapper) = extractor::extract(&raw)?;
    info!("Extracted {} records", records.len());

    let batches = batch::partition(&records, &wrapper, config.batch_size)?;
    let total = batches.total();
    println!(
        "{} records -> {} batches of up to {}",
        records.len(),
        total,
        config.batch_size
    );

    let mut results = Vec::with_capacity(total);
    for batch in batches {
        // Persist first so every offered batch already exists on disk.
        let path = sink::write_batch(&config.out_dir, &batch)?;
        info!("Wrote {}", path.display());

        if !gate(&batch, total)? {
            println!("Batch {} skipped.", batch.index);
            results.push(TransmissionResult {
                batch_index: batch.index,
                outcome: Outcome::Skipped,
            });
            continue;
        }

        let outcome = match transmit::send(client, config, &batch).await {
            Ok(body) => {
                println!("Batch {} accepted. Response:\n{}", batch.index, body);
                Outcome::Sent(body)
            }
            Err(e) => {
                warn!("{}", e);
                println!("Batch {} failed: {}. Continuing.", batch.index, e);
                Outcome::Failed(e.to_string())
            }
        };
        results.push(TransmissionResult {
            batch_index: batch.index,
            outcome,
        });
    }

    Ok(results)
}

fn print_summary(results: &[TransmissionResult]) {
    let sent = results.iter().filter(|r| matches!(r.outcome, Outcome::Sent(_))).count();
    let skipped = results.iter().filter(|r| matches!(r.outcome, Outcome::Skipped)).count();
    let failed: Vec<usize> = results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
        .map(|r| r.batch_index)
        .collect();

    println!(
        "\nDone: {} batches ({} sent, {} skipped, {} failed).",
        results.len(),
        sent,
        skipped,
        failed.len()
    );
    if !failed.is_empty() {
        let list: Vec<String> = failed.iter().map(|i| i.to_string()).collect();
        println!("Failed batches: {}", list.join(", "));
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offline pipeline: extract → partition → persist, no prompt or network.
    #[test]
    fn extract_partition_persist() {
        let doc: String = format!(
            "<Listings ver=\"2\">{}</Listings>",
            (0..7)
                .map(|i| format!("<Listing><Id>{i}</Id></Listing>"))
                .collect::<String>()
        );

        let (records, wrapper) = extractor::extract(&doc).unwrap();
        assert_eq!(records.len(), 7);

        let dir = tempfile::tempdir().unwrap();
        let batches = batch::partition(&records, &wrapper, 3).unwrap();
        assert_eq!(batches.total(), 3);

        let mut seen = Vec::new();
        for b in batches {
            let path = sink::write_batch(dir.path(), &b).unwrap();
            let written = std::fs::read_to_string(path).unwrap();
            assert!(written.starts_with("<Listings ver=\"2\">"));
            assert!(written.ends_with("</Listings>"));
            seen.extend(b.records);
        }
        // Nothing lost, duplicated, or reordered across the run.
        assert_eq!(seen, records);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    /// Declined and failed batches are recorded and never stop the run:
    /// batch 1 is declined at the gate, the rest are accepted and fail
    /// against an unreachable endpoint, and every batch is still offered.
    #[tokio::test]
    async fn declined_and_failed_batches_do_not_stop_the_run() {
        use std::io::Write;

        let doc = format!(
            "<Listings>{}</Listings>",
            (0..5)
                .map(|i| format!("<Listing>{i}</Listing>"))
                .collect::<String>()
        );
        let mut feed = tempfile::NamedTempFile::new().unwrap();
        write!(feed, "{doc}").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            source: feed.path().display().to_string(),
            endpoint: "http://127.0.0.1:1/import".into(),
            token: None,
            batch_size: 2,
            chunk_size: None,
            out_dir: dir.path().to_path_buf(),
        };
        let client = reqwest::Client::new();

        let mut offered = Vec::new();
        let results = run(&client, &config, |batch, total| {
            offered.push((batch.index, total));
            Ok(batch.index != 1)
        })
        .await
        .unwrap();

        // Every batch reached the gate, including those after a failure.
        assert_eq!(offered, vec![(1, 3), (2, 3), (3, 3)]);

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0].outcome, Outcome::Skipped));
        assert!(matches!(results[1].outcome, Outcome::Failed(_)));
        assert!(matches!(results[2].outcome, Outcome::Failed(_)));

        // All batch files were persisted regardless of outcome.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn durations_format_by_magnitude() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
