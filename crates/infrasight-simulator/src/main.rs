mod generator;

use anyhow::{anyhow, bail, Context, Result};
use generator::{Sample, Scenario};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::env;
use tokio::time::{sleep, Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Config {
    server: String,
    scenario: Scenario,
    count: usize,
    pause_ms: u64,
    seed: Option<u64>,
    dry_run: bool,
    requester: Option<String>,
    requester_header: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "127.0.0.1:8080".to_string(),
            scenario: Scenario::Baseline,
            count: 137,
            pause_ms: 200,
            seed: None,
            dry_run: false,
            requester: None,
            requester_header: "x-requester".to_string(),
        }
    }
}

enum CliAction {
    Run(Config),
    Help,
    ListScenarios,
}

fn usage() {
    println!(
        "Usage:\n  infrasight-simulator [options]\n\nOptions:\n  --server <host:port|url>      server address (default: 127.0.0.1:8080)\n  --scenario <name>             all|baseline|heat|humid|vibration|overload (default: baseline)\n  --count <n>                   samples per scenario (default: 137)\n  --pause-ms <n>                pause between samples (default: 200)\n  --seed <n>                    seed the generator for repeatable runs\n  --dry-run                     print samples as JSON lines, send nothing\n  --requester <id>              run predictive maintenance as <id> afterwards\n  --requester-header <name>     identity header name (default: x-requester)\n  --list-scenarios              print supported scenarios\n  -h, --help                    show this help"
    );
}

fn parse_args<I>(args: I) -> Result<CliAction>
where
    I: IntoIterator<Item = String>,
{
    let mut config = Config::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "--list-scenarios" => return Ok(CliAction::ListScenarios),
            "--server" => config.server = next_value(&mut args, "--server")?,
            "--scenario" => {
                let value = next_value(&mut args, "--scenario")?;
                config.scenario = Scenario::parse(&value)?;
            }
            "--count" => {
                let value = next_value(&mut args, "--count")?;
                config.count = parse_positive_usize(&value, "--count")?;
            }
            "--pause-ms" => {
                let value = next_value(&mut args, "--pause-ms")?;
                config.pause_ms = parse_u64(&value, "--pause-ms")?;
            }
            "--seed" => {
                let value = next_value(&mut args, "--seed")?;
                config.seed = Some(parse_u64(&value, "--seed")?);
            }
            "--dry-run" => config.dry_run = true,
            "--requester" => config.requester = Some(next_value(&mut args, "--requester")?),
            "--requester-header" => {
                config.requester_header = next_value(&mut args, "--requester-header")?;
            }
            _ => bail!("unknown argument: {arg}"),
        }
    }

    Ok(CliAction::Run(config))
}

fn next_value<I>(args: &mut I, flag: &str) -> Result<String>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn parse_positive_usize(value: &str, flag: &str) -> Result<usize> {
    let parsed = value
        .parse::<usize>()
        .with_context(|| format!("invalid number for {flag}: {value}"))?;
    if parsed == 0 {
        bail!("{flag} must be greater than 0");
    }
    Ok(parsed)
}

fn parse_u64(value: &str, flag: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("invalid number for {flag}: {value}"))
}

fn normalize_server(server: &str) -> String {
    let base = if server.contains("://") {
        server.to_string()
    } else {
        format!("http://{server}")
    };
    base.trim_end_matches('/').to_string()
}

async fn post_once(client: &reqwest::Client, url: &str, body: &Value) -> reqwest::Result<reqwest::Response> {
    client.post(url).json(body).send().await
}

/// Posts `body`, retrying once when the server could not be reached.
async fn post_with_retry(client: &reqwest::Client, url: &str, body: Value) -> Result<()> {
    let response = match post_once(client, url, &body).await {
        Ok(response) => response,
        Err(e) if e.is_connect() || e.is_timeout() => post_once(client, url, &body)
            .await
            .map_err(|e| anyhow!("POST {url} failed after retry: {e}"))?,
        Err(e) => return Err(anyhow!("POST {url} failed: {e}")),
    };

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("POST {url} returned {status}: {text}");
    }
    Ok(())
}

async fn send_sample(client: &reqwest::Client, base: &str, sample: &Sample) -> Result<()> {
    post_with_retry(
        client,
        &format!("{base}/v1/readings/climate"),
        serde_json::to_value(&sample.climate)?,
    )
    .await?;
    post_with_retry(
        client,
        &format!("{base}/v1/readings/motion"),
        serde_json::to_value(&sample.motion)?,
    )
    .await
}

async fn run_pipeline(client: &reqwest::Client, base: &str, config: &Config, requester: &str) -> Result<()> {
    let url = format!("{base}/v1/predictive-maintenance");
    let response = client
        .get(&url)
        .header(config.requester_header.as_str(), requester)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;
    let status = response.status();
    let body: Value = response.json().await.context("invalid response body")?;
    if !status.is_success() {
        bail!("GET {url} returned {status}: {}", body["err_msg"]);
    }

    let data = &body["data"];
    tracing::info!(
        temperature = %data["temperaturePrediction"],
        humidity = %data["humidityPrediction"],
        acceleration = %data["accelerationPrediction"],
        pressure = %data["pressurePrediction"],
        alerts = %data["alerts"],
        record_id = %data["recordId"],
        "Predictive maintenance completed"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("infrasight=info")),
        )
        .init();

    match parse_args(env::args().skip(1))? {
        CliAction::Help => {
            usage();
            Ok(())
        }
        CliAction::ListScenarios => {
            println!("{}", Scenario::names().join("\n"));
            Ok(())
        }
        CliAction::Run(config) => run(config).await,
    }
}

async fn run(config: Config) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let samples = generator::generate(&mut rng, config.scenario, config.count);

    if config.dry_run {
        for sample in &samples {
            println!(
                "{}",
                json!({
                    "scenario": sample.scenario.as_str(),
                    "step": sample.step,
                    "climate": sample.climate,
                    "motion": sample.motion,
                })
            );
        }
        return Ok(());
    }

    let base = normalize_server(&config.server);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    tracing::info!(
        scenario = config.scenario.as_str(),
        samples = samples.len(),
        server = %base,
        "Sending readings"
    );

    let mut sent = 0usize;
    let mut failed = 0usize;
    for sample in &samples {
        match send_sample(&client, &base, sample).await {
            Ok(()) => {
                sent += 1;
                tracing::debug!(scenario = sample.scenario.as_str(), step = sample.step, "Sample sent");
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    scenario = sample.scenario.as_str(),
                    step = sample.step,
                    error = %format!("{e:#}"),
                    "Sample failed"
                );
            }
        }

        if config.pause_ms > 0 {
            sleep(Duration::from_millis(config.pause_ms)).await;
        }
    }

    tracing::info!(sent, failed, "Done sending readings");

    if let Some(requester) = config.requester.as_deref() {
        run_pipeline(&client, &base, &config, requester).await?;
    }

    if failed > 0 {
        bail!("{failed} sample(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliAction> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_apply_without_flags() {
        let CliAction::Run(config) = parse(&[]).unwrap() else {
            panic!("expected run action");
        };
        assert_eq!(config.server, "127.0.0.1:8080");
        assert_eq!(config.scenario, Scenario::Baseline);
        assert_eq!(config.count, 137);
        assert!(!config.dry_run);
        assert!(config.seed.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let CliAction::Run(config) = parse(&[
            "--server",
            "http://sensors.local:9000/",
            "--scenario",
            "humid",
            "--count",
            "12",
            "--pause-ms",
            "0",
            "--seed",
            "7",
            "--dry-run",
            "--requester",
            "ops@example.com",
        ])
        .unwrap() else {
            panic!("expected run action");
        };
        assert_eq!(normalize_server(&config.server), "http://sensors.local:9000");
        assert_eq!(config.scenario, Scenario::Humid);
        assert_eq!(config.count, 12);
        assert_eq!(config.pause_ms, 0);
        assert_eq!(config.seed, Some(7));
        assert!(config.dry_run);
        assert_eq!(config.requester.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["--count", "0"]).is_err());
        assert!(parse(&["--count"]).is_err());
        assert!(parse(&["--scenario", "storm"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(matches!(parse(&["-h"]).unwrap(), CliAction::Help));
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(normalize_server("127.0.0.1:8080"), "http://127.0.0.1:8080");
    }
}
