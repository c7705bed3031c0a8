// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use the_conveyor::backends::local::{ResultPrinter, Sha256Signer};
use the_conveyor::config::{load_and_validate_config, validate_config, Config, RuntimeBuilder};
use the_conveyor::engine::Item;
use the_conveyor::traits::DigestProvider;

const USAGE: &str = "Usage: the-conveyor [config.yaml|config.toml|config.json] [--no-dedup] [--json]";

/// Command-line options
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    no_dedup: bool,
    json: bool,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut parsed = Args::default();
        for arg in args {
            match arg.as_str() {
                "--no-dedup" => parsed.no_dedup = true,
                "--json" => parsed.json = true,
                "-h" | "--help" => return Ok(None),
                flag if flag.starts_with('-') => anyhow::bail!("unknown option '{}'\n{}", flag, USAGE),
                path => {
                    if parsed.config.is_some() {
                        anyhow::bail!("only one config file may be given\n{}", USAGE);
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }
        Ok(Some(parsed))
    }
}

/// Machine-readable summary printed with `--json`
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    config: Option<String>,
    stages: Vec<&'static str>,
    deduplicate: bool,
    input: &'a [i64],
    output: Vec<String>,
    elapsed_ms: u128,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only results (respects RUST_LOG)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let Some(args) = Args::parse(env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    };

    let mut config = match &args.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => {
            let config = Config::default();
            validate_config(&config)?;
            config
        }
    };
    if args.no_dedup {
        config.deduplicate = false;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(execute(&args, &config))?;
    Ok(ExitCode::SUCCESS)
}

async fn execute(args: &Args, config: &Config) -> Result<()> {
    let signer: Arc<dyn DigestProvider> = Arc::new(Sha256Signer::from_config(&config.signer));
    let config_name = args.config.as_ref().map(|path| path.display().to_string());

    if args.json {
        let executor = RuntimeBuilder::with_signer(config, signer)?;
        let start_time = Instant::now();
        let tail = executor.execute_collect().await?;

        let report = RunReport {
            config: config_name,
            stages: executor.stage_names(),
            deduplicate: config.deduplicate,
            input: &config.input,
            output: tail.iter().map(Item::to_string).collect(),
            elapsed_ms: start_time.elapsed().as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut stages = RuntimeBuilder::stages_from_config(config, signer)?;
    stages.push(Arc::new(ResultPrinter::new()));
    let executor = RuntimeBuilder::from_stages(config, stages)?;

    println!("Start pipeline...");
    println!("Config: {}", config_name.as_deref().unwrap_or("<built-in defaults>"));
    println!("Stages: {}", executor.stage_names().join(" -> "));
    println!("Deduplicate: {}", config.deduplicate);

    let start_time = Instant::now();
    executor.execute().await.context("Pipeline execution failed")?;
    println!("Execution time: {:?}", start_time.elapsed());

    Ok(())
}
