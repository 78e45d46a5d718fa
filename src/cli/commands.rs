// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command implementations behind the clap definitions.

use super::display;
use super::BackendArgs;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ragbench::eval::{
    self, http_client, Backend, CancelFlag, Progress, QuerySpec, SearchBackend,
};
use ragbench::{rank, Corpus, EvalConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// Resolve config file, environment and flags into one validated config.
fn load_config(args: &BackendArgs) -> Result<EvalConfig> {
    let mut config = EvalConfig::resolve(args.config.as_deref()).with_context(|| {
        match &args.config {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Failed to resolve default config".to_string(),
        }
    })?;

    if let Some(url) = &args.baseline_url {
        if !config.baseline.set_url(url.clone()) {
            bail!("--baseline-url given but the baseline backend is local");
        }
    }
    if let Some(url) = &args.candidate_url {
        if !config.candidate.set_url(url.clone()) {
            bail!("--candidate-url given but the candidate backend is local");
        }
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }

    config.validate()?;
    Ok(config)
}

fn build_backends(config: &EvalConfig) -> Result<(Backend, Backend)> {
    let client = http_client()?;
    let baseline =
        Backend::from_spec(&config.baseline, &client).context("Failed to set up baseline")?;
    let candidate =
        Backend::from_spec(&config.candidate, &client).context("Failed to set up candidate")?;
    tracing::debug!(
        baseline = baseline.name(),
        candidate = candidate.name(),
        "backends ready"
    );
    Ok((baseline, candidate))
}

pub fn run_rank(query: &str, corpus_path: &Path, limit: usize, json: bool) -> Result<()> {
    let corpus = Corpus::from_path(corpus_path)
        .with_context(|| format!("Failed to load corpus {}", corpus_path.display()))?;
    let results = rank(query, &corpus, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        display::print_rank_results(query, &results);
    }
    Ok(())
}

pub async fn run_compare(
    query: &str,
    keywords: &[String],
    args: &BackendArgs,
    json: bool,
) -> Result<()> {
    let config = load_config(args)?;
    let (baseline, candidate) = build_backends(&config)?;

    let spec = QuerySpec::new(query, keywords.iter().cloned());
    let oracle = spec.validate()?;
    let record =
        eval::run_comparison(&spec, &oracle, &baseline, &candidate, &config.options()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        display::print_comparison(&record);
    }
    Ok(())
}

pub async fn run_evaluate(
    args: &BackendArgs,
    queries: Option<&Path>,
    output: Option<PathBuf>,
    wait: bool,
) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(path) = queries {
        config
            .load_queries(path)
            .with_context(|| format!("Failed to load queries {}", path.display()))?;
    }
    if let Some(path) = output {
        config.output = path;
    }

    let (baseline, candidate) = build_backends(&config)?;
    if wait {
        probe_backends(&config, &[&baseline, &candidate], None).await?;
    }

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("⚠️  Interrupted: finishing the current query, then reporting");
                cancel.cancel();
            }
        });
    }

    let pb = ProgressBar::new(config.queries.len() as u64);
    pb.set_style(create_progress_style());
    pb.set_prefix("Evaluating");
    pb.enable_steady_tick(Duration::from_millis(120));

    let report = eval::evaluate_with(
        &config.queries,
        &baseline,
        &candidate,
        &config.options(),
        &cancel,
        |event| match event {
            Progress::Started { query, .. } => pb.set_message(display::clip(query, 40)),
            Progress::Completed { record, .. } => {
                pb.suspend(|| display::print_comparison(record));
                pb.inc(1);
            }
            Progress::Skipped { query, reason, .. } => {
                pb.suspend(|| eprintln!("⚠️  Skipping {:?}: {}", query, reason));
                pb.inc(1);
            }
        },
    )
    .await;
    pb.finish_and_clear();

    let report = report.context("Evaluation produced no report")?;
    display::print_report(&report);

    report
        .save(&config.output)
        .with_context(|| format!("Failed to write report {}", config.output.display()))?;
    println!("✅ Report written to {}", config.output.display());
    Ok(())
}

pub async fn run_wait(args: &BackendArgs, attempts: Option<u32>) -> Result<()> {
    let config = load_config(args)?;
    let (baseline, candidate) = build_backends(&config)?;
    probe_backends(&config, &[&baseline, &candidate], attempts).await?;
    println!("✅ All backends ready");
    Ok(())
}

async fn probe_backends(
    config: &EvalConfig,
    backends: &[&Backend],
    attempts: Option<u32>,
) -> Result<()> {
    let client = http_client()?;
    let attempts = attempts.unwrap_or(config.probe.attempts);
    let interval = Duration::from_secs(config.probe.interval_secs);

    for target in backends.iter().flat_map(|b| b.probe_targets()) {
        eval::wait_for_target(&client, target, attempts, interval).await?;
        println!("✅ {} is ready", target.url);
    }
    Ok(())
}
