//! Cookie Guard - command line entry point
//!
//! Reads a JSON array of raw cookies (file or `-` for stdin) and prints
//! the classification as JSON.
//!
//! ```text
//! cookie-guard <cookies.json|-> [--host HOST] [--model PATH] [--heuristic] [--quick] [--block]
//! ```

use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use cookie_guard_core::constants;
use cookie_guard_core::logic::cookie::normalize_value;
use cookie_guard_core::{
    CookieRecord, CookieScanner, HeuristicBackend, OnnxBackend, PredictiveAdapter, RiskConfig,
    ScanContext,
};

/// What the run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full scan result for the page
    Scan,
    /// Identities to remove, full scorer
    Block,
    /// Quick-scorer result
    QuickScan,
    /// Identities to remove, quick scorer
    QuickBlock,
}

struct Args {
    input: String,
    host: String,
    model: Option<String>,
    heuristic: bool,
    quick: bool,
    block: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        input: String::new(),
        host: String::new(),
        model: constants::get_model_path(),
        heuristic: false,
        quick: false,
        block: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--host" => args.host = iter.next().context("--host needs a value")?,
            "--model" => args.model = Some(iter.next().context("--model needs a value")?),
            "--heuristic" => args.heuristic = true,
            "--quick" => args.quick = true,
            "--block" => args.block = true,
            "-h" | "--help" => {
                println!(
                    "usage: cookie-guard <cookies.json|-> [--host HOST] [--model PATH] [--heuristic] [--quick] [--block]"
                );
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("unknown option: {}", other),
            other => args.input = other.to_string(),
        }
    }

    if args.input.is_empty() {
        bail!("missing cookie file (use - for stdin)");
    }
    Ok(args)
}

/// Without a page hostname the full scorer would call every cookie
/// third-party, so a missing `--host` always means the quick scorer.
fn select_mode(args: &Args) -> Mode {
    let quick = args.quick || args.host.is_empty();
    match (quick, args.block) {
        (true, true) => Mode::QuickBlock,
        (true, false) => Mode::QuickScan,
        (false, true) => Mode::Block,
        (false, false) => Mode::Scan,
    }
}

fn read_cookies(input: &str) -> Result<Vec<CookieRecord>> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input))?
    };

    let parsed: Value = serde_json::from_str(&content).context("cookie input is not JSON")?;
    let records = match parsed {
        Value::Array(items) => items.iter().map(normalize_value).collect(),
        single => vec![normalize_value(&single)],
    };
    Ok(records)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = Arc::new(RiskConfig::from_env());
    let cookies = read_cookies(&args.input)?;

    let adapter = match (&args.model, args.heuristic) {
        (Some(path), _) => PredictiveAdapter::new(Box::new(OnnxBackend::new(path)), config.clone()),
        (None, true) => PredictiveAdapter::new(Box::new(HeuristicBackend::new()), config.clone()),
        (None, false) => PredictiveAdapter::rule_based_only(config.clone()),
    };
    adapter.load().await;

    let scanner = CookieScanner::new(adapter);
    let ctx = ScanContext::new(&args.host);

    let mode = select_mode(&args);
    if args.host.is_empty() && !args.quick {
        log::info!("No --host given, using quick triage");
    }

    let output = match mode {
        Mode::QuickBlock => serde_json::to_value(scanner.quick_block(&cookies))?,
        Mode::QuickScan => serde_json::to_value(scanner.quick_scan(&cookies))?,
        Mode::Block => serde_json::to_value(scanner.block_malicious(&cookies, &ctx).await)?,
        Mode::Scan => serde_json::to_value(scanner.scan(&cookies, &ctx).await)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    log::info!("Engine status: {:?}", scanner.adapter().status());
    Ok(())
}
