use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde_json::json;
use snow_core::action::Action;
use snow_core::config::EngineConfig;
use snow_core::engine::Controller;
use snow_core::judge::Judge;
use snow_core::judge_day;
use snow_core::weather::Forecast;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "snowstep",
    about = "Batch runner scoring the engine against a generated snowfall case"
)]
struct Args {
    /// Seed for the snowfall generator.
    #[arg(long, value_name = "NUMBER", conflicts_with = "seed_phrase")]
    seed: Option<u64>,

    /// Generate the case from a phrase instead of a numeric seed.
    #[arg(long = "seed-phrase", value_name = "TEXT", conflicts_with = "seed")]
    seed_phrase: Option<String>,

    /// Optional engine config JSON document.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after this many days instead of the full forecast.
    #[arg(long)]
    days: Option<usize>,

    /// Output NDJSON file path for per-day frames.
    #[arg(long)]
    out: PathBuf,

    /// Optional path to emit per-day run metrics as NDJSON.
    #[arg(long = "emit-metrics", value_name = "PATH")]
    emit_metrics: Option<PathBuf>,
}

struct DayCounts {
    hires: usize,
    moves: usize,
}

fn count_actions(actions: &[Action]) -> DayCounts {
    DayCounts {
        hires: actions.iter().filter(|action| action.is_hire()).count(),
        moves: actions.iter().filter(|action| action.is_move()).count(),
    }
}

fn load_forecast(args: &Args) -> Forecast {
    match &args.seed_phrase {
        Some(phrase) => Forecast::from_phrase(phrase),
        None => Forecast::generate(args.seed.unwrap_or(1)),
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("failed to read config {:?}", path)),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let forecast = load_forecast(&args);
    let config = load_config(&args)?;
    let params = forecast.params;
    info!(
        board_size = params.board_size,
        salary = params.salary,
        fine = params.fine,
        "generated case"
    );

    let frame_file =
        File::create(&args.out).with_context(|| format!("failed to create {:?}", args.out))?;
    let mut frame_writer = BufWriter::new(frame_file);

    let mut metrics_writer = if let Some(path) = &args.emit_metrics {
        let file = File::create(path)
            .with_context(|| format!("failed to create metrics file at {:?}", path))?;
        Some(BufWriter::new(file))
    } else {
        None
    };

    let mut controller = Controller::new(params, config);
    let mut judge = Judge::new(params);

    let days = args
        .days
        .unwrap_or(forecast.days())
        .min(forecast.days());
    for (day, snowfall) in forecast.snowfall.iter().take(days).enumerate() {
        let last = day + 1 == days;
        let report = judge_day(&mut controller, &mut judge, snowfall, last)
            .with_context(|| format!("judge rejected day {}", day))?;
        controller.world().check_invariants()?;
        ensure!(
            controller.world().workers() == judge.workers(),
            "engine and judge disagree on worker positions after day {}",
            day
        );

        if let Some(writer) = metrics_writer.as_mut() {
            let counts = count_actions(&report.actions);
            let metrics_line = json!({
                "t": report.day,
                "workers": judge.workers().len(),
                "snow": judge.uncleared(),
                "actions": report.actions.len(),
                "hires": counts.hires,
                "moves": counts.moves,
                "score": judge.score(),
            });
            let serialized = serde_json::to_string(&metrics_line)?;
            writer.write_all(serialized.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        let line = report.frame.to_ndjson()?;
        frame_writer.write_all(line.as_bytes())?;
    }

    frame_writer.flush()?;
    if let Some(writer) = metrics_writer.as_mut() {
        writer.flush()?;
    }

    let totals = judge.totals();
    println!("Fine   = {}", totals.fine);
    println!("Salary = {}", totals.salary);
    println!("Score  = {}", totals.score());

    Ok(())
}
