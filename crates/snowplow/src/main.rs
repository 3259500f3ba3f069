use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snow_core::config::{EngineConfig, ScanOrder};
use snow_core::engine::Controller;
use snow_core::hiring::Throttle;
use snow_core::io::protocol::{write_day, TokenReader};
use snow_core::search::SearchStrategy;
use snow_core::weather::SIMULATION_DAYS;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SearchKind {
    Adjacent,
    Diamond,
    Window,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScanKind {
    RowMajor,
    PendingQueue,
}

#[derive(Parser, Debug)]
#[command(
    name = "snowplow",
    about = "Snow clearing contestant speaking the judge protocol on stdin/stdout"
)]
struct Args {
    /// Optional engine config JSON document; flags below override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of days to answer before exiting.
    #[arg(long, default_value_t = SIMULATION_DAYS as u64)]
    days: u64,

    /// Idle worker search strategy.
    #[arg(long, value_enum)]
    search: Option<SearchKind>,

    /// Reach of a bounded search: Manhattan radius or window half extent.
    #[arg(long, value_name = "CELLS", requires = "search")]
    reach: Option<u32>,

    /// Order in which snowed cells are visited each day.
    #[arg(long, value_enum)]
    scan: Option<ScanKind>,

    /// Absolute worker limit.
    #[arg(long = "hard-cap", value_name = "WORKERS")]
    hard_cap: Option<u32>,

    /// Days per throttle slice.
    #[arg(long = "throttle-slice", value_name = "DAYS", requires = "throttle_workers")]
    throttle_slice: Option<u32>,

    /// Additional workers allowed per throttle slice.
    #[arg(long = "throttle-workers", value_name = "WORKERS", requires = "throttle_slice")]
    throttle_workers: Option<u32>,
}

fn resolve_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("failed to load engine config from {:?}", path))?,
        None => EngineConfig::default(),
    };

    if let Some(kind) = args.search {
        config.search = match kind {
            SearchKind::Adjacent => SearchStrategy::Adjacent,
            SearchKind::Diamond => SearchStrategy::Diamond {
                radius: args.reach.unwrap_or(12),
            },
            SearchKind::Window => SearchStrategy::Window {
                half_extent: args.reach.unwrap_or(4),
            },
        };
    }
    if let Some(kind) = args.scan {
        config.scan = match kind {
            ScanKind::RowMajor => ScanOrder::RowMajor,
            ScanKind::PendingQueue => ScanOrder::PendingQueue,
        };
    }
    if let Some(hard_cap) = args.hard_cap {
        config.hard_cap = hard_cap;
    }
    if let (Some(slice_days), Some(workers_per_slice)) = (args.throttle_slice, args.throttle_workers)
    {
        config.throttle = Some(Throttle {
            slice_days,
            workers_per_slice,
        });
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let stdin = io::stdin();
    let mut reader = TokenReader::new(stdin.lock());
    let params = reader
        .read_init()
        .context("failed to read run parameters")?;
    info!(
        board_size = params.board_size,
        salary = params.salary,
        fine = params.fine,
        search = ?config.search,
        scan = ?config.scan,
        "starting snowplow"
    );

    let mut controller = Controller::new(params, config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    while controller.day() < args.days {
        let day = controller.day();
        let Some(snowfall) = reader
            .read_day(params.board_size)
            .with_context(|| format!("failed to read snowfall for day {}", day))?
        else {
            warn!(day, "input ended before the final day");
            break;
        };
        let actions = controller.next_day(&snowfall);
        write_day(&mut out, &actions)
            .with_context(|| format!("failed to write commands for day {}", day))?;
    }

    info!(
        days = controller.day(),
        workers = controller.world().worker_count(),
        "snowplow finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults_reproduce_the_baseline() {
        let args = Args::try_parse_from(["snowplow"]).expect("no flags needed");
        assert_eq!(args.days, SIMULATION_DAYS as u64);
        let config = resolve_config(&args).expect("config resolves");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn bounded_search_takes_its_reach() {
        let args = Args::try_parse_from(["snowplow", "--search", "window", "--reach", "4"])
            .expect("flags parse");
        let config = resolve_config(&args).expect("config resolves");
        assert_eq!(config.search, SearchStrategy::Window { half_extent: 4 });

        let args =
            Args::try_parse_from(["snowplow", "--search", "diamond"]).expect("flags parse");
        let config = resolve_config(&args).expect("config resolves");
        assert_eq!(config.search, SearchStrategy::Diamond { radius: 12 });
    }

    #[test]
    fn throttle_flags_come_in_pairs() {
        let err = Args::try_parse_from(["snowplow", "--throttle-slice", "20"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from([
            "snowplow",
            "--throttle-slice",
            "20",
            "--throttle-workers",
            "10",
            "--scan",
            "pending-queue",
        ])
        .expect("flags parse");
        let config = resolve_config(&args).expect("config resolves");
        assert_eq!(
            config.throttle,
            Some(Throttle {
                slice_days: 20,
                workers_per_slice: 10
            })
        );
        assert_eq!(config.scan, ScanOrder::PendingQueue);
    }

    #[test]
    fn rejects_a_cap_beyond_the_judge_limit() {
        let args = Args::try_parse_from(["snowplow", "--hard-cap", "150"]).expect("flags parse");
        assert!(resolve_config(&args).is_err());
    }
}
