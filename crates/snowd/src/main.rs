use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use futures::{SinkExt, StreamExt};
use snow_core::config::EngineConfig;
use snow_core::engine::Controller;
use snow_core::judge::Judge;
use snow_core::judge_day;
use snow_core::weather::Forecast;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{error, info, trace, warn};

#[derive(Parser, Debug)]
#[command(name = "snowd", about = "Snow clearing run streaming daemon")]
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

    /// Address to bind (defaults to 127.0.0.1).
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on for WebSocket clients.
    #[arg(long, default_value_t = 8788)]
    port: u16,

    /// Milliseconds to sleep between days.
    #[arg(long, default_value_t = 100u64)]
    tick_ms: u64,
}

#[derive(Clone)]
struct AppState {
    tx: broadcast::Sender<String>,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("failed to load engine config from {:?}", path)),
        None => Ok(EngineConfig::default()),
    }
}

fn load_forecast(args: &Args) -> Forecast {
    match &args.seed_phrase {
        Some(phrase) => Forecast::from_phrase(phrase),
        None => Forecast::generate(args.seed.unwrap_or(1)),
    }
}

async fn run_days(
    forecast: Forecast,
    config: EngineConfig,
    tick_ms: u64,
    tx: broadcast::Sender<String>,
) {
    let params = forecast.params;
    let mut controller = Controller::new(params, config);
    let mut judge = Judge::new(params);
    let days = forecast.days();

    for (day, snowfall) in forecast.snowfall.iter().enumerate() {
        let line = match judge_day(&mut controller, &mut judge, snowfall, day + 1 == days) {
            Ok(report) => match report.frame.to_ndjson() {
                Ok(line) => line,
                Err(err) => {
                    error!(?err, day, "frame serialization failed");
                    return;
                }
            },
            Err(err) => {
                error!(%err, "judge rejected the engine's commands");
                return;
            }
        };

        if tx.send(line).is_err() {
            trace!("no subscribers for frame t={}", day);
        }

        sleep(Duration::from_millis(tick_ms)).await;
    }

    let totals = judge.totals();
    info!(
        fine = totals.fine,
        salary = totals.salary,
        score = totals.score(),
        "run complete"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = load_config(&args)?;
    let forecast = load_forecast(&args);
    info!(
        board_size = forecast.params.board_size,
        salary = forecast.params.salary,
        fine = forecast.params.fine,
        "generated case"
    );

    let (tx, _rx) = broadcast::channel::<String>(128);
    let state = AppState { tx: tx.clone() };

    tokio::spawn(run_days(forecast, config, args.tick_ms, tx));

    let app = Router::new()
        .route("/stream", get(ws_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;

    info!(%addr, "starting snowd");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for ctrl-c");
        return;
    }
    info!("shutting down snowd");
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| async move { handle_socket(socket, state.tx.subscribe()).await })
}

async fn handle_socket(socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    let (mut sender, mut receiver) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(line) => {
                    if sender.send(Message::Text(line)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client lagging; frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut drain = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
    info!("websocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults_bind_locally() {
        let args = Args::try_parse_from(["snowd"]).expect("no flags needed");
        assert_eq!(args.bind, "127.0.0.1");
        assert_eq!(args.tick_ms, 100);
        assert!(load_config(&args).is_ok());
    }

    #[test]
    fn rejects_both_seed_flags() {
        let err = Args::try_parse_from(["snowd", "--seed", "1", "--seed-phrase", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[tokio::test]
    async fn streams_one_frame_per_day() {
        let forecast = Forecast::generate(5);
        let days = forecast.days();
        let (tx, mut rx) = broadcast::channel::<String>(days + 1);
        run_days(forecast, EngineConfig::default(), 0, tx).await;

        let mut frames = 0;
        let mut last = String::new();
        while let Ok(line) = rx.try_recv() {
            frames += 1;
            last = line;
        }
        assert_eq!(frames, days);
        assert!(last.contains("\"final\":true"));
    }
}
