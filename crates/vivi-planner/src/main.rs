use std::sync::Arc;

use anyhow::Context;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vivi_schema::ServerMessage;

mod api;
mod config;
mod session;

use config::PlannerConfig;
use session::LayoutSession;

static PROM: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
struct AppState { config: Arc<PlannerConfig> }

async fn metrics_handler() -> String { PROM.get().map(|h| h.render()).unwrap_or_default() }

async fn score_handler(State(state): State<AppState>, Json(req): Json<api::ScoreRequest>) -> Json<api::ScoreResponse> {
    let span = tracing::info_span!("score", candidates = req.candidates.len(), people = req.people.len());
    let _e = span.enter();
    counter!("vivi_score_requests_total").increment(1);
    histogram!("vivi_score_candidates").record(req.candidates.len() as f64);
    Json(api::score_candidates(req, &state.config))
}

async fn graph_handler(Json(req): Json<api::GraphRequest>) -> Json<api::GraphResponse> {
    let span = tracing::info_span!("graph", people = req.people.len(), activities = req.activities.len());
    let _e = span.enter();
    counter!("vivi_graph_requests_total").increment(1);
    let resp = api::graph(req);
    histogram!("vivi_graph_edges").record(resp.edges.len() as f64);
    Json(resp)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state).instrument(tracing::info_span!("ws_session")))
}

async fn send(sender: &mut SplitSink<WebSocket, Message>, msg: &ServerMessage) -> Result<(), axum::Error> {
    let txt = match serde_json::to_string(msg) {
        Ok(t) => t,
        Err(e) => { tracing::warn!(error = %e, "unserializable server message"); return Ok(()); }
    };
    let kind = match msg { ServerMessage::Frame(_) => "frame", ServerMessage::Hover { .. } => "hover", ServerMessage::Selected { .. } => "selected", ServerMessage::Error { .. } => "error" };
    counter!("vivi_ws_messages_tx_total", "kind" => kind).increment(1);
    sender.send(Message::Text(txt)).await
}

/// Ticks and client messages are multiplexed in this one task, so leaving the
/// loop cancels the next tick and drops the socket together.
async fn handle_socket(socket: WebSocket, state: AppState) {
    counter!("vivi_layout_sessions_total").increment(1);
    gauge!("vivi_layout_sessions_live").increment(1.0);
    let (mut sender, mut receiver) = socket.split();
    let mut session = LayoutSession::new(state.config.layout.clone(), state.config.seed);
    let mut interval = tokio::time::interval(state.config.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    loop {
        tokio::select! {
            now = interval.tick() => {
                let elapsed = now.saturating_duration_since(last);
                last = now;
                if let Some(frame) = session.on_tick(elapsed) {
                    if send(&mut sender, &frame).await.is_err() { break; }
                }
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(txt))) => {
                    tracing::debug!(bytes = txt.len(), "client_message");
                    let mut failed = false;
                    for out in session.handle_text(&txt) {
                        if send(&mut sender, &out).await.is_err() { failed = true; break; }
                    }
                    if failed || session.is_closed() { break; }
                }
                Some(Ok(Message::Binary(_))) => {
                    let err = ServerMessage::Error { reason: "binary_not_supported".into() };
                    if send(&mut sender, &err).await.is_err() { break; }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }
    session.close();
    gauge!("vivi_layout_sessions_live").decrement(1.0);
    tracing::debug!("ws_session closed");
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics_handler))
        .route("/ws", get(ws_handler))
        .route("/api/v1/score", post(score_handler))
        .route("/api/v1/graph", post(graph_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await { tracing::warn!(error = %e, "ctrl-c handler unavailable"); std::future::pending::<()>().await; }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,vivi_planner=debug".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let config = PlannerConfig::from_env().context("loading planner config")?;
    let handle = PrometheusBuilder::new().install_recorder().context("installing prometheus recorder")?;
    let _ = PROM.set(handle);

    let addr = config.addr;
    let app = router(AppState { config: Arc::new(config) });
    tracing::info!(%addr, "planner listening");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
