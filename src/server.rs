/*!
 * Presenter web surface.
 *
 * A single route shows one randomly chosen haiku with a link to the
 * article it was found in.
 */

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use log::{error, info};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tokio::sync::watch;

use crate::app_config::ServerConfig;
use crate::errors::StoreError;
use crate::haiku::HaikuRecord;
use crate::store::HaikuStore;

/// Where the presenter gets its haikus from
#[derive(Debug, Clone)]
enum HaikuSource {
    /// Re-read the store on every request
    Live(HaikuStore),
    /// List loaded once at start
    Snapshot(Arc<Vec<HaikuRecord>>),
}

/// Shared presenter state
#[derive(Debug, Clone)]
pub struct PresenterState {
    source: HaikuSource,
}

impl PresenterState {
    /// Read the store on every request
    pub fn live(store: HaikuStore) -> Self {
        Self {
            source: HaikuSource::Live(store),
        }
    }

    /// Serve a fixed list
    pub fn snapshot(haikus: Vec<HaikuRecord>) -> Self {
        Self {
            source: HaikuSource::Snapshot(Arc::new(haikus)),
        }
    }

    /// State for the given configuration, loading the list now if it is not reloaded per request
    pub fn from_config(config: &ServerConfig, store: HaikuStore) -> Result<Self, StoreError> {
        if config.reload_per_request {
            Ok(Self::live(store))
        } else {
            Ok(Self::snapshot(store.load()?))
        }
    }

    /// The current list, failing with `StoreError::Empty` when there is nothing to show
    fn haikus(&self) -> Result<Arc<Vec<HaikuRecord>>, StoreError> {
        match &self.source {
            HaikuSource::Live(store) => store.load_non_empty().map(Arc::new),
            HaikuSource::Snapshot(haikus) if haikus.is_empty() => {
                Err(StoreError::Empty("snapshot".to_string()))
            }
            HaikuSource::Snapshot(haikus) => Ok(Arc::clone(haikus)),
        }
    }
}

/// Pick one haiku uniformly at random
pub fn pick_random(haikus: &[HaikuRecord]) -> Option<&HaikuRecord> {
    haikus.choose(&mut rand::rng())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the page for one haiku
pub fn render_haiku_page(record: &HaikuRecord) -> String {
    let verses = record
        .lines()
        .iter()
        .map(|line| format!("      <p class=\"verse\">{}</p>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="no">
  <head>
    <meta charset="utf-8">
    <title>Nyhetshaiku</title>
  </head>
  <body>
    <main>
{verses}
      <p class="source"><a href="{link}">Les saken</a></p>
    </main>
  </body>
</html>
"#,
        verses = verses,
        link = escape_html(&record.link)
    )
}

fn no_haikus_yet() -> (StatusCode, String) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "No haikus found yet".to_string(),
    )
}

/// Handler for `GET /`
pub async fn show_haiku(
    State(state): State<PresenterState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let haikus = state.haikus().map_err(|e| match e {
        StoreError::Empty(_) => no_haikus_yet(),
        other => {
            error!("Cannot read haikus: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Haikus are unavailable right now".to_string(),
            )
        }
    })?;

    let record = pick_random(&haikus).ok_or_else(no_haikus_yet)?;

    Ok(Html(render_haiku_page(record)))
}

/// Router serving the presenter
pub fn router(state: PresenterState) -> Router {
    Router::new().route("/", get(show_haiku)).with_state(state)
}

/// Run the presenter until `shutdown` turns true
pub async fn serve(
    config: &ServerConfig,
    state: PresenterState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Presenter listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.changed().await.ok();
            info!("Presenter shutting down");
        })
        .await?;

    Ok(())
}
