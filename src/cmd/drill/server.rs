// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::catalog::Scope;
use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::records::RecordStore;
use crate::session::Session;
use crate::types::timestamp::Timestamp;

pub struct DrillOptions {
    /// Which cards to draw from.
    pub scope: Scope,
    /// Guests start from a blank slate and nothing they do is saved.
    pub guest: bool,
    /// Overrides the port from the configuration file.
    pub port: Option<u16>,
    /// Whether to open the drill page in the browser.
    pub open_browser: bool,
}

pub async fn start_server(directory: Option<String>, options: DrillOptions) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    log::debug!("Drilling collection in {}", coll.directory.display());
    let records: Option<Arc<dyn RecordStore>> = if options.guest {
        None
    } else {
        Some(Arc::new(coll.db.clone()))
    };
    let mut session = Session::open(&coll.catalog, options.scope, records, &coll.config)?;
    session.start(Timestamp::now(), &mut rand::rng());
    if session.total_available_cards() == 0 {
        log::warn!("The collection has no vocabulary in scope.");
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState {
            reveal: false,
            session,
            finished: false,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());

    let port = options.port.unwrap_or(coll.config.port);
    let bind = format!("127.0.0.1:{port}");

    if options.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let address = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&address).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;
    log::debug!("Server stopped.");

    let syncer = state.lock().session.take_syncer();
    if let Some(syncer) = syncer {
        log::debug!("Waiting for pending saves...");
        syncer.close().await;
    }
    Ok(())
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
