//! Fire-and-forget HTTP delivery to the collector
//!
//! The primary primitive is an unbounded queue drained by a forwarder task
//! on the runtime captured at construction, so callers never block and a
//! queued payload survives the scope that produced it. If the queue is gone
//! the sink falls back to a one-shot spawned POST; if no runtime exists at
//! construction the sink is inert and drops everything.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::TapConfig;
use crate::sink::EventSink;

/// Per-request timeout; the collector is local, slow answers are failures
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Best-effort sink POSTing JSON envelopes to the collector URL
pub struct HttpSink {
    delivery: Delivery,
}

enum Delivery {
    /// Queue drained by the forwarder task
    Queue {
        tx: UnboundedSender<String>,
        client: Client,
        url: String,
        handle: Handle,
    },
    /// No runtime or no usable HTTP client at construction
    Unavailable,
}

impl HttpSink {
    /// Build a sink for the configured collector
    ///
    /// Requires an ambient tokio runtime. Without one there is no delivery
    /// primitive and the sink drops every payload.
    pub fn new(config: &TapConfig) -> Self {
        let url = config.collector_url();
        let client = Client::builder().timeout(REQUEST_TIMEOUT).no_proxy().build();

        let delivery = match (Handle::try_current(), client) {
            (Ok(handle), Ok(client)) => {
                let (tx, rx) = mpsc::unbounded_channel();
                handle.spawn(forward(rx, client.clone(), url.clone()));
                log::debug!("console tap forwarding to {}", url);
                Delivery::Queue {
                    tx,
                    client,
                    url,
                    handle,
                }
            }
            _ => {
                log::debug!("console tap has no delivery primitive, dropping events");
                Delivery::Unavailable
            }
        };

        HttpSink { delivery }
    }
}

impl EventSink for HttpSink {
    fn send(&self, payload: Value) {
        let Delivery::Queue {
            tx,
            client,
            url,
            handle,
        } = &self.delivery
        else {
            return;
        };

        let body = match serde_json::to_string(&payload) {
            Ok(body) => body,
            Err(_) => return,
        };

        if let Err(unsent) = tx.send(body) {
            // Forwarder gone (runtime wound down mid-flight): one-shot
            // fallback. Handle::spawn panics on a shut-down runtime, so the
            // attempt is fenced off.
            let client = client.clone();
            let url = url.clone();
            let body = unsent.0;
            let _ = catch_unwind(AssertUnwindSafe(|| {
                handle.spawn(async move {
                    let _ = client
                        .post(&url)
                        .header(CONTENT_TYPE, "application/json")
                        .body(body)
                        .send()
                        .await;
                });
            }));
        }
    }
}

/// Drain the queue: one POST per payload, response never read, failures
/// dropped, no retries
async fn forward(mut rx: UnboundedReceiver<String>, client: Client, url: String) {
    while let Some(body) = rx.recv().await {
        let _ = client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;
    }
}
