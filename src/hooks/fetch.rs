//! Fetch interception
//!
//! Wraps an async request function so a failure emits one event and then
//! reaches the caller unchanged. This is the one hook whose suppression
//! scope is narrower than the rest: the emission is silent, but the caller
//! must observe the original error value, never one manufactured here.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::events::TapEvent;
use crate::hooks::errors::error_chain;
use crate::tap::Tap;

impl Tap {
    /// Observe one in-flight fetch
    ///
    /// The resolved value of a successful call passes through untouched. A
    /// failing call emits one `fetch.error` event and returns the original
    /// error value to the caller.
    pub async fn observe_fetch<T, E, Fut>(&self, request: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        match request.await {
            Ok(value) => Ok(value),
            Err(error) => {
                self.emit(TapEvent::fetch_error(error.to_string(), error_chain(&error)));
                Err(error)
            }
        }
    }

    /// Wrap a fetch-like function
    ///
    /// Higher-order form of `observe_fetch`: the returned function invokes
    /// the original with the identical request and taps its outcome.
    pub fn wrap_fetch<Req, T, E, F, Fut>(
        &self,
        fetch: F,
    ) -> impl Fn(Req) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send>>
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Error + Send + 'static,
    {
        let tap = self.clone();
        move |request| {
            let outcome = fetch(request);
            let tap = tap.clone();
            Box::pin(async move { tap.observe_fetch(outcome).await })
        }
    }
}
