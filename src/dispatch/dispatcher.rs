// ABOUTME: Request dispatcher - GET/POST calls admitted through a ConcurrencyGate.
// ABOUTME: Validates response status, then hands the response to a caller parser.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::error::{DispatchError, GateError};
use crate::gate::{ConcurrencyGate, IntoBound};
use crate::http::{HttpClient, HttpResponse, build_client};

/// Issues requests over one shared client, at most `capacity` at a time.
///
/// Every call waits for a slot on the gate, performs the request, rejects
/// non-2xx statuses with [`DispatchError::RequestFailed`], and otherwise passes
/// the response to the parser. The slot is released once the parser is done.
///
/// Parsers return `Result<T, E>` for any error type that can hold a
/// [`DispatchError`]; their own errors reach the caller untouched.
///
/// There is no ordering between concurrent calls. See [`ConcurrencyGate`] for
/// the admission rules.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    client: C,
    gate: ConcurrencyGate,
}

impl Dispatcher<reqwest::Client> {
    /// Create a dispatcher with a reqwest client built from `config`.
    pub fn with_default_client(config: &GateConfig) -> Result<Self, DispatchError> {
        let gate = ConcurrencyGate::from_config(config)?;
        Ok(Self::with_gate(build_client(config)?, gate))
    }
}

impl<C: HttpClient> Dispatcher<C> {
    /// Create a dispatcher with its own gate of `max_concurrency` slots.
    pub fn new(client: C, max_concurrency: usize) -> Self {
        Self::with_gate(client, ConcurrencyGate::new(max_concurrency))
    }

    /// Create a dispatcher on an existing gate.
    ///
    /// Dispatchers built on clones of the same gate share its slots.
    pub fn with_gate(client: C, gate: ConcurrencyGate) -> Self {
        Self { client, gate }
    }

    pub fn from_config(client: C, config: &GateConfig) -> Result<Self, GateError> {
        Ok(Self::with_gate(client, ConcurrencyGate::from_config(config)?))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Change the capacity of the underlying gate.
    pub fn set_capacity<B: IntoBound>(&self, new_bound: B) -> Result<(), GateError> {
        self.gate.set_capacity(new_bound)
    }

    /// GET `url` and parse the response.
    pub async fn get<T, E, P, Fut>(&self, url: &str, parser: P) -> Result<T, E>
    where
        P: FnOnce(C::Response) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DispatchError>,
    {
        debug!(%url, "Dispatching GET");
        self.gate
            .run(self.execute(url, self.client.get(url), parser))
            .await
    }

    /// POST `payload` as JSON to `url` and parse the response.
    pub async fn post<T, E, P, Fut, B>(&self, url: &str, payload: &B, parser: P) -> Result<T, E>
    where
        B: Serialize + ?Sized,
        P: FnOnce(C::Response) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DispatchError>,
    {
        let payload = serde_json::to_value(payload).map_err(DispatchError::from)?;
        debug!(%url, "Dispatching POST");
        self.gate
            .run(self.execute(url, self.client.post(url, &payload), parser))
            .await
    }

    /// GET every URL concurrently through the gate, parsing each with `parser`.
    ///
    /// Results are returned in the order of `urls`; one failure does not stop
    /// the others.
    pub async fn get_all<I, T, E, P, Fut>(&self, urls: I, parser: P) -> Vec<Result<T, E>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: Fn(C::Response) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DispatchError>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        futures::future::join_all(urls.iter().map(|url| self.get(url, &parser))).await
    }

    async fn execute<T, E, P, Fut, R>(&self, url: &str, request: R, parser: P) -> Result<T, E>
    where
        R: Future<Output = Result<C::Response, DispatchError>>,
        P: FnOnce(C::Response) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DispatchError>,
    {
        let response = request.await?;

        let status = response.status();
        if !status.is_success() {
            drop(response);
            warn!(%url, status = status.as_u16(), "Request failed");
            return Err(DispatchError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        parser(response).await
    }
}
