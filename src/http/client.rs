// ABOUTME: Defines the HttpClient and HttpResponse traits - the seam between
// ABOUTME: the dispatcher and whatever transport actually performs requests.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::DispatchError;

/// A response produced by an [`HttpClient`].
///
/// Body readers consume the response, so a parser that reads the body is
/// the last holder of it.
#[async_trait]
pub trait HttpResponse: Send + Sized {
    /// HTTP status of the response.
    fn status(&self) -> StatusCode;

    /// Read the body as text.
    async fn text(self) -> Result<String, DispatchError>;

    /// Read the body as raw bytes.
    async fn bytes(self) -> Result<Vec<u8>, DispatchError>;

    /// Read the body and deserialize it as JSON.
    async fn json<T: DeserializeOwned + Send>(self) -> Result<T, DispatchError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Trait for network clients the dispatcher can drive.
///
/// One client handle is shared by every concurrent request of a dispatcher,
/// so implementations must tolerate concurrent calls through `&self`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Response: HttpResponse;

    /// Issue a GET request.
    async fn get(&self, url: &str) -> Result<Self::Response, DispatchError>;

    /// Issue a POST request with a JSON body.
    async fn post(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<Self::Response, DispatchError>;
}
