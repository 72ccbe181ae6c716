//! HTTP client for the remote cart service.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::debug;

use crate::{
    auth::{CredentialProvider, Credentials},
    cart::models::{CartItem, NewCartItem, Quantity},
    remote::{
        CartRemote, CartRemoteError,
        wire::{AddItemRequest, RemoteCart, RemoteLine, ServiceMessage, UpdateQuantityRequest},
    },
};

/// Applied to every request so an unresponsive service produces a failed
/// call instead of a cart stuck in `Pending` forever.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// [`CartRemote`] implementation over the REST cart service.
///
/// One round trip per call, no retries. Credentials are resolved per call
/// through the injected [`CredentialProvider`]; this client never decides
/// between cookie and bearer auth itself.
#[derive(Clone)]
pub struct HttpCartRemote {
    base_url: String,
    http: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpCartRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCartRemote")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCartRemote {
    /// Creates a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, CartRemoteError> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self, CartRemoteError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn attach_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.resolve() {
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::SessionCookie(cookie) => request.header(header::COOKIE, cookie),
            Credentials::Anonymous => request,
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, CartRemoteError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CartRemoteError::Unauthorized),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let message = response
                    .json::<ServiceMessage>()
                    .await
                    .ok()
                    .map(|body| body.message);

                Err(CartRemoteError::Validation(message))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();

                Err(CartRemoteError::Unexpected(format!(
                    "cart request failed with status {status}: {text}"
                )))
            }
        }
    }
}

#[async_trait]
impl CartRemote for HttpCartRemote {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, CartRemoteError> {
        debug!("fetching cart");

        let response = self.attach_auth(self.http.get(self.url("/cart"))).send().await?;
        let cart: RemoteCart = Self::ensure_success(response).await?.json().await?;

        cart.items.into_iter().map(CartItem::try_from).collect()
    }

    async fn add_item(&self, item: &NewCartItem) -> Result<CartItem, CartRemoteError> {
        debug!(product_id = %item.product_id, "adding cart item");

        let response = self
            .attach_auth(self.http.post(self.url("/cart/items")))
            .json(&AddItemRequest::from(item))
            .send()
            .await?;

        let line: RemoteLine = Self::ensure_success(response).await?.json().await?;

        CartItem::try_from(line)
    }

    async fn update_quantity(
        &self,
        item_id: &str,
        quantity: Quantity,
    ) -> Result<(), CartRemoteError> {
        debug!(item_id, quantity = quantity.get(), "updating cart item quantity");

        let response = self
            .attach_auth(self.http.put(self.url(&format!("/cart/items/{item_id}"))))
            .json(&UpdateQuantityRequest {
                quantity: quantity.get(),
            })
            .send()
            .await?;

        Self::ensure_success(response).await.map(|_| ())
    }

    async fn remove_item(&self, item_id: &str) -> Result<(), CartRemoteError> {
        debug!(item_id, "removing cart item");

        let response = self
            .attach_auth(self.http.delete(self.url(&format!("/cart/items/{item_id}"))))
            .send()
            .await?;

        Self::ensure_success(response).await.map(|_| ())
    }

    async fn clear(&self) -> Result<(), CartRemoteError> {
        debug!("clearing cart");

        let response = self.attach_auth(self.http.delete(self.url("/cart"))).send().await?;

        Self::ensure_success(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::SessionCredentials;

    use super::*;

    #[test]
    fn url_joins_without_double_slash() -> Result<(), CartRemoteError> {
        let remote = HttpCartRemote::new(
            "https://api.example.test/",
            Arc::new(SessionCredentials::new()),
        )?;

        assert_eq!(remote.url("/cart"), "https://api.example.test/cart");
        assert_eq!(
            remote.url("/cart/items/line-1"),
            "https://api.example.test/cart/items/line-1"
        );

        Ok(())
    }
}
