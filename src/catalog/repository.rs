//! Repository boundary and its HTTP-backed implementation.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::{wire, CatalogError, Endpoints, Item, ItemDetail, TransportError};
use crate::{resource, ResourceStream};

/// Source of catalog data.
///
/// Every call returns a fresh, independent sequence that obeys the
/// [`Resource`](crate::Resource) protocol: `Loading`, then exactly one of
/// `Success` or `Error`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CatalogRepository: Send + Sync {
    fn fetch_list(&self) -> ResourceStream<Vec<Item>>;

    fn fetch_detail(&self, id: u32) -> ResourceStream<ItemDetail>;
}

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP GET capability the remote repository is built on.
pub trait Transport: Send + Sync + 'static {
    /// Issue a GET for `path`, relative to the transport's base URL.
    fn get(&self, path: String) -> BoxFuture<'static, Result<TransportResponse, TransportError>>;
}

/// [`CatalogRepository`] backed by the remote catalog's REST API.
pub struct RemoteCatalog<T> {
    transport: Arc<T>,
    endpoints: Endpoints,
}

impl<T: Transport> RemoteCatalog<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoints,
        }
    }
}

async fn get_body<T: Transport>(transport: &T, path: String) -> Result<String, CatalogError> {
    tracing::info!(%path, "fetching");
    let response = transport.get(path.clone()).await.map_err(|error| {
        tracing::warn!(%path, %error, "transport failure");
        error
    })?;
    tracing::debug!(%path, status = response.status, "response received");

    if !response.is_success() {
        tracing::warn!(%path, status = response.status, body = %response.body, "request failed");
        return Err(CatalogError::Status {
            status: response.status,
            body: response.body,
        });
    }
    Ok(response.body)
}

impl<T: Transport> CatalogRepository for RemoteCatalog<T> {
    fn fetch_list(&self) -> ResourceStream<Vec<Item>> {
        let transport = Arc::clone(&self.transport);
        let path = self.endpoints.list_path.clone();
        resource::fetch(async move {
            let body = get_body(transport.as_ref(), path).await?;
            wire::decode_list(&body)
        })
    }

    fn fetch_detail(&self, id: u32) -> ResourceStream<ItemDetail> {
        let transport = Arc::clone(&self.transport);
        let path = self.endpoints.detail_path_for(id);
        resource::fetch(async move {
            let body = get_body(transport.as_ref(), path).await?;
            wire::decode_detail(&body)
        })
    }
}
