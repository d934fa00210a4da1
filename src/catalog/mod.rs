//! The catalog feature: an item list and per-item detail pages loaded from
//! a remote API, with connectivity exposed alongside.

mod config;
mod error;
mod logic;
mod model;
mod repository;
mod view_model;
pub mod wire;

pub use config::{CatalogConfig, Endpoints, GuardPolicy};
pub use error::{CatalogError, TransportError};
pub use logic::{CatalogEffect, CatalogEvent, CatalogLogic, CatalogState, InFlight};
pub use model::{HeroMedia, Images, Item, ItemDetail, Trailer};
#[cfg(any(test, feature = "testing"))]
pub use repository::MockCatalogRepository;
pub use repository::{CatalogRepository, RemoteCatalog, Transport, TransportResponse};
pub use view_model::CatalogViewModel;
