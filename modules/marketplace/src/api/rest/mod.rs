//! HTTP/REST interface.

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::domain::service::AppServices;
use crate::infra::storage::{
    SeaBranchesRepository, SeaCatalogRepository, SeaFavoritesRepository, SeaReviewsRepository,
    SeaVendorsRepository,
};
use crate::infra::uploads::ImageStore;

/// Concrete service aggregate wired to the ORM repositories. Lives at the
/// composition root so neither domain nor handlers name infra types.
pub type ConcreteServices = AppServices<
    SeaVendorsRepository,
    SeaBranchesRepository,
    SeaCatalogRepository,
    SeaFavoritesRepository,
    SeaReviewsRepository,
>;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ConcreteServices>,
    pub images: Arc<ImageStore>,
}
