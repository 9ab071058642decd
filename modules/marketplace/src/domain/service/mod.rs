//! Domain service layer - business logic and rules.
//!
//! Per-resource services compose the identity gate (`Principal::require_role`),
//! the [`OwnershipResolver`](crate::domain::ownership::OwnershipResolver) and
//! the polymorphic target validators, then perform one logical write and
//! return the persisted row.
//!
//! Layering rules:
//! - MAY import: domain models, repository traits, ports, `sea_orm`
//!   connection handles.
//! - MUST NOT import: `api::*` (one-way dependency: API → Domain).
//!
//! Connection management: services acquire connections from the injected
//! `DatabaseConnection` handle. Multi-statement writes (ownership read +
//! insert) run inside a transaction so both statements share one pooled
//! connection; author-scoped update/delete are single filtered statements.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::ownership::OwnershipResolver;
use crate::domain::ports::Notifier;
use crate::domain::repos::{
    BranchesRepository, CatalogRepository, FavoritesRepository, ReviewsRepository,
    VendorsRepository,
};

mod branches;
mod catalog;
mod favorites;
mod reviews;
mod vendors;

pub use branches::BranchesService;
pub use catalog::CatalogService;
pub use favorites::FavoritesService;
pub use reviews::ReviewsService;
pub use vendors::VendorsService;

/// Configuration for the domain services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_comment_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 120,
            max_comment_length: 2000,
        }
    }
}

/// DI container aggregating all domain services.
pub struct AppServices<VR, BR, CR, FR, RR>
where
    VR: VendorsRepository + 'static,
    BR: BranchesRepository + 'static,
    CR: CatalogRepository + 'static,
    FR: FavoritesRepository + 'static,
    RR: ReviewsRepository + 'static,
{
    pub vendors: VendorsService<VR>,
    pub branches: BranchesService<VR, BR, CR, RR>,
    pub catalog: CatalogService<VR, BR, CR, RR>,
    pub favorites: FavoritesService<FR>,
    pub reviews: ReviewsService<VR, BR, CR, RR>,
}

impl<VR, BR, CR, FR, RR> AppServices<VR, BR, CR, FR, RR>
where
    VR: VendorsRepository + 'static,
    BR: BranchesRepository + 'static,
    CR: CatalogRepository + 'static,
    FR: FavoritesRepository + 'static,
    RR: ReviewsRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabaseConnection,
        vendors_repo: VR,
        branches_repo: BR,
        catalog_repo: CR,
        favorites_repo: FR,
        reviews_repo: RR,
        notifier: Arc<dyn Notifier>,
        config: ServiceConfig,
    ) -> Self {
        let vendors_repo = Arc::new(vendors_repo);
        let branches_repo = Arc::new(branches_repo);
        let catalog_repo = Arc::new(catalog_repo);
        let favorites_repo = Arc::new(favorites_repo);
        let reviews_repo = Arc::new(reviews_repo);

        let ownership = Arc::new(OwnershipResolver::new(
            Arc::clone(&vendors_repo),
            Arc::clone(&branches_repo),
            Arc::clone(&catalog_repo),
            Arc::clone(&reviews_repo),
        ));

        Self {
            vendors: VendorsService::new(
                db.clone(),
                vendors_repo,
                Arc::clone(&notifier),
                config.clone(),
            ),
            branches: BranchesService::new(
                db.clone(),
                branches_repo,
                Arc::clone(&ownership),
                Arc::clone(&notifier),
                config.clone(),
            ),
            catalog: CatalogService::new(
                db.clone(),
                catalog_repo,
                Arc::clone(&ownership),
                Arc::clone(&notifier),
                config.clone(),
            ),
            favorites: FavoritesService::new(db.clone(), favorites_repo),
            reviews: ReviewsService::new(db, reviews_repo, ownership, notifier, config),
        }
    }
}

#[cfg(test)]
mod tests_vendors;

#[cfg(test)]
mod tests_catalog;

#[cfg(test)]
mod tests_favorites;

#[cfg(test)]
mod tests_reviews;
