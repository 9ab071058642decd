//! Repository traits implemented by `infra::storage`.
//!
//! Methods are generic over the connection so the same code path runs on a
//! pooled connection or inside a transaction. Soft-deleted rows are invisible
//! to every finder and listing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Branch, Favorite, MenuFilter, MenuItem, Offer, RegistrationStatus, Review, ReviewLike,
    ReviewPatch, ReviewReply, Vendor,
};
use crate::domain::target::{FavoriteTarget, TargetKind};

#[async_trait]
pub trait VendorsRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor: Vendor,
    ) -> Result<Vendor, DomainError>;

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Vendor>, DomainError>;

    async fn find_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Option<Vendor>, DomainError>;

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Vendor>, DomainError>;

    /// Atomic status transition; returns false when the vendor is absent.
    async fn set_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        status: RegistrationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait BranchesRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch: Branch,
    ) -> Result<Branch, DomainError>;

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Branch>, DomainError>;

    async fn list_by_vendor<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor_id: Uuid,
    ) -> Result<Vec<Branch>, DomainError>;

    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch: Branch,
    ) -> Result<Branch, DomainError>;

    async fn soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn menu_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        item: MenuItem,
    ) -> Result<MenuItem, DomainError>;

    async fn menu_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<MenuItem>, DomainError>;

    async fn menu_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        item: MenuItem,
    ) -> Result<MenuItem, DomainError>;

    async fn menu_soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Public menu listing with deterministic ordering (name, then id).
    async fn menu_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch_id: Uuid,
        filter: &MenuFilter,
    ) -> Result<Vec<MenuItem>, DomainError>;

    async fn offer_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        offer: Offer,
    ) -> Result<Offer, DomainError>;

    async fn offer_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Offer>, DomainError>;

    async fn offer_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        offer: Offer,
    ) -> Result<Offer, DomainError>;

    async fn offer_soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Offers whose window has not closed: `ends_at > now`.
    async fn offer_list_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Offer>, DomainError>;
}

#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        favorite: Favorite,
    ) -> Result<Favorite, DomainError>;

    async fn find_by_user_and_target<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> Result<Option<Favorite>, DomainError>;

    async fn list_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Favorite>, DomainError>;

    /// Single-statement delete scoped to the owning user.
    async fn delete_by_owner<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn exists<C: ConnectionTrait>(&self, conn: &C, id: Uuid)
        -> Result<bool, DomainError>;
}

#[async_trait]
pub trait ReviewsRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        review: Review,
    ) -> Result<Review, DomainError>;

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Review>, DomainError>;

    /// Single-statement update filtered on `(id, user_id)`; `None` when no
    /// row matched.
    async fn update_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        patch: ReviewPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Review>, DomainError>;

    /// Single-statement soft delete filtered on `(id, user_id)`.
    async fn soft_delete_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    async fn list_by_target<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: TargetKind,
        target_id: Uuid,
    ) -> Result<Vec<Review>, DomainError>;

    async fn reply_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        reply: ReviewReply,
    ) -> Result<ReviewReply, DomainError>;

    async fn reply_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
    ) -> Result<Vec<ReviewReply>, DomainError>;

    async fn reply_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<ReviewReply>, DomainError>;

    /// Single-statement soft delete filtered on `(id, user_id)`.
    async fn reply_delete_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Upsert keyed on `(review_id, user_id)`: a second write overwrites the
    /// boolean instead of erroring.
    async fn like_upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
        user_id: Uuid,
        is_liked: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<ReviewLike, DomainError>;

    async fn like_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewLike>, DomainError>;
}
