use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Favorite, Principal, Role};
use crate::domain::repos::FavoritesRepository;
use crate::domain::target::{FavoriteTarget, TargetFields, TargetKind};

/// Customer favorites over branches, menu items and offers.
pub struct FavoritesService<FR: FavoritesRepository> {
    db: DatabaseConnection,
    repo: Arc<FR>,
}

impl<FR: FavoritesRepository> FavoritesService<FR> {
    pub fn new(db: DatabaseConnection, repo: Arc<FR>) -> Self {
        Self { db, repo }
    }

    /// Create a favorite from the flat wire representation. The polymorphic
    /// reference is validated before anything touches the store.
    #[instrument(skip(self, principal, fields), fields(user_id = %principal.user_id, kind = kind.as_str()))]
    pub async fn create(
        &self,
        principal: &Principal,
        kind: TargetKind,
        fields: TargetFields,
    ) -> Result<Favorite, DomainError> {
        principal.require_role(&[Role::Customer])?;

        let target = FavoriteTarget::from_parts(kind, fields)?;

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        if self
            .repo
            .find_by_user_and_target(&txn, principal.user_id, target)
            .await?
            .is_some()
        {
            return Err(DomainError::validation(
                "target",
                "already favorited by this user",
            ));
        }

        let favorite = Favorite {
            id: Uuid::now_v7(),
            user_id: principal.user_id,
            target,
            created_at: Utc::now(),
        };

        let created = self.repo.insert(&txn, favorite).await?;
        txn.commit().await.map_err(DomainError::from)?;

        tracing::info!(favorite_id = %created.id, "Successfully created favorite");
        Ok(created)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Favorite>, DomainError> {
        principal.require_role(&[Role::Customer])?;
        self.repo.list_by_user(&self.db, principal.user_id).await
    }

    /// Delete one of the caller's own favorites. The delete statement itself
    /// is scoped to the owner, so there is no window between the existence
    /// check and the mutation.
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id, favorite_id = %id))]
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        principal.require_role(&[Role::Customer])?;

        let deleted = self
            .repo
            .delete_by_owner(&self.db, id, principal.user_id)
            .await?;
        if deleted {
            tracing::info!("Successfully deleted favorite");
            return Ok(());
        }

        // Nothing matched: distinguish a foreign favorite from a missing one.
        if self.repo.exists(&self.db, id).await? {
            Err(DomainError::Forbidden)
        } else {
            Err(DomainError::not_found("favorite", id))
        }
    }
}
