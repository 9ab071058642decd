use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Favorite;
use crate::domain::repos::FavoritesRepository;
use crate::domain::target::FavoriteTarget;

use super::entity::favorite::{ActiveModel, Column, Entity as FavoriteEntity};

/// ORM-based implementation of the `FavoritesRepository` trait.
#[derive(Clone, Default)]
pub struct SeaFavoritesRepository;

impl SeaFavoritesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FavoritesRepository for SeaFavoritesRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        favorite: Favorite,
    ) -> Result<Favorite, DomainError> {
        let fields = favorite.target.fields();
        let m = ActiveModel {
            id: Set(favorite.id),
            user_id: Set(favorite.user_id),
            target_type: Set(favorite.target.kind().as_str().to_owned()),
            branch_id: Set(fields.branch_id),
            menu_item_id: Set(fields.menu_item_id),
            offer_id: Set(fields.offer_id),
            created_at: Set(favorite.created_at),
        };
        FavoriteEntity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(favorite)
    }

    async fn find_by_user_and_target<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> Result<Option<Favorite>, DomainError> {
        let mut query = FavoriteEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::TargetType.eq(target.kind().as_str()));

        query = match target {
            FavoriteTarget::Branch(id) => query.filter(Column::BranchId.eq(id)),
            FavoriteTarget::MenuItem(id) => query.filter(Column::MenuItemId.eq(id)),
            FavoriteTarget::Offer(id) => query.filter(Column::OfferId.eq(id)),
        };

        let found = query.one(conn).await.map_err(DomainError::from)?;
        found.map(Favorite::try_from).transpose()
    }

    async fn list_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Favorite>, DomainError> {
        let rows = FavoriteEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        rows.into_iter().map(Favorite::try_from).collect()
    }

    async fn delete_by_owner<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = FavoriteEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let found = FavoriteEntity::find()
            .filter(Column::Id.eq(id))
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(found.is_some())
    }
}
