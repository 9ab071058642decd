use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{MenuFilter, MenuItem, Offer};
use crate::domain::repos::CatalogRepository;

use super::entity::{menu_item, offer};

/// ORM-based implementation of the `CatalogRepository` trait (menu items and
/// offers).
#[derive(Clone, Default)]
pub struct SeaCatalogRepository;

impl SeaCatalogRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogRepository for SeaCatalogRepository {
    async fn menu_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        item: MenuItem,
    ) -> Result<MenuItem, DomainError> {
        let m = menu_item::ActiveModel {
            id: Set(item.id),
            branch_id: Set(item.branch_id),
            name: Set(item.name.clone()),
            price: Set(item.price),
            description: Set(item.description.clone()),
            image_path: Set(item.image_path.clone()),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
            deleted_at: Set(None),
        };
        menu_item::Entity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(item)
    }

    async fn menu_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<MenuItem>, DomainError> {
        let found = menu_item::Entity::find()
            .filter(menu_item::Column::Id.eq(id))
            .filter(menu_item::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(found.map(MenuItem::from))
    }

    async fn menu_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        item: MenuItem,
    ) -> Result<MenuItem, DomainError> {
        let patch = menu_item::ActiveModel {
            name: Set(item.name.clone()),
            price: Set(item.price),
            description: Set(item.description.clone()),
            image_path: Set(item.image_path.clone()),
            updated_at: Set(item.updated_at),
            ..Default::default()
        };
        menu_item::Entity::update_many()
            .set(patch)
            .filter(menu_item::Column::Id.eq(item.id))
            .filter(menu_item::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(item)
    }

    async fn menu_soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let patch = menu_item::ActiveModel {
            deleted_at: Set(Some(deleted_at)),
            updated_at: Set(deleted_at),
            ..Default::default()
        };
        let result = menu_item::Entity::update_many()
            .set(patch)
            .filter(menu_item::Column::Id.eq(id))
            .filter(menu_item::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn menu_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch_id: Uuid,
        filter: &MenuFilter,
    ) -> Result<Vec<MenuItem>, DomainError> {
        let mut query = menu_item::Entity::find()
            .filter(menu_item::Column::BranchId.eq(branch_id))
            .filter(menu_item::Column::DeletedAt.is_null());

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(menu_item::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(menu_item::Column::Description)))
                            .like(pattern),
                    ),
            );
        }
        if let Some(min) = filter.min_price {
            query = query.filter(menu_item::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(menu_item::Column::Price.lte(max));
        }

        let rows = query
            .order_by_asc(menu_item::Column::Name)
            .order_by_asc(menu_item::Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    async fn offer_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        o: Offer,
    ) -> Result<Offer, DomainError> {
        let m = offer::ActiveModel {
            id: Set(o.id),
            branch_id: Set(o.branch_id),
            title: Set(o.title.clone()),
            discount_kind: Set(o.discount.kind.as_str().to_owned()),
            discount_value: Set(o.discount.value),
            discount_cap: Set(o.discount.cap),
            starts_at: Set(o.starts_at),
            ends_at: Set(o.ends_at),
            created_at: Set(o.created_at),
            updated_at: Set(o.updated_at),
            deleted_at: Set(None),
        };
        offer::Entity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(o)
    }

    async fn offer_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Offer>, DomainError> {
        let found = offer::Entity::find()
            .filter(offer::Column::Id.eq(id))
            .filter(offer::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        found.map(Offer::try_from).transpose()
    }

    async fn offer_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        o: Offer,
    ) -> Result<Offer, DomainError> {
        let patch = offer::ActiveModel {
            title: Set(o.title.clone()),
            discount_kind: Set(o.discount.kind.as_str().to_owned()),
            discount_value: Set(o.discount.value),
            discount_cap: Set(o.discount.cap),
            starts_at: Set(o.starts_at),
            ends_at: Set(o.ends_at),
            updated_at: Set(o.updated_at),
            ..Default::default()
        };
        offer::Entity::update_many()
            .set(patch)
            .filter(offer::Column::Id.eq(o.id))
            .filter(offer::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(o)
    }

    async fn offer_soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let patch = offer::ActiveModel {
            deleted_at: Set(Some(deleted_at)),
            updated_at: Set(deleted_at),
            ..Default::default()
        };
        let result = offer::Entity::update_many()
            .set(patch)
            .filter(offer::Column::Id.eq(id))
            .filter(offer::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn offer_list_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Offer>, DomainError> {
        let rows = offer::Entity::find()
            .filter(offer::Column::BranchId.eq(branch_id))
            .filter(offer::Column::DeletedAt.is_null())
            .filter(offer::Column::EndsAt.gt(now))
            .order_by_asc(offer::Column::StartsAt)
            .order_by_asc(offer::Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        rows.into_iter().map(Offer::try_from).collect()
    }
}
