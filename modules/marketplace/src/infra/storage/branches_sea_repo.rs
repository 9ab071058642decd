use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Branch;
use crate::domain::repos::BranchesRepository;

use super::entity::branch::{ActiveModel, Column, Entity as BranchEntity};

/// ORM-based implementation of the `BranchesRepository` trait.
#[derive(Clone, Default)]
pub struct SeaBranchesRepository;

impl SeaBranchesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BranchesRepository for SeaBranchesRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch: Branch,
    ) -> Result<Branch, DomainError> {
        let m = ActiveModel {
            id: Set(branch.id),
            vendor_id: Set(branch.vendor_id),
            name: Set(branch.name.clone()),
            address: Set(branch.address.clone()),
            latitude: Set(branch.latitude),
            longitude: Set(branch.longitude),
            created_at: Set(branch.created_at),
            updated_at: Set(branch.updated_at),
            deleted_at: Set(None),
        };
        BranchEntity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(branch)
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Branch>, DomainError> {
        let found = BranchEntity::find()
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(found.map(Branch::from))
    }

    async fn list_by_vendor<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor_id: Uuid,
    ) -> Result<Vec<Branch>, DomainError> {
        let rows = BranchEntity::find()
            .filter(Column::VendorId.eq(vendor_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(rows.into_iter().map(Branch::from).collect())
    }

    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch: Branch,
    ) -> Result<Branch, DomainError> {
        let patch = ActiveModel {
            name: Set(branch.name.clone()),
            address: Set(branch.address.clone()),
            latitude: Set(branch.latitude),
            longitude: Set(branch.longitude),
            updated_at: Set(branch.updated_at),
            ..Default::default()
        };
        BranchEntity::update_many()
            .set(patch)
            .filter(Column::Id.eq(branch.id))
            .filter(Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(branch)
    }

    async fn soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let patch = ActiveModel {
            deleted_at: Set(Some(deleted_at)),
            updated_at: Set(deleted_at),
            ..Default::default()
        };
        let result = BranchEntity::update_many()
            .set(patch)
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }
}
