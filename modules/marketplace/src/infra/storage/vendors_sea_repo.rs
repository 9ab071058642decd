use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{RegistrationStatus, Vendor};
use crate::domain::repos::VendorsRepository;

use super::entity::vendor::{ActiveModel, Column, Entity as VendorEntity};

/// ORM-based implementation of the `VendorsRepository` trait.
#[derive(Clone, Default)]
pub struct SeaVendorsRepository;

impl SeaVendorsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VendorsRepository for SeaVendorsRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor: Vendor,
    ) -> Result<Vendor, DomainError> {
        let m = ActiveModel {
            id: Set(vendor.id),
            user_id: Set(vendor.user_id),
            name: Set(vendor.name.clone()),
            status: Set(vendor.status.as_str().to_owned()),
            created_at: Set(vendor.created_at),
            updated_at: Set(vendor.updated_at),
            deleted_at: Set(None),
        };
        VendorEntity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(vendor)
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Vendor>, DomainError> {
        let found = VendorEntity::find()
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        found.map(Vendor::try_from).transpose()
    }

    async fn find_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Option<Vendor>, DomainError> {
        let found = VendorEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        found.map(Vendor::try_from).transpose()
    }

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Vendor>, DomainError> {
        let rows = VendorEntity::find()
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        rows.into_iter().map(Vendor::try_from).collect()
    }

    async fn set_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        status: RegistrationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let patch = ActiveModel {
            status: Set(status.as_str().to_owned()),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        let result = VendorEntity::update_many()
            .set(patch)
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }
}
