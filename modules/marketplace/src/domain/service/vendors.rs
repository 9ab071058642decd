use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{NewVendor, Principal, RegistrationStatus, Role, Vendor};
use crate::domain::ports::{ChangeEvent, EventKind, Notifier};
use crate::domain::repos::VendorsRepository;
use crate::domain::service::ServiceConfig;

/// Vendor registration and admin approval workflow.
pub struct VendorsService<VR: VendorsRepository> {
    db: DatabaseConnection,
    repo: Arc<VR>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

impl<VR: VendorsRepository> VendorsService<VR> {
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<VR>,
        notifier: Arc<dyn Notifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            repo,
            notifier,
            config,
        }
    }

    /// Register a vendor for the calling user. Status starts as pending and
    /// only an admin can move it from there.
    #[instrument(skip(self, principal, new_vendor), fields(user_id = %principal.user_id))]
    pub async fn register(
        &self,
        principal: &Principal,
        new_vendor: NewVendor,
    ) -> Result<Vendor, DomainError> {
        principal.require_role(&[Role::Vendor])?;
        self.validate_name(&new_vendor.name)?;

        tracing::info!("Registering vendor");

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        if self
            .repo
            .find_by_user(&txn, principal.user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::validation(
                "user_id",
                "a vendor is already registered for this user",
            ));
        }

        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::now_v7(),
            user_id: principal.user_id,
            name: new_vendor.name,
            status: RegistrationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.insert(&txn, vendor).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::VendorRegistered, &created));

        tracing::info!(vendor_id = %created.id, "Successfully registered vendor");
        Ok(created)
    }

    /// The calling user's own vendor record.
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn my_vendor(&self, principal: &Principal) -> Result<Vendor, DomainError> {
        principal.require_role(&[Role::Vendor])?;

        self.repo
            .find_by_user(&self.db, principal.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vendor", principal.user_id))
    }

    #[instrument(skip(self, principal))]
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Vendor>, DomainError> {
        principal.require_role(&[Role::Admin])?;
        self.repo.list(&self.db).await
    }

    /// Admin status transition. `pending` is the registration-time state and
    /// cannot be re-entered.
    #[instrument(skip(self, principal), fields(vendor_id = %vendor_id, status = status.as_str()))]
    pub async fn set_status(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Vendor, DomainError> {
        principal.require_role(&[Role::Admin])?;

        if status == RegistrationStatus::Pending {
            return Err(DomainError::validation(
                "status",
                "cannot reset a vendor to pending",
            ));
        }

        tracing::info!("Updating vendor registration status");

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        let updated = self
            .repo
            .set_status(&txn, vendor_id, status, Utc::now())
            .await?;
        if !updated {
            return Err(DomainError::not_found("vendor", vendor_id));
        }

        let vendor = self
            .repo
            .find(&txn, vendor_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vendor", vendor_id))?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::VendorStatusChanged, &vendor));

        tracing::info!("Successfully updated vendor status");
        Ok(vendor)
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        if name.len() > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!("exceeds maximum length of {}", self.config.max_name_length),
            ));
        }
        Ok(())
    }
}
