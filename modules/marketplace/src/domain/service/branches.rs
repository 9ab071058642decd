use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Branch, BranchPatch, NewBranch, Principal, Role};
use crate::domain::ownership::OwnershipResolver;
use crate::domain::ports::{ChangeEvent, EventKind, Notifier};
use crate::domain::repos::{
    BranchesRepository, CatalogRepository, ReviewsRepository, VendorsRepository,
};
use crate::domain::service::ServiceConfig;

/// Branch management. Approval gates creation only; editing and deleting an
/// existing branch needs ownership alone, so a suspended vendor keeps
/// administering what it already has.
pub struct BranchesService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    db: DatabaseConnection,
    repo: Arc<BR>,
    ownership: Arc<OwnershipResolver<VR, BR, CR, RR>>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

impl<VR, BR, CR, RR> BranchesService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<BR>,
        ownership: Arc<OwnershipResolver<VR, BR, CR, RR>>,
        notifier: Arc<dyn Notifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            repo,
            ownership,
            notifier,
            config,
        }
    }

    /// Create a branch under an approved, caller-owned vendor.
    ///
    /// The ownership read and the insert share one transaction so an
    /// in-flight suspension cannot slip between them.
    #[instrument(skip(self, principal, new_branch), fields(vendor_id = %vendor_id, user_id = %principal.user_id))]
    pub async fn create(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        new_branch: NewBranch,
    ) -> Result<Branch, DomainError> {
        principal.require_role(&[Role::Vendor])?;
        self.validate_name(&new_branch.name)?;
        Self::validate_coordinates(new_branch.latitude, new_branch.longitude)?;

        tracing::info!("Creating branch");

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;

        let now = Utc::now();
        let branch = Branch {
            id: Uuid::now_v7(),
            vendor_id,
            name: new_branch.name,
            address: new_branch.address,
            latitude: new_branch.latitude,
            longitude: new_branch.longitude,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.insert(&txn, branch).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::BranchCreated, &created));

        tracing::info!(branch_id = %created.id, "Successfully created branch");
        Ok(created)
    }

    /// Public branch listing for a vendor.
    #[instrument(skip(self), fields(vendor_id = %vendor_id))]
    pub async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Branch>, DomainError> {
        self.repo.list_by_vendor(&self.db, vendor_id).await
    }

    #[instrument(skip(self, principal, patch), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
    pub async fn update(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        patch: BranchPatch,
    ) -> Result<Branch, DomainError> {
        principal.require_role(&[Role::Vendor])?;

        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned(&txn, vendor_id, principal.user_id)
            .await?;
        let mut branch = self
            .ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        if let Some(name) = patch.name {
            branch.name = name;
        }
        if let Some(address) = patch.address {
            branch.address = address;
        }
        if let Some(latitude) = patch.latitude {
            branch.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            branch.longitude = longitude;
        }
        Self::validate_coordinates(branch.latitude, branch.longitude)?;
        branch.updated_at = Utc::now();

        let updated = self.repo.update(&txn, branch).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::BranchUpdated, &updated));

        tracing::info!("Successfully updated branch");
        Ok(updated)
    }

    #[instrument(skip(self, principal), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
    pub async fn delete(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
    ) -> Result<(), DomainError> {
        principal.require_role(&[Role::Vendor])?;

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let deleted = self.repo.soft_delete(&txn, branch_id, Utc::now()).await?;
        if !deleted {
            return Err(DomainError::not_found("branch", branch_id));
        }
        txn.commit().await.map_err(DomainError::from)?;

        tracing::info!("Successfully deleted branch");
        Ok(())
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

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation(
                "latitude",
                "must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(
                "longitude",
                "must be between -180 and 180",
            ));
        }
        Ok(())
    }
}
