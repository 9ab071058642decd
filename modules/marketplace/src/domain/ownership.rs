//! Ownership resolver: establishes that a principal administers a given
//! vendor, branch or review before a mutation is allowed.
//!
//! Every check is a plain read against current state - no caching, so a
//! suspension or ownership change is visible to the very next request.
//!
//! NotFound vs Forbidden is deliberate: an absent resource is reported as
//! NotFound (leaking nothing about other tenants), while Forbidden is
//! reserved for resources that are visibly present but not administered by
//! the caller.

use std::sync::Arc;

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Branch, RegistrationStatus, Review, Vendor};
use crate::domain::repos::{
    BranchesRepository, CatalogRepository, ReviewsRepository, VendorsRepository,
};
use crate::domain::target::ReviewTarget;

pub struct OwnershipResolver<VR, BR, CR, RR> {
    vendors: Arc<VR>,
    branches: Arc<BR>,
    catalog: Arc<CR>,
    reviews: Arc<RR>,
}

impl<VR, BR, CR, RR> OwnershipResolver<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    pub fn new(
        vendors: Arc<VR>,
        branches: Arc<BR>,
        catalog: Arc<CR>,
        reviews: Arc<RR>,
    ) -> Self {
        Self {
            vendors,
            branches,
            catalog,
            reviews,
        }
    }

    /// The vendor exists and is owned by `user_id`, whatever its status.
    pub async fn vendor_owned<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vendor, DomainError> {
        let vendor = self
            .vendors
            .find(conn, vendor_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vendor", vendor_id))?;

        if vendor.user_id != user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(vendor)
    }

    /// The vendor exists, is owned by `user_id`, and is currently approved.
    pub async fn vendor_owned_and_approved<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vendor, DomainError> {
        let vendor = self.vendor_owned(conn, vendor_id, user_id).await?;
        if vendor.status != RegistrationStatus::Approved {
            return Err(DomainError::Forbidden);
        }
        Ok(vendor)
    }

    /// The branch exists and belongs to the given vendor.
    pub async fn branch_belongs_to_vendor<C: ConnectionTrait>(
        &self,
        conn: &C,
        branch_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<Branch, DomainError> {
        let branch = self
            .branches
            .find(conn, branch_id)
            .await?
            .ok_or_else(|| DomainError::not_found("branch", branch_id))?;

        if branch.vendor_id != vendor_id {
            return Err(DomainError::Forbidden);
        }
        Ok(branch)
    }

    /// The review's target traces (through its branch) to a vendor owned by
    /// `user_id`. Used to authorize vendor replies.
    pub async fn review_reachable_by_vendor<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Review, DomainError> {
        let review = self
            .reviews
            .find(conn, review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("review", review_id))?;

        let branch_id = match review.target {
            ReviewTarget::Branch(id) | ReviewTarget::Overall(id) => id,
            ReviewTarget::MenuItem(item_id) => {
                self.catalog
                    .menu_find(conn, item_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("menu item", item_id))?
                    .branch_id
            }
            ReviewTarget::Offer(offer_id) => {
                self.catalog
                    .offer_find(conn, offer_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("offer", offer_id))?
                    .branch_id
            }
        };

        let branch = self
            .branches
            .find(conn, branch_id)
            .await?
            .ok_or_else(|| DomainError::not_found("branch", branch_id))?;

        let vendor = self
            .vendors
            .find(conn, branch.vendor_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vendor", branch.vendor_id))?;

        if vendor.user_id != user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(review)
    }
}
