use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Discount, DiscountKind, MenuFilter, MenuItem, MenuItemPatch, NewMenuItem, NewOffer, Offer,
    OfferPatch, Principal, Role,
};
use crate::domain::ownership::OwnershipResolver;
use crate::domain::ports::{ChangeEvent, EventKind, Notifier};
use crate::domain::repos::{
    BranchesRepository, CatalogRepository, ReviewsRepository, VendorsRepository,
};
use crate::domain::service::ServiceConfig;

/// Menu items and promotional offers under a branch.
///
/// Every mutation is gated by `vendor_owned_and_approved` plus
/// `branch_belongs_to_vendor`; listings are public.
pub struct CatalogService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    db: DatabaseConnection,
    repo: Arc<CR>,
    ownership: Arc<OwnershipResolver<VR, BR, CR, RR>>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

impl<VR, BR, CR, RR> CatalogService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<CR>,
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

    #[instrument(skip(self, principal, new_item), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
    pub async fn create_menu_item(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        new_item: NewMenuItem,
    ) -> Result<MenuItem, DomainError> {
        principal.require_role(&[Role::Vendor])?;
        self.validate_name(&new_item.name)?;
        Self::validate_price(new_item.price)?;

        tracing::info!("Creating menu item");

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::now_v7(),
            branch_id,
            name: new_item.name,
            price: new_item.price,
            description: new_item.description,
            image_path: new_item.image_path,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.menu_insert(&txn, item).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::MenuItemCreated, &created));

        tracing::info!(item_id = %created.id, "Successfully created menu item");
        Ok(created)
    }

    #[instrument(skip(self, principal, patch), fields(branch_id = %branch_id, item_id = %item_id))]
    pub async fn update_menu_item(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        item_id: Uuid,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, DomainError> {
        principal.require_role(&[Role::Vendor])?;

        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }
        if let Some(price) = patch.price {
            Self::validate_price(price)?;
        }

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let mut item = self
            .repo
            .menu_find(&txn, item_id)
            .await?
            .filter(|item| item.branch_id == branch_id)
            .ok_or_else(|| DomainError::not_found("menu item", item_id))?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(description) = patch.description {
            item.description = Some(description);
        }
        item.updated_at = Utc::now();

        let updated = self.repo.menu_update(&txn, item).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::MenuItemUpdated, &updated));

        tracing::info!("Successfully updated menu item");
        Ok(updated)
    }

    #[instrument(skip(self, principal), fields(branch_id = %branch_id, item_id = %item_id))]
    pub async fn delete_menu_item(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), DomainError> {
        principal.require_role(&[Role::Vendor])?;

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let item = self
            .repo
            .menu_find(&txn, item_id)
            .await?
            .filter(|item| item.branch_id == branch_id)
            .ok_or_else(|| DomainError::not_found("menu item", item_id))?;

        self.repo.menu_soft_delete(&txn, item.id, Utc::now()).await?;
        txn.commit().await.map_err(DomainError::from)?;

        tracing::info!("Successfully deleted menu item");
        Ok(())
    }

    /// Public menu listing with optional substring search and price bounds.
    #[instrument(skip(self, filter), fields(branch_id = %branch_id))]
    pub async fn list_menu(
        &self,
        branch_id: Uuid,
        filter: MenuFilter,
    ) -> Result<Vec<MenuItem>, DomainError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(DomainError::validation(
                    "min_price",
                    "must not exceed max_price",
                ));
            }
        }
        self.repo.menu_list(&self.db, branch_id, &filter).await
    }

    #[instrument(skip(self, principal, new_offer), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
    pub async fn create_offer(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        new_offer: NewOffer,
    ) -> Result<Offer, DomainError> {
        principal.require_role(&[Role::Vendor])?;
        self.validate_title(&new_offer.title)?;
        Self::validate_discount(&new_offer.discount)?;
        Self::validate_window(new_offer.starts_at, new_offer.ends_at)?;

        tracing::info!("Creating offer");

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let now = Utc::now();
        let offer = Offer {
            id: Uuid::now_v7(),
            branch_id,
            title: new_offer.title,
            discount: new_offer.discount,
            starts_at: new_offer.starts_at,
            ends_at: new_offer.ends_at,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.offer_insert(&txn, offer).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::OfferCreated, &created));

        tracing::info!(offer_id = %created.id, "Successfully created offer");
        Ok(created)
    }

    #[instrument(skip(self, principal, patch), fields(branch_id = %branch_id, offer_id = %offer_id))]
    pub async fn update_offer(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        offer_id: Uuid,
        patch: OfferPatch,
    ) -> Result<Offer, DomainError> {
        principal.require_role(&[Role::Vendor])?;

        if let Some(ref title) = patch.title {
            self.validate_title(title)?;
        }
        if let Some(ref discount) = patch.discount {
            Self::validate_discount(discount)?;
        }

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let mut offer = self
            .repo
            .offer_find(&txn, offer_id)
            .await?
            .filter(|offer| offer.branch_id == branch_id)
            .ok_or_else(|| DomainError::not_found("offer", offer_id))?;

        if let Some(title) = patch.title {
            offer.title = title;
        }
        if let Some(discount) = patch.discount {
            offer.discount = discount;
        }
        if let Some(starts_at) = patch.starts_at {
            offer.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            offer.ends_at = ends_at;
        }
        Self::validate_window(offer.starts_at, offer.ends_at)?;
        offer.updated_at = Utc::now();

        let updated = self.repo.offer_update(&txn, offer).await?;
        txn.commit().await.map_err(DomainError::from)?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::OfferUpdated, &updated));

        tracing::info!("Successfully updated offer");
        Ok(updated)
    }

    #[instrument(skip(self, principal), fields(branch_id = %branch_id, offer_id = %offer_id))]
    pub async fn delete_offer(
        &self,
        principal: &Principal,
        vendor_id: Uuid,
        branch_id: Uuid,
        offer_id: Uuid,
    ) -> Result<(), DomainError> {
        principal.require_role(&[Role::Vendor])?;

        let txn = self.db.begin().await.map_err(DomainError::from)?;

        self.ownership
            .vendor_owned_and_approved(&txn, vendor_id, principal.user_id)
            .await?;
        self.ownership
            .branch_belongs_to_vendor(&txn, branch_id, vendor_id)
            .await?;

        let offer = self
            .repo
            .offer_find(&txn, offer_id)
            .await?
            .filter(|offer| offer.branch_id == branch_id)
            .ok_or_else(|| DomainError::not_found("offer", offer_id))?;

        self.repo
            .offer_soft_delete(&txn, offer.id, Utc::now())
            .await?;
        txn.commit().await.map_err(DomainError::from)?;

        tracing::info!("Successfully deleted offer");
        Ok(())
    }

    /// Public listing of offers whose validity window is still open.
    #[instrument(skip(self), fields(branch_id = %branch_id))]
    pub async fn list_active_offers(&self, branch_id: Uuid) -> Result<Vec<Offer>, DomainError> {
        self.repo
            .offer_list_active(&self.db, branch_id, Utc::now())
            .await
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

    fn validate_title(&self, title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "cannot be empty"));
        }
        if title.len() > self.config.max_name_length {
            return Err(DomainError::validation(
                "title",
                format!("exceeds maximum length of {}", self.config.max_name_length),
            ));
        }
        Ok(())
    }

    fn validate_price(price: Decimal) -> Result<(), DomainError> {
        if price <= Decimal::ZERO {
            return Err(DomainError::validation("price", "must be greater than zero"));
        }
        Ok(())
    }

    fn validate_discount(discount: &Discount) -> Result<(), DomainError> {
        if discount.value <= Decimal::ZERO {
            return Err(DomainError::validation(
                "discount.value",
                "must be greater than zero",
            ));
        }
        if discount.kind == DiscountKind::Percentage && discount.value > Decimal::from(100) {
            return Err(DomainError::validation(
                "discount.value",
                "percentage discount cannot exceed 100",
            ));
        }
        if let Some(cap) = discount.cap {
            if cap <= Decimal::ZERO {
                return Err(DomainError::validation(
                    "discount.cap",
                    "must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    fn validate_window(
        starts_at: chrono::DateTime<Utc>,
        ends_at: chrono::DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if starts_at >= ends_at {
            return Err(DomainError::validation(
                "ends_at",
                "must be strictly after starts_at",
            ));
        }
        Ok(())
    }
}
