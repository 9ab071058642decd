//! Entity ↔ domain model conversions.
//!
//! This is the persistence boundary for the polymorphic reference: rows are
//! flattened discriminant + nullable columns, domain values are sum types.
//! A stored row that fails reconstruction is a data-integrity fault and
//! surfaces as a database error, never as a validation error.

use crate::domain::error::DomainError;
use crate::domain::model::{
    Branch, Discount, DiscountKind, Favorite, MenuItem, Offer, RegistrationStatus, Review,
    ReviewLike, ReviewReply, Vendor,
};
use crate::domain::target::{FavoriteTarget, ReviewTarget, TargetFields, TargetKind};

use super::entity;

impl TryFrom<entity::vendor::Model> for Vendor {
    type Error = DomainError;

    fn try_from(m: entity::vendor::Model) -> Result<Self, Self::Error> {
        let status = RegistrationStatus::try_from(m.status.as_str())
            .map_err(|e| DomainError::database(format!("vendors.status: {e}")))?;
        Ok(Vendor {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl From<entity::branch::Model> for Branch {
    fn from(m: entity::branch::Model) -> Self {
        Branch {
            id: m.id,
            vendor_id: m.vendor_id,
            name: m.name,
            address: m.address,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<entity::menu_item::Model> for MenuItem {
    fn from(m: entity::menu_item::Model) -> Self {
        MenuItem {
            id: m.id,
            branch_id: m.branch_id,
            name: m.name,
            price: m.price,
            description: m.description,
            image_path: m.image_path,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl TryFrom<entity::offer::Model> for Offer {
    type Error = DomainError;

    fn try_from(m: entity::offer::Model) -> Result<Self, Self::Error> {
        let kind = DiscountKind::try_from(m.discount_kind.as_str())
            .map_err(|e| DomainError::database(format!("offers.discount_kind: {e}")))?;
        Ok(Offer {
            id: m.id,
            branch_id: m.branch_id,
            title: m.title,
            discount: Discount {
                kind,
                value: m.discount_value,
                cap: m.discount_cap,
            },
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

fn target_fields(
    branch_id: Option<uuid::Uuid>,
    menu_item_id: Option<uuid::Uuid>,
    offer_id: Option<uuid::Uuid>,
) -> TargetFields {
    TargetFields {
        branch_id,
        menu_item_id,
        offer_id,
    }
}

impl TryFrom<entity::favorite::Model> for Favorite {
    type Error = DomainError;

    fn try_from(m: entity::favorite::Model) -> Result<Self, Self::Error> {
        let kind = TargetKind::try_from(m.target_type.as_str())
            .map_err(|e| DomainError::database(format!("favorites.target_type: {e}")))?;
        let target = FavoriteTarget::from_parts(
            kind,
            target_fields(m.branch_id, m.menu_item_id, m.offer_id),
        )
        .map_err(|_| {
            DomainError::database(format!(
                "favorites row {} violates the exactly-one-of reference invariant",
                m.id
            ))
        })?;
        Ok(Favorite {
            id: m.id,
            user_id: m.user_id,
            target,
            created_at: m.created_at,
        })
    }
}

impl TryFrom<entity::review::Model> for Review {
    type Error = DomainError;

    fn try_from(m: entity::review::Model) -> Result<Self, Self::Error> {
        let kind = TargetKind::try_from(m.target_type.as_str())
            .map_err(|e| DomainError::database(format!("reviews.target_type: {e}")))?;
        let target = ReviewTarget::from_parts(
            kind,
            target_fields(m.branch_id, m.menu_item_id, m.offer_id),
        )
        .map_err(|_| {
            DomainError::database(format!(
                "reviews row {} violates the exactly-one-of reference invariant",
                m.id
            ))
        })?;
        Ok(Review {
            id: m.id,
            user_id: m.user_id,
            target,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl From<entity::review_reply::Model> for ReviewReply {
    fn from(m: entity::review_reply::Model) -> Self {
        ReviewReply {
            id: m.id,
            review_id: m.review_id,
            user_id: m.user_id,
            comment: m.comment,
            from_vendor: m.from_vendor,
            created_at: m.created_at,
        }
    }
}

impl From<entity::review_like::Model> for ReviewLike {
    fn from(m: entity::review_like::Model) -> Self {
        ReviewLike {
            review_id: m.review_id,
            user_id: m.user_id,
            is_liked: m.is_liked,
            updated_at: m.updated_at,
        }
    }
}
