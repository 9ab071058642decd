#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::api::rest::ConcreteServices;
use crate::domain::error::DomainError;
use crate::domain::model::{
    Branch, Discount, DiscountKind, NewMenuItem, NewOffer, Principal, ReviewPatch, Role,
};
use crate::domain::ports::NullNotifier;
use crate::domain::target::{ReviewTarget, TargetFields, TargetKind};
use crate::infra::storage::entity::review_like;
use crate::test_support::{
    build_services, inmem_db, principal, seed_approved_vendor, seed_branch,
};

fn branch_fields(id: Uuid) -> TargetFields {
    TargetFields {
        branch_id: Some(id),
        ..TargetFields::default()
    }
}

async fn seed_vendor_branch(services: &ConcreteServices) -> (Principal, Uuid, Branch) {
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(services, &owner).await;
    let branch = seed_branch(services, &owner, vendor.id).await;
    (owner, vendor.id, branch)
}

// =========================================================================
// create / validation
// =========================================================================

#[tokio::test]
async fn customer_reviews_a_branch() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(
            &customer,
            TargetKind::Branch,
            branch_fields(branch.id),
            4,
            Some("Solid".to_owned()),
        )
        .await
        .unwrap();

    assert_eq!(review.target, ReviewTarget::Branch(branch.id));
    assert_eq!(review.rating, 4);
}

#[tokio::test]
async fn rating_outside_bounds_is_rejected() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;

    for rating in [0, 6] {
        let err = services
            .reviews
            .create(
                &principal(Role::Customer),
                TargetKind::Branch,
                branch_fields(branch.id),
                rating,
                None,
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Validation { ref field, .. } if field == "rating"),
            "rating {rating} should be rejected"
        );
    }
}

#[tokio::test]
async fn menu_item_review_rejects_extra_reference_fields() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (owner, vendor_id, branch) = seed_vendor_branch(&services).await;
    let item = services
        .catalog
        .create_menu_item(
            &owner,
            vendor_id,
            branch.id,
            NewMenuItem {
                name: "Burger".to_owned(),
                price: Decimal::from_str("9.5").unwrap(),
                description: None,
                image_path: None,
            },
        )
        .await
        .unwrap();

    // The discriminant names menu_item_id; any other populated field conflicts.
    let err = services
        .reviews
        .create(
            &principal(Role::Customer),
            TargetKind::MenuItem,
            TargetFields {
                branch_id: Some(branch.id),
                menu_item_id: Some(item.id),
                offer_id: None,
            },
            4,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "branch_id"));

    // Exactly the named field passes.
    let review = services
        .reviews
        .create(
            &principal(Role::Customer),
            TargetKind::MenuItem,
            TargetFields {
                menu_item_id: Some(item.id),
                ..TargetFields::default()
            },
            4,
            None,
        )
        .await
        .unwrap();
    assert_eq!(review.target, ReviewTarget::MenuItem(item.id));
}

#[tokio::test]
async fn overall_review_rides_on_the_branch_reference() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(
            &customer,
            TargetKind::Overall,
            branch_fields(branch.id),
            5,
            None,
        )
        .await
        .unwrap();
    assert_eq!(review.target, ReviewTarget::Overall(branch.id));

    // Overall and plain branch reviews are distinct listings.
    let overall = services
        .reviews
        .list_by_target(TargetKind::Overall, branch.id)
        .await
        .unwrap();
    assert_eq!(overall.len(), 1);
    let plain = services
        .reviews
        .list_by_target(TargetKind::Branch, branch.id)
        .await
        .unwrap();
    assert!(plain.is_empty());
}

// =========================================================================
// author-scoped edit / delete
// =========================================================================

#[tokio::test]
async fn author_edits_own_review() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(&customer, TargetKind::Branch, branch_fields(branch.id), 3, None)
        .await
        .unwrap();

    let updated = services
        .reviews
        .update(
            &customer,
            review.id,
            ReviewPatch {
                rating: Some(5),
                comment: Some("Got better".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, 5);
    assert_eq!(updated.comment.as_deref(), Some("Got better"));
}

#[tokio::test]
async fn non_author_edit_is_forbidden_and_absent_review_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let author = principal(Role::Customer);
    let other = principal(Role::Customer);

    let review = services
        .reviews
        .create(&author, TargetKind::Branch, branch_fields(branch.id), 3, None)
        .await
        .unwrap();

    let err = services
        .reviews
        .update(
            &other,
            review.id,
            ReviewPatch {
                rating: Some(1),
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = services
        .reviews
        .update(
            &other,
            Uuid::new_v4(),
            ReviewPatch {
                rating: Some(1),
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn deleted_review_disappears_from_listing() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(&customer, TargetKind::Branch, branch_fields(branch.id), 3, None)
        .await
        .unwrap();
    services.reviews.delete(&customer, review.id).await.unwrap();

    let listed = services
        .reviews
        .list_by_target(TargetKind::Branch, branch.id)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

// =========================================================================
// replies
// =========================================================================

#[tokio::test]
async fn owning_vendor_replies_to_branch_review() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (owner, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(&customer, TargetKind::Branch, branch_fields(branch.id), 2, None)
        .await
        .unwrap();

    let reply = services
        .reviews
        .create_reply(&owner, review.id, "Sorry to hear - come again".to_owned())
        .await
        .unwrap();
    assert!(reply.from_vendor);
    assert_eq!(reply.review_id, review.id);
}

#[tokio::test]
async fn vendor_reply_reaches_through_menu_item_and_offer_targets() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (owner, vendor_id, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let item = services
        .catalog
        .create_menu_item(
            &owner,
            vendor_id,
            branch.id,
            NewMenuItem {
                name: "Burger".to_owned(),
                price: Decimal::from_str("9.5").unwrap(),
                description: None,
                image_path: None,
            },
        )
        .await
        .unwrap();
    let now = Utc::now();
    let offer = services
        .catalog
        .create_offer(
            &owner,
            vendor_id,
            branch.id,
            NewOffer {
                title: "Two for one".to_owned(),
                discount: Discount {
                    kind: DiscountKind::Flat,
                    value: Decimal::from(5),
                    cap: None,
                },
                starts_at: now,
                ends_at: now + Duration::days(7),
            },
        )
        .await
        .unwrap();

    let item_review = services
        .reviews
        .create(
            &customer,
            TargetKind::MenuItem,
            TargetFields {
                menu_item_id: Some(item.id),
                ..TargetFields::default()
            },
            4,
            None,
        )
        .await
        .unwrap();
    let offer_review = services
        .reviews
        .create(
            &customer,
            TargetKind::Offer,
            TargetFields {
                offer_id: Some(offer.id),
                ..TargetFields::default()
            },
            4,
            None,
        )
        .await
        .unwrap();

    for review_id in [item_review.id, offer_review.id] {
        let reply = services
            .reviews
            .create_reply(&owner, review_id, "Thanks!".to_owned())
            .await
            .unwrap();
        assert!(reply.from_vendor);
    }
}

#[tokio::test]
async fn foreign_vendor_cannot_reply() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let customer = principal(Role::Customer);

    let review = services
        .reviews
        .create(&customer, TargetKind::Branch, branch_fields(branch.id), 2, None)
        .await
        .unwrap();

    // A vendor with no vendor record at all.
    let stranger = principal(Role::Vendor);
    let err = services
        .reviews
        .create_reply(&stranger, review.id, "Hi".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    // A vendor owning an unrelated vendor record.
    let other_owner = principal(Role::Vendor);
    seed_approved_vendor(&services, &other_owner).await;
    let err = services
        .reviews
        .create_reply(&other_owner, review.id, "Hi".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn review_author_replies_but_other_customers_cannot() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let author = principal(Role::Customer);
    let other = principal(Role::Customer);

    let review = services
        .reviews
        .create(&author, TargetKind::Branch, branch_fields(branch.id), 2, None)
        .await
        .unwrap();

    let reply = services
        .reviews
        .create_reply(&author, review.id, "Clarifying my point".to_owned())
        .await
        .unwrap();
    assert!(!reply.from_vendor);

    let err = services
        .reviews
        .create_reply(&other, review.id, "Me too".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn reply_listing_requires_existing_review() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services.reviews.list_replies(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "review", .. }));
}

// =========================================================================
// likes (upsert semantics)
// =========================================================================

async fn like_row_count(db: &DatabaseConnection, review_id: Uuid) -> u64 {
    review_like::Entity::find()
        .filter(review_like::Column::ReviewId.eq(review_id))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn like_then_dislike_leaves_one_row_with_latest_value() {
    let db = inmem_db().await;
    let services = build_services(db.clone(), Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let author = principal(Role::Customer);
    let voter = principal(Role::Customer);

    let review = services
        .reviews
        .create(&author, TargetKind::Branch, branch_fields(branch.id), 4, None)
        .await
        .unwrap();

    let first = services.reviews.like(&voter, review.id, true).await.unwrap();
    assert!(first.is_liked);

    let second = services.reviews.like(&voter, review.id, false).await.unwrap();
    assert!(!second.is_liked);

    assert_eq!(like_row_count(&db, review.id).await, 1);
}

#[tokio::test]
async fn likes_from_different_users_accumulate() {
    let db = inmem_db().await;
    let services = build_services(db.clone(), Arc::new(NullNotifier));
    let (_, _, branch) = seed_vendor_branch(&services).await;
    let author = principal(Role::Customer);

    let review = services
        .reviews
        .create(&author, TargetKind::Branch, branch_fields(branch.id), 4, None)
        .await
        .unwrap();

    for _ in 0..3 {
        let voter = principal(Role::Customer);
        services.reviews.like(&voter, review.id, true).await.unwrap();
    }
    assert_eq!(like_row_count(&db, review.id).await, 3);
}

#[tokio::test]
async fn like_on_unknown_review_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .reviews
        .like(&principal(Role::Customer), Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "review", .. }));
}
