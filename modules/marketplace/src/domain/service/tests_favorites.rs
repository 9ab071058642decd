#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Role;
use crate::domain::ports::NullNotifier;
use crate::domain::target::{FavoriteTarget, TargetFields, TargetKind};
use crate::test_support::{
    build_services, inmem_db, principal, seed_approved_vendor, seed_branch,
};

fn branch_fields(id: Uuid) -> TargetFields {
    TargetFields {
        branch_id: Some(id),
        ..TargetFields::default()
    }
}

#[tokio::test]
async fn customer_favorites_a_branch() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;
    let customer = principal(Role::Customer);

    let favorite = services
        .favorites
        .create(&customer, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap();

    assert_eq!(favorite.user_id, customer.user_id);
    assert_eq!(favorite.target, FavoriteTarget::Branch(branch.id));
}

#[tokio::test]
async fn favorite_requires_customer_role() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .favorites
        .create(
            &principal(Role::Vendor),
            TargetKind::Branch,
            branch_fields(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn duplicate_favorite_is_rejected() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;
    let customer = principal(Role::Customer);

    services
        .favorites
        .create(&customer, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap();
    let err = services
        .favorites
        .create(&customer, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "target"));
}

#[tokio::test]
async fn same_target_can_be_favorited_by_different_users() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let first = principal(Role::Customer);
    let second = principal(Role::Customer);

    services
        .favorites
        .create(&first, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap();
    services
        .favorites
        .create(&second, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap();

    assert_eq!(services.favorites.list(&first).await.unwrap().len(), 1);
    assert_eq!(services.favorites.list(&second).await.unwrap().len(), 1);
}

#[tokio::test]
async fn conflicting_reference_fields_are_rejected() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let fields = TargetFields {
        branch_id: Some(Uuid::new_v4()),
        offer_id: Some(Uuid::new_v4()),
        menu_item_id: None,
    };
    let err = services
        .favorites
        .create(&principal(Role::Customer), TargetKind::Branch, fields)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "offer_id"));
}

#[tokio::test]
async fn overall_is_not_a_favorite_target() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .favorites
        .create(
            &principal(Role::Customer),
            TargetKind::Overall,
            branch_fields(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "type"));
}

#[tokio::test]
async fn delete_is_scoped_to_the_owner() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;
    let customer = principal(Role::Customer);
    let other = principal(Role::Customer);

    let favorite = services
        .favorites
        .create(&customer, TargetKind::Branch, branch_fields(branch.id))
        .await
        .unwrap();

    let err = services
        .favorites
        .delete(&other, favorite.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    services.favorites.delete(&customer, favorite.id).await.unwrap();
    assert!(services.favorites.list(&customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_unknown_favorite_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .favorites
        .delete(&principal(Role::Customer), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
