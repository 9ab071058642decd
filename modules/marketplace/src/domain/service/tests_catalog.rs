#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    BranchPatch, Discount, DiscountKind, MenuFilter, NewBranch, NewMenuItem, NewOffer,
    RegistrationStatus, Role,
};
use crate::domain::ports::NullNotifier;
use crate::test_support::{
    admin, build_services, inmem_db, principal, seed_approved_vendor, seed_branch,
};

fn burger(price: &str) -> NewMenuItem {
    NewMenuItem {
        name: "Burger".to_owned(),
        price: Decimal::from_str(price).unwrap(),
        description: Some("Flame-grilled".to_owned()),
        image_path: None,
    }
}

fn week_long_offer(title: &str) -> NewOffer {
    let now = Utc::now();
    NewOffer {
        title: title.to_owned(),
        discount: Discount {
            kind: DiscountKind::Percentage,
            value: Decimal::from(10),
            cap: None,
        },
        starts_at: now - Duration::days(1),
        ends_at: now + Duration::days(6),
    }
}

// =========================================================================
// Branch creation gates
// =========================================================================

#[tokio::test]
async fn approved_vendor_creates_branch() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;

    let branch = seed_branch(&services, &owner, vendor.id).await;
    assert_eq!(branch.vendor_id, vendor.id);
}

#[tokio::test]
async fn pending_vendor_cannot_create_branch() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = services
        .vendors
        .register(
            &owner,
            crate::domain::model::NewVendor {
                name: "Pending Vendor".to_owned(),
            },
        )
        .await
        .unwrap();

    let err = services
        .branches
        .create(
            &owner,
            vendor.id,
            NewBranch {
                name: "Main".to_owned(),
                address: "1 High Street".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn suspension_takes_effect_immediately() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    seed_branch(&services, &owner, vendor.id).await;

    services
        .vendors
        .set_status(&admin(), vendor.id, RegistrationStatus::Suspended)
        .await
        .unwrap();

    let err = services
        .branches
        .create(
            &owner,
            vendor.id,
            NewBranch {
                name: "Second".to_owned(),
                address: "2 High Street".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn suspended_owner_still_updates_and_deletes_existing_branches() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    services
        .vendors
        .set_status(&admin(), vendor.id, RegistrationStatus::Suspended)
        .await
        .unwrap();

    // Creation stays gated on approval.
    let err = services
        .branches
        .create(
            &owner,
            vendor.id,
            NewBranch {
                name: "New While Suspended".to_owned(),
                address: "3 High Street".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    // Existing branches remain the owner's to manage.
    let updated = services
        .branches
        .update(
            &owner,
            vendor.id,
            branch.id,
            BranchPatch {
                name: Some("Renamed".to_owned()),
                ..BranchPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");

    services
        .branches
        .delete(&owner, vendor.id, branch.id)
        .await
        .unwrap();
    assert!(services
        .branches
        .list_by_vendor(vendor.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn foreign_vendor_cannot_create_branch() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let intruder = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;

    let err = services
        .branches
        .create(
            &intruder,
            vendor.id,
            NewBranch {
                name: "Hijack".to_owned(),
                address: "1 High Street".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn branch_creation_on_unknown_vendor_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .branches
        .create(
            &principal(Role::Vendor),
            Uuid::new_v4(),
            NewBranch {
                name: "Ghost".to_owned(),
                address: "Nowhere".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "vendor", .. }));
}

// =========================================================================
// Menu items
// =========================================================================

#[tokio::test]
async fn owner_creates_menu_item() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let item = services
        .catalog
        .create_menu_item(&owner, vendor.id, branch.id, burger("9.5"))
        .await
        .unwrap();

    assert_eq!(item.name, "Burger");
    assert_eq!(item.price, Decimal::from_str("9.5").unwrap());
    assert_eq!(item.branch_id, branch.id);
}

#[tokio::test]
async fn foreign_vendor_cannot_create_menu_item() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let intruder = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let err = services
        .catalog
        .create_menu_item(&intruder, vendor.id, branch.id, burger("9.5"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn menu_item_under_foreign_branch_is_forbidden() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner_a = principal(Role::Vendor);
    let owner_b = principal(Role::Vendor);
    let vendor_a = seed_approved_vendor(&services, &owner_a).await;
    let vendor_b = seed_approved_vendor(&services, &owner_b).await;
    let branch_b = seed_branch(&services, &owner_b, vendor_b.id).await;

    // Vendor A is approved and owns vendor_a, but the branch belongs to B.
    let err = services
        .catalog
        .create_menu_item(&owner_a, vendor_a.id, branch_b.id, burger("9.5"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn menu_item_price_must_be_positive() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let err = services
        .catalog
        .create_menu_item(&owner, vendor.id, branch.id, burger("0"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "price"));
}

#[tokio::test]
async fn menu_item_on_unknown_branch_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;

    let err = services
        .catalog
        .create_menu_item(&owner, vendor.id, Uuid::new_v4(), burger("9.5"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "branch", .. }));
}

#[tokio::test]
async fn deleted_menu_item_disappears_from_listing() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let item = services
        .catalog
        .create_menu_item(&owner, vendor.id, branch.id, burger("9.5"))
        .await
        .unwrap();
    services
        .catalog
        .delete_menu_item(&owner, vendor.id, branch.id, item.id)
        .await
        .unwrap();

    let listed = services
        .catalog
        .list_menu(branch.id, MenuFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

// =========================================================================
// Menu listing filters
// =========================================================================

async fn seed_menu(services: &crate::api::rest::ConcreteServices) -> (uuid::Uuid, uuid::Uuid) {
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(services, &owner).await;
    let branch = seed_branch(services, &owner, vendor.id).await;

    for (name, price, description) in [
        ("Burger", "9.5", "Flame-grilled beef"),
        ("Caesar Salad", "7.25", "Crisp romaine"),
        ("Margherita", "11.0", "Wood-fired pizza with basil"),
    ] {
        services
            .catalog
            .create_menu_item(
                &owner,
                vendor.id,
                branch.id,
                NewMenuItem {
                    name: name.to_owned(),
                    price: Decimal::from_str(price).unwrap(),
                    description: Some(description.to_owned()),
                    image_path: None,
                },
            )
            .await
            .unwrap();
    }
    (vendor.id, branch.id)
}

#[tokio::test]
async fn menu_search_is_case_insensitive_over_name_and_description() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, branch_id) = seed_menu(&services).await;

    let by_name = services
        .catalog
        .list_menu(
            branch_id,
            MenuFilter {
                search: Some("BURGER".to_owned()),
                ..MenuFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Burger");

    let by_description = services
        .catalog
        .list_menu(
            branch_id,
            MenuFilter {
                search: Some("wood-fired".to_owned()),
                ..MenuFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].name, "Margherita");
}

#[tokio::test]
async fn menu_price_bounds_are_inclusive() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, branch_id) = seed_menu(&services).await;

    let filtered = services
        .catalog
        .list_menu(
            branch_id,
            MenuFilter {
                search: None,
                min_price: Some(Decimal::from_str("7.25").unwrap()),
                max_price: Some(Decimal::from_str("9.5").unwrap()),
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = filtered.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Burger", "Caesar Salad"]);
}

#[tokio::test]
async fn menu_listing_is_deterministic_across_repeats() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let (_, branch_id) = seed_menu(&services).await;

    let first = services
        .catalog
        .list_menu(branch_id, MenuFilter::default())
        .await
        .unwrap();
    let second = services
        .catalog
        .list_menu(branch_id, MenuFilter::default())
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn inverted_price_bounds_are_rejected() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .catalog
        .list_menu(
            Uuid::new_v4(),
            MenuFilter {
                search: None,
                min_price: Some(Decimal::from(10)),
                max_price: Some(Decimal::from(5)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "min_price"));
}

// =========================================================================
// Offers
// =========================================================================

#[tokio::test]
async fn offer_window_must_be_ordered() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let now = Utc::now();
    let mut offer = week_long_offer("Backwards");
    offer.starts_at = now + Duration::days(2);
    offer.ends_at = now + Duration::days(1);

    let err = services
        .catalog
        .create_offer(&owner, vendor.id, branch.id, offer)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "ends_at"));
}

#[tokio::test]
async fn percentage_discount_cannot_exceed_100() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    let mut offer = week_long_offer("Too generous");
    offer.discount.value = Decimal::from(120);

    let err = services
        .catalog
        .create_offer(&owner, vendor.id, branch.id, offer)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "discount.value"));
}

#[tokio::test]
async fn active_listing_excludes_closed_windows() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);
    let vendor = seed_approved_vendor(&services, &owner).await;
    let branch = seed_branch(&services, &owner, vendor.id).await;

    services
        .catalog
        .create_offer(&owner, vendor.id, branch.id, week_long_offer("Current"))
        .await
        .unwrap();

    let now = Utc::now();
    let expired = NewOffer {
        title: "Expired".to_owned(),
        discount: Discount {
            kind: DiscountKind::Flat,
            value: Decimal::from(2),
            cap: None,
        },
        starts_at: now - Duration::days(10),
        ends_at: now - Duration::days(3),
    };
    services
        .catalog
        .create_offer(&owner, vendor.id, branch.id, expired)
        .await
        .unwrap();

    let active = services.catalog.list_active_offers(branch.id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Current");
}
