#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{NewVendor, RegistrationStatus, Role};
use crate::domain::ports::NullNotifier;
use crate::test_support::{admin, build_services, inmem_db, principal, RecordingNotifier};

fn new_vendor(name: &str) -> NewVendor {
    NewVendor {
        name: name.to_owned(),
    }
}

// =========================================================================
// register
// =========================================================================

#[tokio::test]
async fn register_creates_pending_vendor() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);

    let vendor = services
        .vendors
        .register(&owner, new_vendor("Pasta Palace"))
        .await
        .unwrap();

    assert_eq!(vendor.name, "Pasta Palace");
    assert_eq!(vendor.user_id, owner.user_id);
    assert_eq!(vendor.status, RegistrationStatus::Pending);
}

#[tokio::test]
async fn register_publishes_event() {
    let db = inmem_db().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let services = build_services(db, notifier.clone());

    services
        .vendors
        .register(&principal(Role::Vendor), new_vendor("Pasta Palace"))
        .await
        .unwrap();

    assert_eq!(notifier.kinds(), vec!["vendor.registered"]);
}

#[tokio::test]
async fn register_requires_vendor_role() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .vendors
        .register(&principal(Role::Customer), new_vendor("Nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn register_twice_for_same_user_is_rejected() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);

    services
        .vendors
        .register(&owner, new_vendor("First"))
        .await
        .unwrap();
    let err = services
        .vendors
        .register(&owner, new_vendor("Second"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "user_id"));
}

#[tokio::test]
async fn register_rejects_empty_name() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .vendors
        .register(&principal(Role::Vendor), new_vendor("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "name"));
}

// =========================================================================
// set_status
// =========================================================================

#[tokio::test]
async fn admin_approves_vendor() {
    let db = inmem_db().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let services = build_services(db, notifier.clone());
    let owner = principal(Role::Vendor);

    let vendor = services
        .vendors
        .register(&owner, new_vendor("Pasta Palace"))
        .await
        .unwrap();
    let approved = services
        .vendors
        .set_status(&admin(), vendor.id, RegistrationStatus::Approved)
        .await
        .unwrap();

    assert_eq!(approved.status, RegistrationStatus::Approved);
    assert_eq!(
        notifier.kinds(),
        vec!["vendor.registered", "vendor.status_changed"]
    );
}

#[tokio::test]
async fn non_admin_cannot_change_status() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);

    let vendor = services
        .vendors
        .register(&owner, new_vendor("Pasta Palace"))
        .await
        .unwrap();

    // Not even the owner.
    let err = services
        .vendors
        .set_status(&owner, vendor.id, RegistrationStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn set_status_on_unknown_vendor_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .vendors
        .set_status(&admin(), Uuid::new_v4(), RegistrationStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "vendor", .. }));
}

#[tokio::test]
async fn status_cannot_be_reset_to_pending() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);

    let vendor = services
        .vendors
        .register(&owner, new_vendor("Pasta Palace"))
        .await
        .unwrap();
    let err = services
        .vendors
        .set_status(&admin(), vendor.id, RegistrationStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field, .. } if field == "status"));
}

// =========================================================================
// my_vendor / list
// =========================================================================

#[tokio::test]
async fn my_vendor_returns_own_record() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));
    let owner = principal(Role::Vendor);

    let created = services
        .vendors
        .register(&owner, new_vendor("Mine"))
        .await
        .unwrap();
    let fetched = services.vendors.my_vendor(&owner).await.unwrap();
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn my_vendor_without_registration_is_not_found() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    let err = services
        .vendors
        .my_vendor(&principal(Role::Vendor))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn list_is_admin_only() {
    let db = inmem_db().await;
    let services = build_services(db, Arc::new(NullNotifier));

    services
        .vendors
        .register(&principal(Role::Vendor), new_vendor("A"))
        .await
        .unwrap();
    services
        .vendors
        .register(&principal(Role::Vendor), new_vendor("B"))
        .await
        .unwrap();

    let vendors = services.vendors.list(&admin()).await.unwrap();
    assert_eq!(vendors.len(), 2);

    let err = services
        .vendors
        .list(&principal(Role::Customer))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}
