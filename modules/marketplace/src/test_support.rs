//! Shared helpers for domain service tests.
//!
//! Tests run against an in-memory SQLite database with the real migrations
//! applied; repositories are the production ORM implementations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::api::rest::ConcreteServices;
use crate::domain::model::{
    Branch, NewBranch, NewVendor, Principal, RegistrationStatus, Role, Vendor,
};
use crate::domain::ports::{ChangeEvent, Notifier};
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaBranchesRepository, SeaCatalogRepository, SeaFavoritesRepository, SeaReviewsRepository,
    SeaVendorsRepository,
};

/// In-memory database with migrations applied. A single pooled connection,
/// since every sqlite `:memory:` connection is its own database.
pub(crate) async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Notifier that records published events for assertions.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingNotifier {
    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.as_str())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) fn build_services(
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
) -> ConcreteServices {
    AppServices::new(
        db,
        SeaVendorsRepository::new(),
        SeaBranchesRepository::new(),
        SeaCatalogRepository::new(),
        SeaFavoritesRepository::new(),
        SeaReviewsRepository::new(),
        notifier,
        ServiceConfig::default(),
    )
}

pub(crate) fn principal(role: Role) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        role,
    }
}

pub(crate) fn admin() -> Principal {
    principal(Role::Admin)
}

/// Register a vendor for `owner` and approve it through the admin flow.
pub(crate) async fn seed_approved_vendor(
    services: &ConcreteServices,
    owner: &Principal,
) -> Vendor {
    let vendor = services
        .vendors
        .register(
            owner,
            NewVendor {
                name: "Test Vendor".to_owned(),
            },
        )
        .await
        .unwrap();
    services
        .vendors
        .set_status(&admin(), vendor.id, RegistrationStatus::Approved)
        .await
        .unwrap()
}

pub(crate) async fn seed_branch(
    services: &ConcreteServices,
    owner: &Principal,
    vendor_id: Uuid,
) -> Branch {
    services
        .branches
        .create(
            owner,
            vendor_id,
            NewBranch {
                name: "Main Branch".to_owned(),
                address: "1 High Street".to_owned(),
                latitude: 51.5,
                longitude: -0.1,
            },
        )
        .await
        .unwrap()
}
