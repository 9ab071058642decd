//! Marketplace module
//!
//! CRUD service for a food-delivery marketplace: vendor registration and
//! approval, branch management, menu items, promotional offers, and the
//! customer-interaction layer (favorites, reviews, replies, likes).
//!
//! ## Architecture
//!
//! This crate follows clean architecture with strict layering:
//!
//! ### API Layer (`api`)
//! - `rest/routes.rs` - Router assembly and middleware layering
//! - `rest/handlers/` - Request handlers per resource
//! - `rest/dto.rs` - REST-specific DTOs and serialization
//! - `rest/error.rs` - HTTP error mapping (domain errors → `{error, message}`)
//! - `rest/auth.rs` - Bearer-token middleware delegating to the auth service
//! - May import `domain::service` and `domain::error` for orchestration
//!
//! ### Domain Layer (`domain`)
//! - `service/` - Business operations per resource
//! - `target.rs` - Polymorphic single-reference sum types and validation
//! - `ownership.rs` - Vendor/branch/review ownership resolution
//! - `error.rs` - Domain error taxonomy
//! - `ports.rs` - Interfaces for external dependencies (auth, notifications)
//! - `repos.rs` - Repository traits
//! - MUST NOT import `api::*` (one-way dependency only)
//!
//! ### Infrastructure Layer (`infra`)
//! - `storage/` - SeaORM entities, migrations, repository implementations
//! - `authn/` - HTTP client for the external auth service
//! - `notify/` - Webhook fan-out
//! - `uploads.rs` - Image store for menu item uploads
//! - ALL SeaORM and outbound-HTTP specifics are contained here

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(test)]
mod test_support;
