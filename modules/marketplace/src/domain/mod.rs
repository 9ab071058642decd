//! Business logic and domain rules. ORM specifics stay in `infra`; HTTP
//! specifics stay in `api`.

pub mod error;
pub mod model;
pub mod ownership;
pub mod ports;
pub mod repos;
pub mod service;
pub mod target;
