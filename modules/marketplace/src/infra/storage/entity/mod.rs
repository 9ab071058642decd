//! SeaORM entity definitions. The flat discriminant-plus-nullable-columns
//! shape of `favorite` and `review` exists only here; the domain sees sum
//! types.

pub mod branch;
pub mod favorite;
pub mod menu_item;
pub mod offer;
pub mod review;
pub mod review_like;
pub mod review_reply;
pub mod vendor;
