//! Data access for the catalog tables.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so handlers
//! can run them on a pooled connection or inside an open transaction.
//! Finders return `Option`/`Vec` and never treat absence as an error; the
//! HTTP layer decides what a missing row means.

pub mod brand;
pub mod category;
pub mod category_brand;
pub mod otp_verification;
pub mod product;
pub mod product_group;
pub mod product_image;
pub mod product_view;
pub mod user;
pub mod wishlist;
