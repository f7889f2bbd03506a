//! Admin back-office API
//!
//! Password login issuing bearer tokens, an authenticated admin listing, and
//! a uniform JSON envelope for every response.

pub mod admin;
pub mod auth;
pub mod common;
pub mod model;
pub mod response;
pub mod store;
