//! Elegance Core - Domain types and storefront logic.
//!
//! This crate provides the types and pure transformations shared by every
//! Elegance component:
//! - `storefront` - REST client, request cache and local state workflows
//! - `cli` - Command-line front end for customers and administrators
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no network, no
//! file system. Everything here operates on values mirrored from the backend
//! JSON and can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, phone numbers, statuses, slugs
//! - [`models`] - Backend records (products, categories, orders, users, pages, settings)
//! - [`pricing`] - Delivery fee and order totals
//! - [`cart`] - Shopping cart line management
//! - [`checkout`] - Checkout form validation and order construction
//! - [`stats`] - Dashboard aggregates over orders and users

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod models;
pub mod pricing;
pub mod stats;
pub mod types;

pub use types::*;
