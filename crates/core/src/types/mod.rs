//! Core types for Elegance.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod slug;
pub mod status;

pub use date::{format_date, format_short_date};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{MpesaPhone, PhoneError};
pub use price::{CurrencyCode, Price, format_price};
pub use slug::slugify;
pub use status::*;
