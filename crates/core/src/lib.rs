//! Taste Trails Core - Shared types library.
//!
//! This crate provides common types used across all Taste Trails components:
//! - `api` - JSON API over users, itineraries, activities and taste profiles
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation helpers - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, the activity theme enum,
//!   and the date/time containment helpers used by the scheduler

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
