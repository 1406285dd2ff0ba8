//! Core types for Taste Trails.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod schedule;
pub mod theme;

pub use email::{Email, EmailError};
pub use id::*;
pub use schedule::{DateRange, ScheduleError, TimeSpan};
pub use theme::{Theme, ThemeError};
