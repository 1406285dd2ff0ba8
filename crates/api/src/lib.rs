//! Taste Trails API library.
//!
//! Users plan itineraries, schedule activities inside them and keep a taste
//! profile. The services in [`services`] enforce the scheduling rules and
//! run against any [`store::Store`]; [`routes::app`] exposes them over HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
