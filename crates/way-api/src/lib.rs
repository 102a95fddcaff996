//! # way-api
//!
//! Client for the upstream check-in API. Needs only a bearer token; every
//! call goes through the common `meta`/`response` envelope and surfaces
//! provider errors as [`ApiError::Api`]. Implements [`way_auth::AuthProbe`]
//! so the session layer can ask whether a token is actually accepted.

pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{Checkin, CheckinPage, Venue, VenueLocation};
