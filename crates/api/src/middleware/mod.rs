//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the calling profile, from a JWT Bearer token.

pub mod auth;
