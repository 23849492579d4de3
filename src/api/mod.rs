//! HTTP client for the website backend.
//!
//! `ApiClient` talks to the backend's REST API: the auth endpoints used by
//! the session guard, plus the admin collections (blog posts, career
//! applications, contact inquiries). The auth surface is exposed through the
//! `AuthApi` trait so the session guard can be tested without a server.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthApi, LoginGrant};
pub use error::ApiError;
