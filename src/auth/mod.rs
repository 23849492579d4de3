//! Authentication module: session state, token persistence, route gating.
//!
//! This module provides:
//! - `SessionGuard`: owns the session and the persisted token, and mediates
//!   all traffic with the backend auth endpoints
//! - `TokenStore`: durable storage for the opaque session token
//! - `RouteGuard`: the access decision that gates the admin screens
//!
//! All auth failures collapse to an unauthenticated session; nothing in here
//! is fatal to the process.

pub mod guard;
pub mod session;
pub mod token;

pub use guard::{AccessDecision, Route, RouteGuard, LOGIN_ROUTE, PROTECTED_ROUTE};
pub use session::{Session, SessionGuard, SessionStatus};
pub use token::TokenStore;
