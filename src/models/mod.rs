//! Data models for the website backend.
//!
//! This module contains the data structures exchanged with the backend
//! service:
//!
//! - `UserProfile`: display data for the logged-in admin
//! - `BlogPost`: published and draft blog entries
//! - `CareerApplication`, `ApplicationStatus`: job applications and review state
//! - `ContactInquiry`: messages submitted through the contact form

pub mod blog;
pub mod careers;
pub mod contact;
pub mod user;

pub use blog::BlogPost;
pub use careers::{ApplicationStatus, CareerApplication};
pub use contact::ContactInquiry;
pub use user::UserProfile;
