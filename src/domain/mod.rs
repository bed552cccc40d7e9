//! Domain layer - Core business entities
//!
//! Plain data shapes for the user resource, independent of HTTP and storage.

pub mod user;

pub use user::{CreateUser, UpdateUser, User};
