//! Application services layer - Use cases and business logic.
//!
//! Services enforce input policy and depend on repository traits
//! for dependency inversion.

mod user_service;

pub use user_service::{UserManager, UserService};
