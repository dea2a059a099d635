//! User domain entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, StaffFilter, User};
pub use role::UserRole;
