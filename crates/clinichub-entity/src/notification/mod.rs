//! Staff notification entities.

pub mod model;

pub use model::{NewNotification, Notification, UNREAD_LIMIT};
