//! Per-user notifications.

pub mod service;

pub use service::NotificationService;
