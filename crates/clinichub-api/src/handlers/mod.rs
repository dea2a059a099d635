//! Request handlers, one module per route group.

pub mod admin;
pub mod analytics;
pub mod appointment;
pub mod auth;
pub mod document;
pub mod health;
pub mod notification;
pub mod patient;
pub mod pharmacy;
pub mod search;
