//! # clinichub-entity
//!
//! Domain entity models for ClinicHub. Every struct in this crate
//! represents a database row or a domain value object. Database entities
//! additionally derive `sqlx::FromRow` where their columns map directly.

pub mod appointment;
pub mod audit;
pub mod document;
pub mod notification;
pub mod patient;
pub mod user;
