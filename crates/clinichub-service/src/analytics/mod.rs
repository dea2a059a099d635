//! Clinic analytics: aggregates over stores plus canned figures.

pub mod dashboard;
pub mod service;

pub use dashboard::DashboardStats;
pub use service::{AnalyticsService, DoctorPerformance, RevenuePoint, SatisfactionPoint};
