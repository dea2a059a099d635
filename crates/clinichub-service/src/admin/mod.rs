//! Administrative operations: accounts, audit trail, backups, maintenance.

pub mod roster;
pub mod service;

pub use roster::{SeedOutcome, SeedStatus, StaffRoster, StaffSeed};
pub use service::{AdminService, BackupReceipt, MaintenanceReport, SystemStats};
