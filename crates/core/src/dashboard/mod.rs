//! Dashboard data access

pub mod ports;
pub mod service;

pub use ports::DashboardSource;
pub use service::DashboardService;
