//! CrediTrust application layer.
//!
//! `CrediTrustApp` is the root that owns the wallet session and everything
//! built on it; `Dashboard` gathers and acts on one account's view.

pub mod app;
pub mod catalogue;
pub mod dashboard;
pub mod error;

pub use app::CrediTrustApp;
pub use catalogue::default_modules;
pub use dashboard::{Dashboard, DashboardView};
pub use error::AppError;
