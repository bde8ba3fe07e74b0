pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use app::App;
pub use config::Config;
pub use error::{AppError, Result};
pub use services::PlannerService;
pub use store::DataStore;
