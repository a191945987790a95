pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use cli::{Cli, Commands};
pub use error::AppError;
pub use models::{Config, OutputFormat};
