pub mod app_config;
pub mod backend_client;

pub use app_config::Config;
pub use backend_client::{BackendClient, BackendError};
