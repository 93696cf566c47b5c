pub mod config;
pub mod db;
pub mod extract;
pub mod gen;
pub mod models;
pub mod oracle;
pub mod review;
pub mod server;

pub use config::AppConfig;
pub use server::run_server;
