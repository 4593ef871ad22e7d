pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod integrations;
pub mod routes;
pub mod server;

pub use config::Config;
pub use server::Server;
