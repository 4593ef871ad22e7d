pub mod health;
pub mod integrations;

pub use health::create_health_routes;
pub use integrations::create_integration_routes;
