//! Third-party integrations and the normalized item shape they produce.

pub mod hubspot;
pub mod item;

pub use item::IntegrationItem;
