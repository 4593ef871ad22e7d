//! HubSpot account linking and contact import.
//!
//! The OAuth2 authorization-code flow runs through three transient records in
//! the ephemeral key-value store: an anti-forgery state token minted per
//! authorization attempt, and the credential payload written after a
//! successful code exchange. Both are single-use and expire after ten minutes.

pub mod credentials;
pub mod flow;
pub mod import;
pub mod mapper;
pub mod state;

pub use credentials::CredentialStore;
pub use flow::{CallbackParams, HubSpotOAuth};
pub use import::fetch_items;
pub use mapper::map_object;
pub use state::{AuthState, RECORD_TTL, StateManager};
