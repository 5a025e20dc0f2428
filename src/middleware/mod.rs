//! Request middleware

pub mod auth;
pub mod gate;

pub use auth::attach_principal;
pub use gate::{AssetGate, FeatureGate};
