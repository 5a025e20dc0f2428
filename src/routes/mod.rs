//! API Routes

pub mod health;
pub mod limits;
pub mod assets;
pub mod features;
