//! # Moonlit Content
//!
//! The static lookup data the progression services consume: the badge
//! derivation table, the quest catalog, and the shop. Shipped builtin,
//! overridable from a YAML file, and always passed into the services by
//! the caller, never reached for globally.

pub mod builtin;
pub mod daily;
pub mod loader;

pub use builtin::builtin;
pub use daily::daily_challenge;
pub use loader::{ContentError, ContentPack, ShopCatalog};
