//! CLI Commands

pub mod login;
pub mod play;
pub mod profiles;
pub mod quest;
pub mod rest;
pub mod shop;
pub mod status;

pub use login::{LoginCommand, LogoutCommand};
pub use play::PlayCommand;
pub use profiles::ProfilesCommand;
pub use quest::QuestCommand;
pub use rest::RestCommand;
pub use shop::ShopCommand;
pub use status::StatusCommand;
