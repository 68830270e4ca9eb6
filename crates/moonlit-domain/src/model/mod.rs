//! Domain Models - The vocabulary of Moonlit
//!
//! These names match how we talk about the game: a player has one
//! `PlayerState`, every finished activity yields one `RewardEvent`, and
//! the content catalogs (badges, quests, shop) are plain data.

pub mod catalog;
pub mod event;
pub mod profile;
pub mod state;
