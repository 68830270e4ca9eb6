//! Domain Services - Progression logic over the models

pub mod aggregator;
pub mod economy;
pub mod quest;
