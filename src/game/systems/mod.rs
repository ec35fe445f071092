pub mod bots;
pub mod collision;
pub mod pellets;
pub mod player;
pub mod viruses;
