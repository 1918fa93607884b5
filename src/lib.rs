pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod export;
pub mod fake_dataset;
pub mod inference;
pub mod outcome;
pub mod player_profile;
pub mod rankings;
pub mod report;
pub mod state;
