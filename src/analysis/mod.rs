pub mod aggregator;
pub mod game;
pub mod player_stats;
pub mod rankings;
pub mod roster;
