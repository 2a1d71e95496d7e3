//! Rendering surfaces.
//!
//! Statistics are computed once in `analysis` and handed to a [`Presenter`];
//! presenters decide how they look and never compute anything themselves.

pub mod json;
pub mod output;

use crate::analysis::game::GameSummary;
use crate::analysis::rankings::{ChampionMain, Metric, PlayerProfile, PlayerRanking, PlayerRow};
use crate::analysis::roster::{RosterAnalysis, RosterComparison};
use crate::data::loader::LoadFailure;
use crate::error::AppError;
use std::collections::BTreeMap;

pub trait Presenter {
    fn load_report(&mut self, loaded: usize, failures: &[LoadFailure]) -> Result<(), AppError>;

    fn game(&mut self, summary: &GameSummary) -> Result<(), AppError>;

    fn game_list(&mut self, games: &[GameSummary]) -> Result<(), AppError>;

    fn rankings(
        &mut self,
        metric: Metric,
        top: &[PlayerRanking],
        rows: &[PlayerRow],
    ) -> Result<(), AppError>;

    fn champion_pool(&mut self, pool: &BTreeMap<String, Vec<ChampionMain>>) -> Result<(), AppError>;

    fn player_profile(&mut self, profile: &PlayerProfile) -> Result<(), AppError>;

    fn roster(
        &mut self,
        analysis: &RosterAnalysis,
        comparisons: &[RosterComparison],
    ) -> Result<(), AppError>;

    /// Called once after a command has produced all of its sections.
    fn finish(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}
