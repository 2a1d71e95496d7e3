use crate::analysis::game::GameSummary;
use crate::analysis::rankings::{ChampionMain, Metric, PlayerProfile, PlayerRanking, PlayerRow};
use crate::analysis::roster::{RosterAnalysis, RosterComparison};
use crate::data::loader::LoadFailure;
use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;

use super::Presenter;

#[derive(Serialize)]
struct LoadReportDoc<'a> {
    loaded: usize,
    failures: &'a [LoadFailure],
}

#[derive(Serialize)]
struct RankingsDoc<'a> {
    metric: Metric,
    top: &'a [PlayerRanking],
    players: &'a [PlayerRow],
}

#[derive(Serialize)]
struct RosterDoc<'a> {
    target: &'a str,
    games_analyzed: usize,
    players: Vec<&'a str>,
    comparisons: &'a [RosterComparison],
}

/// Collects every section a command produces and writes them as a single
/// pretty-printed JSON object on [`Presenter::finish`], keyed by section name.
pub struct JsonPresenter<W: Write> {
    out: W,
    sections: Map<String, Value>,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonPresenter {
            out,
            sections: Map::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, section: &str, data: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(data).map_err(|e| AppError::OutputError(e.to_string()))?;
        self.sections.insert(section.to_string(), value);
        Ok(())
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn load_report(&mut self, loaded: usize, failures: &[LoadFailure]) -> Result<(), AppError> {
        self.emit("load_report", &LoadReportDoc { loaded, failures })
    }

    fn game(&mut self, summary: &GameSummary) -> Result<(), AppError> {
        self.emit("game", summary)
    }

    fn game_list(&mut self, games: &[GameSummary]) -> Result<(), AppError> {
        self.emit("games", &games)
    }

    fn rankings(
        &mut self,
        metric: Metric,
        top: &[PlayerRanking],
        rows: &[PlayerRow],
    ) -> Result<(), AppError> {
        self.emit(
            "rankings",
            &RankingsDoc {
                metric,
                top,
                players: rows,
            },
        )
    }

    fn champion_pool(&mut self, pool: &BTreeMap<String, Vec<ChampionMain>>) -> Result<(), AppError> {
        self.emit("champion_pool", pool)
    }

    fn player_profile(&mut self, profile: &PlayerProfile) -> Result<(), AppError> {
        self.emit("player_profile", profile)
    }

    fn roster(
        &mut self,
        analysis: &RosterAnalysis,
        comparisons: &[RosterComparison],
    ) -> Result<(), AppError> {
        self.emit(
            "roster",
            &RosterDoc {
                target: &analysis.target,
                games_analyzed: analysis.games_analyzed,
                players: analysis.roster_players(),
                comparisons,
            },
        )
    }

    fn finish(&mut self) -> Result<(), AppError> {
        let document = Value::Object(std::mem::take(&mut self.sections));
        serde_json::to_writer_pretty(&mut self.out, &document)
            .map_err(|e| AppError::OutputError(e.to_string()))?;
        writeln!(self.out).map_err(|e| AppError::OutputError(e.to_string()))
    }
}
