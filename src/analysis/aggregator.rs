//! Cross-game aggregation.
//!
//! [`aggregate`] is a pure function of its input: the same set of matches
//! always yields the same [`Aggregation`], whatever order they come in.

use crate::data::names::{fold_key, normalize_player_name};
use crate::data::record::{ratio, Match, TeamSide};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

use super::game::{summarize_game, GameSummary};
use super::player_stats::PlayerAggregate;

/// Per-side record across every analyzed game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideRecord {
    pub games: usize,
    pub wins: usize,
    pub kills: u64,
    pub damage: u64,
    pub gold_earned: u64,
}

impl SideRecord {
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games as f64)
    }

    pub fn average_kills(&self) -> f64 {
        ratio(self.kills as f64, self.games as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub games_analyzed: usize,
    pub players: BTreeMap<String, PlayerAggregate>,
    pub sides: BTreeMap<TeamSide, SideRecord>,
    /// Most recent first (match ids are date-prefixed file names).
    pub games: Vec<GameSummary>,
}

pub fn aggregate(matches: &[Match]) -> Aggregation {
    let mut result = Aggregation::default();

    for game in matches {
        result.games_analyzed += 1;

        for participant in &game.participants {
            result
                .players
                .entry(participant.name.clone())
                .or_insert_with(|| PlayerAggregate::new(participant.name.clone()))
                .add_game(participant, game.duration_secs);
        }

        let summary = summarize_game(game);
        for side in [TeamSide::Blue, TeamSide::Red] {
            let team = summary.team(side);
            if team.players.is_empty() {
                continue;
            }
            let record = result.sides.entry(side).or_default();
            record.games += 1;
            if team.won {
                record.wins += 1;
            }
            record.kills = record.kills.saturating_add(team.kills);
            record.damage = record.damage.saturating_add(team.damage);
            record.gold_earned = record.gold_earned.saturating_add(team.gold_earned);
        }
        result.games.push(summary);
    }

    // Duplicate ids fall back to the serialized summary so input order never leaks through.
    result.games.sort_by_cached_key(|summary| {
        (
            Reverse(summary.match_id.clone()),
            serde_json::to_string(summary).unwrap_or_default(),
        )
    });

    debug!(
        "Aggregated {} games, {} players",
        result.games_analyzed,
        result.players.len()
    );

    result
}

impl Aggregation {
    pub fn player(&self, name: &str) -> Option<&PlayerAggregate> {
        self.players.get(name)
    }

    /// Resolve a user-typed name: exact, then repaired encoding, then
    /// case- and accent-insensitive.
    pub fn find_player(&self, name: &str) -> Option<&PlayerAggregate> {
        if let Some(stats) = self.players.get(name) {
            return Some(stats);
        }

        let normalized = normalize_player_name(name);
        if let Some(stats) = self.players.get(&normalized) {
            return Some(stats);
        }

        let wanted = fold_key(name);
        self.players
            .values()
            .find(|stats| fold_key(&stats.name) == wanted)
    }

    pub fn search_players(&self, term: &str) -> Vec<&str> {
        let term = term.to_lowercase();
        self.players
            .keys()
            .filter(|name| name.to_lowercase().contains(&term))
            .map(|name| name.as_str())
            .collect()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &PlayerAggregate> {
        self.players.values().filter(|stats| stats.games_played > 0)
    }
}
