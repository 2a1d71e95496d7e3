use crate::data::record::Position;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::aggregator::Aggregation;
use super::player_stats::PlayerAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
pub enum Metric {
    WinRate,
    Kda,
    DamagePerMinute,
    CsPerMinute,
    VisionPerMinute,
    AverageDamage,
    DamagePerGold,
}

impl Metric {
    /// Metrics used for position comparisons.
    pub const CORE: [Metric; 5] = [
        Metric::WinRate,
        Metric::Kda,
        Metric::DamagePerMinute,
        Metric::CsPerMinute,
        Metric::VisionPerMinute,
    ];

    pub fn value(&self, stats: &PlayerAggregate) -> f64 {
        match self {
            Metric::WinRate => stats.win_rate(),
            Metric::Kda => stats.average_kda(),
            Metric::DamagePerMinute => stats.damage_per_minute(),
            Metric::CsPerMinute => stats.cs_per_minute(),
            Metric::VisionPerMinute => stats.vision_per_minute(),
            Metric::AverageDamage => stats.average_damage(),
            Metric::DamagePerGold => stats.damage_per_gold(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::WinRate => "Win Rate",
            Metric::Kda => "KDA",
            Metric::DamagePerMinute => "Dmg/min",
            Metric::CsPerMinute => "CS/min",
            Metric::VisionPerMinute => "Vision/min",
            Metric::AverageDamage => "Avg Damage",
            Metric::DamagePerGold => "DMG/Gold",
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            Metric::WinRate => format!("{:.1}%", value * 100.0),
            Metric::DamagePerMinute | Metric::CsPerMinute => format!("{:.1}", value),
            Metric::AverageDamage => format!("{:.0}", value),
            _ => format!("{:.2}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRanking {
    pub rank: usize,
    pub name: String,
    pub position: Position,
    pub games: usize,
    pub value: f64,
}

/// One row of the cross-game player table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub name: String,
    pub position: Position,
    pub most_played: String,
    pub games: usize,
    pub win_rate: f64,
    pub kda: f64,
    pub cs_per_minute: f64,
    pub damage_per_minute: f64,
    pub damage_per_gold: f64,
    pub vision_per_minute: f64,
    pub kills_per_game: f64,
    pub deaths_per_game: f64,
}

impl From<&PlayerAggregate> for PlayerRow {
    fn from(stats: &PlayerAggregate) -> Self {
        PlayerRow {
            name: stats.name.clone(),
            position: stats.most_played_position(),
            most_played: stats.most_played_champion(),
            games: stats.games_played,
            win_rate: stats.win_rate(),
            kda: stats.average_kda(),
            cs_per_minute: stats.cs_per_minute(),
            damage_per_minute: stats.damage_per_minute(),
            damage_per_gold: stats.damage_per_gold(),
            vision_per_minute: stats.vision_per_minute(),
            kills_per_game: stats.average_kills(),
            deaths_per_game: stats.average_deaths(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: Metric,
    pub player_value: f64,
    pub position_average: f64,
    pub rank: usize,
    pub total: usize,
    /// Relative difference to the average in percent; `None` when the average is zero.
    pub difference_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionMain {
    pub player: String,
    pub games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionLine {
    pub champion: String,
    pub games: usize,
    pub win_rate: f64,
    pub kda: f64,
}

/// Everything a player page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub summary: PlayerRow,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub champions: Vec<ChampionLine>,
    /// `None` when fewer than two players share the position.
    pub position_comparison: Option<Vec<MetricComparison>>,
}

pub struct Leaderboard;

impl Leaderboard {
    /// Players sorted by `metric`, best first. Ties go to the lexically smaller name.
    pub fn top_players(agg: &Aggregation, metric: Metric, limit: usize) -> Vec<PlayerRanking> {
        let mut scored: Vec<(&PlayerAggregate, f64)> = agg
            .active_players()
            .map(|stats| (stats, metric.value(stats)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.name.cmp(&b.0.name))
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .enumerate()
            .map(|(idx, (stats, value))| PlayerRanking {
                rank: idx + 1,
                name: stats.name.clone(),
                position: stats.most_played_position(),
                games: stats.games_played,
                value,
            })
            .collect()
    }

    pub fn player_rows(agg: &Aggregation) -> Vec<PlayerRow> {
        agg.active_players().map(PlayerRow::from).collect()
    }

    pub fn players_by_position(agg: &Aggregation, position: Position) -> Vec<&PlayerAggregate> {
        agg.active_players()
            .filter(|stats| stats.most_played_position() == position)
            .collect()
    }

    /// Mean of each core metric over the players who main `position`.
    pub fn position_averages(agg: &Aggregation, position: Position) -> Option<BTreeMap<Metric, f64>> {
        let players = Self::players_by_position(agg, position);
        if players.is_empty() {
            return None;
        }

        let count = players.len() as f64;
        Some(
            Metric::CORE
                .iter()
                .map(|metric| {
                    let sum: f64 = players.iter().map(|s| metric.value(s)).sum();
                    (*metric, sum / count)
                })
                .collect(),
        )
    }

    /// `(rank, total)` of the player among everyone who mains the same
    /// position. Equal values share the better rank.
    pub fn position_rank(agg: &Aggregation, name: &str, metric: Metric) -> Option<(usize, usize)> {
        let stats = agg.player(name)?;
        let players = Self::players_by_position(agg, stats.most_played_position());
        if players.len() < 2 {
            return Some((1, 1));
        }

        let value = metric.value(stats);
        let better = players.iter().filter(|s| metric.value(s) > value).count();
        Some((better + 1, players.len()))
    }

    pub fn has_sufficient_players_for_comparison(
        agg: &Aggregation,
        name: &str,
        min_players: usize,
    ) -> bool {
        agg.player(name)
            .map(|stats| Self::players_by_position(agg, stats.most_played_position()).len() >= min_players)
            .unwrap_or(false)
    }

    pub fn position_comparison(agg: &Aggregation, name: &str) -> Option<Vec<MetricComparison>> {
        let stats = agg.player(name)?;
        let averages = Self::position_averages(agg, stats.most_played_position())?;

        Metric::CORE
            .iter()
            .map(|metric| {
                let player_value = metric.value(stats);
                let position_average = averages.get(metric).copied().unwrap_or(0.0);
                let (rank, total) = Self::position_rank(agg, name, *metric)?;
                let difference_pct = if position_average != 0.0 {
                    Some((player_value - position_average) / position_average * 100.0)
                } else {
                    None
                };
                Some(MetricComparison {
                    metric: *metric,
                    player_value,
                    position_average,
                    rank,
                    total,
                    difference_pct,
                })
            })
            .collect()
    }

    pub fn player_profile(agg: &Aggregation, name: &str) -> Option<PlayerProfile> {
        let stats = agg.find_player(name)?;

        let mut champions: Vec<ChampionLine> = stats
            .champions
            .iter()
            .map(|(champion, record)| ChampionLine {
                champion: champion.clone(),
                games: record.games,
                win_rate: record.win_rate(),
                kda: record.kda(),
            })
            .collect();
        champions.sort_by(|a, b| b.games.cmp(&a.games).then_with(|| a.champion.cmp(&b.champion)));

        let position_comparison = if Self::has_sufficient_players_for_comparison(agg, &stats.name, 2) {
            Self::position_comparison(agg, &stats.name)
        } else {
            None
        };

        Some(PlayerProfile {
            summary: PlayerRow::from(stats),
            total_kills: stats.total_kills,
            total_deaths: stats.total_deaths,
            champions,
            position_comparison,
        })
    }

    /// Champions that are someone's most played, with who mains them.
    pub fn champion_pool(agg: &Aggregation) -> BTreeMap<String, Vec<ChampionMain>> {
        let mut pool: BTreeMap<String, Vec<ChampionMain>> = BTreeMap::new();

        for stats in agg.active_players() {
            let champion = stats.most_played_champion();
            let games = stats.champion(&champion).map(|c| c.games).unwrap_or(0);
            if games == 0 {
                continue;
            }
            pool.entry(champion).or_default().push(ChampionMain {
                player: stats.name.clone(),
                games,
            });
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::aggregate;
    use crate::data::record::fixtures::{game, participant};
    use crate::data::record::{Participant, TeamSide};

    fn line(name: &str, champion: &str, team: TeamSide, position: Position, kills: u64, cs: u64) -> Participant {
        let mut p = participant(name, champion, team, position);
        p.kills = kills;
        p.deaths = 2;
        p.cs = cs;
        p.damage = 600 * kills;
        p.gold_spent = 300 * kills;
        p
    }

    fn agg() -> Aggregation {
        aggregate(&[
            game(
                "2025-06-01-01",
                600,
                vec![
                    line("Mid1", "Ahri", TeamSide::Blue, Position::Middle, 10, 100),
                    line("Mid2", "Zed", TeamSide::Red, Position::Middle, 4, 50),
                    line("Top1", "Garen", TeamSide::Blue, Position::Top, 2, 80),
                ],
            ),
            game(
                "2025-06-02-01",
                600,
                vec![
                    line("Mid3", "Ahri", TeamSide::Blue, Position::Middle, 4, 50),
                    line("Top1", "Garen", TeamSide::Red, Position::Top, 6, 80),
                ],
            ),
        ])
    }

    #[test]
    fn test_top_players_sorted_with_tie_break() {
        let top = Leaderboard::top_players(&agg(), Metric::CsPerMinute, 3);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        // Top1: 160 cs / 20 min = 8, Mid1: 10, Mid2 and Mid3: 5
        assert_eq!(names, vec!["Mid1", "Top1", "Mid2"]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].value, 10.0);
    }

    #[test]
    fn test_position_averages_and_rank() {
        let agg = agg();
        let averages = Leaderboard::position_averages(&agg, Position::Middle).unwrap();
        assert_eq!(averages[&Metric::CsPerMinute], 20.0 / 3.0);
        assert!(Leaderboard::position_averages(&agg, Position::Utility).is_none());

        assert_eq!(Leaderboard::position_rank(&agg, "Mid1", Metric::Kda), Some((1, 3)));
        // Mid2 and Mid3 tie on every metric
        assert_eq!(Leaderboard::position_rank(&agg, "Mid3", Metric::Kda), Some((2, 3)));
        assert_eq!(Leaderboard::position_rank(&agg, "Mid2", Metric::Kda), Some((2, 3)));
        assert_eq!(Leaderboard::position_rank(&agg, "Top1", Metric::Kda), Some((1, 1)));
        assert_eq!(Leaderboard::position_rank(&agg, "Ghost", Metric::Kda), None);
    }

    #[test]
    fn test_position_comparison() {
        let agg = agg();
        let rows = Leaderboard::position_comparison(&agg, "Mid1").unwrap();
        assert_eq!(rows.len(), Metric::CORE.len());

        let cs = rows.iter().find(|r| r.metric == Metric::CsPerMinute).unwrap();
        assert_eq!(cs.player_value, 10.0);
        assert_eq!(cs.rank, 1);
        assert_eq!(cs.total, 3);
        assert!((cs.difference_pct.unwrap() - 50.0).abs() < 1e-9);

        // Mid2 is the only mid with a loss
        let wr = rows.iter().find(|r| r.metric == Metric::WinRate).unwrap();
        assert!((wr.position_average - 2.0 / 3.0).abs() < 1e-9);

        assert!(Leaderboard::has_sufficient_players_for_comparison(&agg, "Mid1", 2));
        assert!(!Leaderboard::has_sufficient_players_for_comparison(&agg, "Top1", 2));
    }

    #[test]
    fn test_difference_is_none_for_zero_average() {
        let agg = aggregate(&[game(
            "g",
            600,
            vec![
                line("A", "Ahri", TeamSide::Red, Position::Middle, 0, 0),
                line("B", "Ahri", TeamSide::Red, Position::Middle, 0, 0),
            ],
        )]);
        let rows = Leaderboard::position_comparison(&agg, "A").unwrap();
        let cs = rows.iter().find(|r| r.metric == Metric::CsPerMinute).unwrap();
        assert_eq!(cs.difference_pct, None);
    }

    #[test]
    fn test_champion_pool() {
        let pool = Leaderboard::champion_pool(&agg());
        let ahri: Vec<&str> = pool["Ahri"].iter().map(|m| m.player.as_str()).collect();
        assert_eq!(ahri, vec!["Mid1", "Mid3"]);
        assert_eq!(pool["Garen"][0].games, 2);
    }

    #[test]
    fn test_player_profile() {
        let agg = agg();
        let profile = Leaderboard::player_profile(&agg, "mid1").unwrap();
        assert_eq!(profile.summary.name, "Mid1");
        assert_eq!(profile.champions.len(), 1);
        assert_eq!(profile.champions[0].champion, "Ahri");
        assert_eq!(profile.position_comparison.as_ref().map(|c| c.len()), Some(5));

        let solo = Leaderboard::player_profile(&agg, "Top1").unwrap();
        assert!(solo.position_comparison.is_none());
        assert_eq!(solo.total_kills, 8);

        assert!(Leaderboard::player_profile(&agg, "Ghost").is_none());
    }

    #[test]
    fn test_player_rows() {
        let rows = Leaderboard::player_rows(&agg());
        assert_eq!(rows.len(), 4);
        let top = rows.iter().find(|r| r.name == "Top1").unwrap();
        assert_eq!(top.games, 2);
        assert_eq!(top.position, Position::Top);
        assert_eq!(top.kills_per_game, 4.0);
    }
}
