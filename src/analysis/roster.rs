//! Roster vs opponents.
//!
//! The roster is the target player plus everyone who ever shared a side with
//! them. Every participant line is then filed either under the roster (by
//! position and player) or under the opponents of that position.

use crate::data::names::normalize_player_name;
use crate::data::record::{ratio, Match, Participant, Position};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RosterStat {
    Damage,
    Kda,
    Kills,
    Deaths,
    Assists,
    Cs,
    CsPerMinute,
    VisionScore,
    VisionPerMinute,
    DamagePerGold,
    GoldSpent,
    Level,
}

impl RosterStat {
    pub const ALL: [RosterStat; 12] = [
        RosterStat::Damage,
        RosterStat::Kda,
        RosterStat::Kills,
        RosterStat::Deaths,
        RosterStat::Assists,
        RosterStat::Cs,
        RosterStat::CsPerMinute,
        RosterStat::VisionScore,
        RosterStat::VisionPerMinute,
        RosterStat::DamagePerGold,
        RosterStat::GoldSpent,
        RosterStat::Level,
    ];

    /// Stats shown in the compact comparison table.
    pub const MAIN: [RosterStat; 5] = [
        RosterStat::Damage,
        RosterStat::Kda,
        RosterStat::CsPerMinute,
        RosterStat::VisionPerMinute,
        RosterStat::DamagePerGold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RosterStat::Damage => "Damage",
            RosterStat::Kda => "KDA",
            RosterStat::Kills => "Kills",
            RosterStat::Deaths => "Deaths",
            RosterStat::Assists => "Assists",
            RosterStat::Cs => "CS",
            RosterStat::CsPerMinute => "CS/min",
            RosterStat::VisionScore => "Vision",
            RosterStat::VisionPerMinute => "Vision/min",
            RosterStat::DamagePerGold => "Damage/Gold",
            RosterStat::GoldSpent => "Gold spent",
            RosterStat::Level => "Level",
        }
    }

    pub fn value(&self, line: &StatLine) -> f64 {
        match self {
            RosterStat::Damage => line.damage as f64,
            RosterStat::Kda => line.kda,
            RosterStat::Kills => line.kills as f64,
            RosterStat::Deaths => line.deaths as f64,
            RosterStat::Assists => line.assists as f64,
            RosterStat::Cs => line.cs as f64,
            RosterStat::CsPerMinute => line.cs_per_minute,
            RosterStat::VisionScore => line.vision_score as f64,
            RosterStat::VisionPerMinute => line.vision_per_minute,
            RosterStat::DamagePerGold => line.damage_per_gold,
            RosterStat::GoldSpent => line.gold_spent as f64,
            RosterStat::Level => line.level as f64,
        }
    }

    /// Deaths is the one stat where less is better.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, RosterStat::Deaths)
    }
}

/// One participant's numbers in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLine {
    pub champion: String,
    pub damage: u64,
    pub kda: f64,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub cs: u64,
    pub cs_per_minute: f64,
    pub vision_score: u64,
    pub vision_per_minute: f64,
    pub damage_per_gold: f64,
    pub gold_spent: u64,
    pub level: u64,
}

impl StatLine {
    fn new(p: &Participant, duration_secs: u64) -> Self {
        let minutes = duration_secs as f64 / 60.0;
        StatLine {
            champion: p.champion.clone(),
            damage: p.damage,
            kda: p.kda(),
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            cs: p.cs,
            cs_per_minute: ratio(p.cs as f64, minutes),
            vision_score: p.vision_score,
            vision_per_minute: ratio(p.vision_score as f64, minutes),
            damage_per_gold: p.damage_per_gold(),
            gold_spent: p.gold_spent,
            level: p.level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatAverages {
    pub games_played: usize,
    pub champion: String,
    pub values: BTreeMap<RosterStat, f64>,
}

impl StatAverages {
    fn from_lines(lines: &[StatLine]) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }

        let count = lines.len() as f64;
        let values = RosterStat::ALL
            .iter()
            .map(|stat| {
                let sum: f64 = lines.iter().map(|l| stat.value(l)).sum();
                (*stat, sum / count)
            })
            .collect();

        let mut champions: BTreeMap<&str, usize> = BTreeMap::new();
        for line in lines {
            *champions.entry(line.champion.as_str()).or_insert(0) += 1;
        }
        let champion = champions
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (name, games)| match best {
                Some((_, top)) if top >= *games => best,
                _ => Some((*name, *games)),
            })
            .map(|(name, _)| name.to_string())
            .unwrap_or_default();

        Some(StatAverages {
            games_played: lines.len(),
            champion,
            values,
        })
    }

    pub fn get(&self, stat: RosterStat) -> f64 {
        self.values.get(&stat).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatDifference {
    pub stat: RosterStat,
    pub player_value: f64,
    pub opponent_value: f64,
    pub absolute_diff: f64,
    pub percentage_diff: f64,
    pub is_better: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterComparison {
    pub player: String,
    pub position: Position,
    pub player_stats: StatAverages,
    pub opponent_stats: StatAverages,
    /// Stats where the opponents' average is zero are left out.
    pub differences: Vec<StatDifference>,
}

impl RosterComparison {
    pub fn difference(&self, stat: RosterStat) -> Option<&StatDifference> {
        self.differences.iter().find(|d| d.stat == stat)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterAnalysis {
    pub target: String,
    pub games_analyzed: usize,
    pub roster: BTreeSet<String>,
    pub ours: BTreeMap<Position, BTreeMap<String, Vec<StatLine>>>,
    pub opponents: BTreeMap<Position, Vec<StatLine>>,
}

pub fn analyze_roster(matches: &[Match], target: &str) -> RosterAnalysis {
    let target = normalize_player_name(target);
    let mut analysis = RosterAnalysis {
        target: target.clone(),
        ..Default::default()
    };

    // First pass: who played alongside the target
    for game in matches {
        let Some(side) = game
            .participants
            .iter()
            .find(|p| p.name == target)
            .map(|p| p.team)
        else {
            continue;
        };
        analysis.roster.insert(target.clone());
        for mate in game.team(side) {
            analysis.roster.insert(mate.name.clone());
        }
    }

    for game in matches {
        analysis.games_analyzed += 1;
        for p in &game.participants {
            let line = StatLine::new(p, game.duration_secs);
            if analysis.roster.contains(&p.name) {
                analysis
                    .ours
                    .entry(p.position)
                    .or_default()
                    .entry(p.name.clone())
                    .or_default()
                    .push(line);
            } else {
                analysis.opponents.entry(p.position).or_default().push(line);
            }
        }
    }

    debug!(
        "Roster of {}: {} players over {} games",
        analysis.target,
        analysis.roster.len(),
        analysis.games_analyzed
    );

    analysis
}

impl RosterAnalysis {
    pub fn roster_players(&self) -> Vec<&str> {
        self.roster.iter().map(|name| name.as_str()).collect()
    }

    pub fn positions(&self) -> Vec<Position> {
        let all: BTreeSet<Position> = self
            .ours
            .keys()
            .chain(self.opponents.keys())
            .copied()
            .collect();
        all.into_iter().collect()
    }

    pub fn players_at(&self, position: Position) -> Vec<&str> {
        self.ours
            .get(&position)
            .map(|players| players.keys().map(|name| name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn player_average(&self, name: &str, position: Position) -> Option<StatAverages> {
        let lines = self.ours.get(&position)?.get(name)?;
        StatAverages::from_lines(lines)
    }

    pub fn opponents_average(&self, position: Position) -> Option<StatAverages> {
        StatAverages::from_lines(self.opponents.get(&position)?)
    }

    pub fn compare(&self, name: &str, position: Position) -> Option<RosterComparison> {
        let player_stats = self.player_average(name, position)?;
        let opponent_stats = self.opponents_average(position)?;

        let differences = RosterStat::ALL
            .iter()
            .filter_map(|stat| {
                let player_value = player_stats.get(*stat);
                let opponent_value = opponent_stats.get(*stat);
                if opponent_value <= 0.0 {
                    return None;
                }
                let absolute_diff = player_value - opponent_value;
                let is_better = if stat.higher_is_better() {
                    player_value > opponent_value
                } else {
                    player_value < opponent_value
                };
                Some(StatDifference {
                    stat: *stat,
                    player_value,
                    opponent_value,
                    absolute_diff,
                    percentage_diff: absolute_diff / opponent_value * 100.0,
                    is_better,
                })
            })
            .collect();

        Some(RosterComparison {
            player: name.to_string(),
            position,
            player_stats,
            opponent_stats,
            differences,
        })
    }

    /// Every roster player at every position they played, compared to that position's opponents.
    pub fn all_comparisons(&self) -> Vec<RosterComparison> {
        self.ours
            .iter()
            .flat_map(|(position, players)| {
                players
                    .keys()
                    .filter_map(move |name| self.compare(name, *position))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::{game, participant};
    use crate::data::record::TeamSide;

    fn line(name: &str, champion: &str, team: TeamSide, position: Position, damage: u64, deaths: u64) -> Participant {
        let mut p = participant(name, champion, team, position);
        p.damage = damage;
        p.deaths = deaths;
        p.kills = 3;
        p.cs = 120;
        p
    }

    fn matches() -> Vec<Match> {
        vec![
            game(
                "2025-06-01-01",
                1200,
                vec![
                    line("Aezurly", "Ahri", TeamSide::Blue, Position::Middle, 20_000, 2),
                    line("Mate", "Garen", TeamSide::Blue, Position::Top, 15_000, 3),
                    line("Foe1", "Zed", TeamSide::Red, Position::Middle, 10_000, 4),
                ],
            ),
            game(
                "2025-06-02-01",
                1200,
                vec![
                    line("Aezurly", "Syndra", TeamSide::Red, Position::Middle, 30_000, 1),
                    line("Foe2", "Yasuo", TeamSide::Blue, Position::Middle, 20_000, 6),
                ],
            ),
            game(
                "2025-06-03-01",
                1200,
                vec![line("Stranger", "Lux", TeamSide::Blue, Position::Utility, 8_000, 2)],
            ),
        ]
    }

    #[test]
    fn test_roster_identification() {
        let analysis = analyze_roster(&matches(), "Aezurly");
        assert_eq!(analysis.roster_players(), vec!["Aezurly", "Mate"]);
        assert_eq!(analysis.games_analyzed, 3);
        assert_eq!(analysis.players_at(Position::Middle), vec!["Aezurly"]);
        assert_eq!(
            analysis.positions(),
            vec![Position::Top, Position::Middle, Position::Utility]
        );
    }

    #[test]
    fn test_averages_and_comparison() {
        let analysis = analyze_roster(&matches(), "Aezurly");

        let mine = analysis.player_average("Aezurly", Position::Middle).unwrap();
        assert_eq!(mine.games_played, 2);
        assert_eq!(mine.get(RosterStat::Damage), 25_000.0);
        assert_eq!(mine.champion, "Ahri");

        let foes = analysis.opponents_average(Position::Middle).unwrap();
        assert_eq!(foes.games_played, 2);
        assert_eq!(foes.get(RosterStat::Damage), 15_000.0);
        assert_eq!(foes.champion, "Yasuo");

        let cmp = analysis.compare("Aezurly", Position::Middle).unwrap();
        let damage = cmp.difference(RosterStat::Damage).unwrap();
        assert_eq!(damage.absolute_diff, 10_000.0);
        assert!((damage.percentage_diff - 200.0 / 3.0).abs() < 1e-9);
        assert!(damage.is_better);

        let deaths = cmp.difference(RosterStat::Deaths).unwrap();
        assert_eq!(deaths.player_value, 1.5);
        assert_eq!(deaths.opponent_value, 5.0);
        assert!(deaths.is_better);

        // opponents never spent gold in the fixtures
        assert!(cmp.difference(RosterStat::GoldSpent).is_none());
    }

    #[test]
    fn test_compare_without_opponents() {
        let analysis = analyze_roster(&matches(), "Aezurly");
        assert!(analysis.compare("Mate", Position::Top).is_none());
        assert!(analysis.compare("Nobody", Position::Middle).is_none());
        assert_eq!(analysis.all_comparisons().len(), 1);
    }

    #[test]
    fn test_unknown_target_puts_everyone_in_opponents() {
        let analysis = analyze_roster(&matches(), "Ghost");
        assert!(analysis.roster.is_empty());
        assert!(analysis.ours.is_empty());
        assert_eq!(analysis.opponents[&Position::Middle].len(), 4);
    }
}
