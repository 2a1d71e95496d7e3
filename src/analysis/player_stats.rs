use crate::data::record::{kda, ratio, Participant, Position, UNKNOWN_VALUE};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionRecord {
    pub games: usize,
    pub wins: usize,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
}

impl ChampionRecord {
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games as f64)
    }

    pub fn kda(&self) -> f64 {
        kda(self.kills as f64, self.deaths as f64, self.assists as f64)
    }
}

/// Totals for one player across a set of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub games_played: usize,
    pub wins: usize,
    pub total_damage: u64,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_assists: u64,
    pub total_cs: u64,
    pub total_vision_score: u64,
    pub total_gold_spent: u64,
    pub total_game_duration: u64, // seconds
    pub champions: BTreeMap<String, ChampionRecord>,
    pub positions: BTreeMap<Position, usize>,
}

impl PlayerAggregate {
    pub fn new(name: String) -> Self {
        PlayerAggregate {
            name,
            games_played: 0,
            wins: 0,
            total_damage: 0,
            total_kills: 0,
            total_deaths: 0,
            total_assists: 0,
            total_cs: 0,
            total_vision_score: 0,
            total_gold_spent: 0,
            total_game_duration: 0,
            champions: BTreeMap::new(),
            positions: BTreeMap::new(),
        }
    }

    pub(crate) fn add_game(&mut self, participant: &Participant, duration_secs: u64) {
        self.games_played += 1;
        if participant.win {
            self.wins += 1;
        }
        self.total_damage = self.total_damage.saturating_add(participant.damage);
        self.total_kills = self.total_kills.saturating_add(participant.kills);
        self.total_deaths = self.total_deaths.saturating_add(participant.deaths);
        self.total_assists = self.total_assists.saturating_add(participant.assists);
        self.total_cs = self.total_cs.saturating_add(participant.cs);
        self.total_vision_score = self.total_vision_score.saturating_add(participant.vision_score);
        self.total_gold_spent = self.total_gold_spent.saturating_add(participant.gold_spent);
        self.total_game_duration = self.total_game_duration.saturating_add(duration_secs);

        *self.positions.entry(participant.position).or_insert(0) += 1;

        let champion = self
            .champions
            .entry(participant.champion.clone())
            .or_default();
        champion.games += 1;
        if participant.win {
            champion.wins += 1;
        }
        champion.kills = champion.kills.saturating_add(participant.kills);
        champion.deaths = champion.deaths.saturating_add(participant.deaths);
        champion.assists = champion.assists.saturating_add(participant.assists);
    }

    fn per_game(&self, total: u64) -> f64 {
        ratio(total as f64, self.games_played as f64)
    }

    fn per_minute(&self, total: u64) -> f64 {
        ratio(total as f64, self.total_game_duration as f64 / 60.0)
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games_played as f64)
    }

    pub fn average_damage(&self) -> f64 {
        self.per_game(self.total_damage)
    }

    pub fn average_kills(&self) -> f64 {
        self.per_game(self.total_kills)
    }

    pub fn average_deaths(&self) -> f64 {
        self.per_game(self.total_deaths)
    }

    pub fn average_assists(&self) -> f64 {
        self.per_game(self.total_assists)
    }

    /// KDA of the per-game averages.
    pub fn average_kda(&self) -> f64 {
        kda(
            self.average_kills(),
            self.average_deaths(),
            self.average_assists(),
        )
    }

    pub fn cs_per_minute(&self) -> f64 {
        self.per_minute(self.total_cs)
    }

    pub fn vision_per_minute(&self) -> f64 {
        self.per_minute(self.total_vision_score)
    }

    pub fn damage_per_minute(&self) -> f64 {
        self.per_minute(self.total_damage)
    }

    pub fn damage_per_gold(&self) -> f64 {
        ratio(self.total_damage as f64, self.total_gold_spent as f64)
    }

    pub fn most_played_champion(&self) -> String {
        most_played(&self.champions, |record| record.games)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_VALUE.to_string())
    }

    pub fn most_played_position(&self) -> Position {
        most_played(&self.positions, |games| *games)
            .copied()
            .unwrap_or(Position::Unknown)
    }

    pub fn champion(&self, name: &str) -> Option<&ChampionRecord> {
        self.champions.get(name)
    }
}

// Highest count wins; on a tie the smallest key does, so results never
// depend on insertion order.
fn most_played<K: Ord, V>(map: &BTreeMap<K, V>, games: impl Fn(&V) -> usize) -> Option<&K> {
    map.iter()
        .fold(None, |best: Option<(&K, usize)>, (key, value)| {
            let count = games(value);
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((key, count)),
            }
        })
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::participant;
    use crate::data::record::TeamSide;

    fn line(champion: &str, position: Position, win: bool, k: u64, d: u64, a: u64) -> Participant {
        let mut p = participant("Aezurly", champion, TeamSide::Blue, position);
        p.win = win;
        p.kills = k;
        p.deaths = d;
        p.assists = a;
        p.damage = 20_000;
        p.gold_spent = 10_000;
        p.cs = 200;
        p.vision_score = 30;
        p
    }

    #[test]
    fn test_empty_aggregate_has_zero_rates() {
        let stats = PlayerAggregate::new("Nobody".to_string());
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.average_kda(), 0.0);
        assert_eq!(stats.cs_per_minute(), 0.0);
        assert_eq!(stats.most_played_champion(), UNKNOWN_VALUE);
        assert_eq!(stats.most_played_position(), Position::Unknown);
    }

    #[test]
    fn test_add_game_saturates_totals() {
        let mut stats = PlayerAggregate::new("Aezurly".to_string());
        let mut huge = line("Ahri", Position::Middle, true, u64::MAX, 0, 1);
        huge.damage = u64::MAX;
        stats.add_game(&huge, 600);
        stats.add_game(&line("Ahri", Position::Middle, true, 3, 1, 1), 600);

        assert_eq!(stats.total_kills, u64::MAX);
        assert_eq!(stats.total_damage, u64::MAX);
        assert_eq!(stats.champions["Ahri"].kills, u64::MAX);
        assert_eq!(stats.total_assists, 2);
    }

    #[test]
    fn test_add_game_accumulates() {
        let mut stats = PlayerAggregate::new("Aezurly".to_string());
        stats.add_game(&line("Ahri", Position::Middle, true, 10, 2, 4), 1200);
        stats.add_game(&line("Ahri", Position::Middle, false, 2, 4, 6), 1800);
        stats.add_game(&line("Zed", Position::Top, true, 6, 0, 2), 1800);

        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.wins, 2);
        assert!((stats.win_rate() - 2.0 / 3.0).abs() < 1e-9);
        // avg K 6, avg D 2, avg A 4
        assert_eq!(stats.average_kda(), 5.0);
        // 600 cs over 80 minutes
        assert_eq!(stats.cs_per_minute(), 7.5);
        assert_eq!(stats.damage_per_minute(), 750.0);
        assert_eq!(stats.damage_per_gold(), 2.0);
        assert_eq!(stats.most_played_champion(), "Ahri");
        assert_eq!(stats.most_played_position(), Position::Middle);

        let ahri = stats.champion("Ahri").unwrap();
        assert_eq!(ahri.games, 2);
        assert_eq!(ahri.win_rate(), 0.5);
        assert_eq!(ahri.kda(), 22.0 / 6.0);
    }

    #[test]
    fn test_most_played_tie_breaks_by_name() {
        let mut stats = PlayerAggregate::new("Aezurly".to_string());
        stats.add_game(&line("Zed", Position::Top, true, 1, 1, 1), 600);
        stats.add_game(&line("Ahri", Position::Middle, true, 1, 1, 1), 600);
        assert_eq!(stats.most_played_champion(), "Ahri");
        assert_eq!(stats.most_played_position(), Position::Top);
    }
}
