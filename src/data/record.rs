use crate::data::models::{field, Field, MatchDto, ObjectiveDto, ParticipantDto, TeamDto};
use crate::data::names::normalize_player_name;
use crate::error::RecordIssue;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const UNKNOWN_VALUE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    pub fn from_team_id(id: &str) -> Option<Self> {
        match id.trim() {
            "100" => Some(TeamSide::Blue),
            "200" => Some(TeamSide::Red),
            _ => None,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Blue => write!(f, "Blue"),
            TeamSide::Red => write!(f, "Red"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Position {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
    Unknown,
}

impl Position {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TOP" => Position::Top,
            "JUNGLE" | "JGL" => Position::Jungle,
            "MIDDLE" | "MID" => Position::Middle,
            "BOTTOM" | "ADC" => Position::Bottom,
            "UTILITY" | "SUPPORT" | "SUP" => Position::Utility,
            _ => Position::Unknown,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Position::Top => "TOP",
            Position::Jungle => "JGL",
            Position::Middle => "MID",
            Position::Bottom => "ADC",
            Position::Utility => "SUP",
            Position::Unknown => UNKNOWN_VALUE,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub name: String,
    pub champion: String,
    pub team: TeamSide,
    pub position: Position,
    pub win: bool,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub damage: u64,
    pub damage_taken: u64,
    pub gold_earned: u64,
    pub gold_spent: u64,
    pub cs: u64,
    pub vision_score: u64,
    pub level: u64,
    pub cc_time: u64,
    pub total_heal: u64,
    pub heal_on_teammates: u64,
}

impl Participant {
    pub fn kda(&self) -> f64 {
        kda(self.kills as f64, self.deaths as f64, self.assists as f64)
    }

    pub fn damage_per_gold(&self) -> f64 {
        ratio(self.damage as f64, self.gold_spent as f64)
    }

    pub fn kill_participation(&self, team_kills: u64) -> f64 {
        ratio(self.kills.saturating_add(self.assists) as f64, team_kills as f64)
    }
}

/// Team objective kills, present only when the export carries a `teams` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Objectives {
    pub champion_kills: u64,
    pub dragons: u64,
    pub barons: u64,
    pub towers: u64,
}

/// One recorded game. Built once by [`Match::from_dto`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub version: String,
    pub duration_secs: u64,
    pub participants: Vec<Participant>,
    pub objectives: BTreeMap<TeamSide, Objectives>,
}

impl Match {
    /// Validate a raw export. Every problem in the record is reported, not just the first.
    pub fn from_dto(id: &str, dto: MatchDto) -> Result<Match, Vec<RecordIssue>> {
        let mut issues = Vec::new();

        let duration_ms = match dto.game_duration.as_ref().map(|raw| raw.as_count()) {
            Some(Ok(ms)) => ms,
            Some(Err(value)) => {
                issues.push(RecordIssue::InvalidDuration(value));
                0
            }
            None => 0,
        };

        let participants: Vec<Participant> = dto
            .participants
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| parse_participant(index, raw, &mut issues))
            .collect();

        let objectives: BTreeMap<TeamSide, Objectives> = dto
            .teams
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| parse_team_objectives(index, raw, &mut issues))
            .collect();

        if !issues.is_empty() {
            return Err(issues);
        }

        Ok(Match {
            id: id.to_string(),
            date: date_from_id(id),
            version: dto.game_version.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            duration_secs: duration_ms / 1000,
            participants,
            objectives,
        })
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_secs as f64 / 60.0
    }

    pub fn duration_formatted(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }

    pub fn team(&self, side: TeamSide) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.team == side)
    }

    pub fn objectives(&self, side: TeamSide) -> Option<&Objectives> {
        self.objectives.get(&side)
    }

    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_VALUE.to_string())
    }
}

fn parse_participant(
    index: usize,
    raw: &ParticipantDto,
    issues: &mut Vec<RecordIssue>,
) -> Option<Participant> {
    let before = issues.len();

    let mut text = |f: Field| -> Option<String> {
        match raw.get(&f).and_then(|v| v.as_text()) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                issues.push(RecordIssue::MissingField {
                    index,
                    field: f.primary,
                });
                None
            }
        }
    };

    let name = text(field::NAME).map(|n| normalize_player_name(&n));
    let champion = text(field::CHAMPION);
    let team_raw = text(field::TEAM);

    let team = team_raw.and_then(|value| {
        let side = TeamSide::from_team_id(&value);
        if side.is_none() {
            issues.push(RecordIssue::UnknownTeam { index, value });
        }
        side
    });

    let mut count = |f: Field| -> u64 {
        match raw.get(&f).map(|v| v.as_count()) {
            Some(Ok(n)) => n,
            Some(Err(value)) => {
                issues.push(RecordIssue::InvalidNumber {
                    index,
                    field: f.primary,
                    value,
                });
                0
            }
            None => 0,
        }
    };

    let kills = count(field::KILLS);
    let deaths = count(field::DEATHS);
    let assists = count(field::ASSISTS);
    let damage = count(field::DAMAGE);
    let damage_taken = count(field::DAMAGE_TAKEN);
    let gold_earned = count(field::GOLD_EARNED);
    let gold_spent = count(field::GOLD_SPENT);
    let minions = count(field::MINIONS);
    let neutral_minions = count(field::NEUTRAL_MINIONS);
    let vision_score = count(field::VISION_SCORE);
    let level = count(field::LEVEL);
    let cc_time = count(field::CC_TIME);
    let total_heal = count(field::TOTAL_HEAL);
    let heal_on_teammates = count(field::HEAL_ON_TEAMMATES);

    let cs = minions.checked_add(neutral_minions).unwrap_or_else(|| {
        issues.push(RecordIssue::InvalidNumber {
            index,
            field: field::NEUTRAL_MINIONS.primary,
            value: format!("{} + {} overflows", minions, neutral_minions),
        });
        0
    });

    let position = raw
        .get(&field::POSITION)
        .and_then(|v| v.as_text())
        .map(|p| Position::parse(&p))
        .unwrap_or(Position::Unknown);
    let win = raw.get(&field::WIN).map(|v| v.as_win()).unwrap_or(false);

    if issues.len() > before {
        return None;
    }

    Some(Participant {
        name: name?,
        champion: champion?,
        team: team?,
        position,
        win,
        kills,
        deaths,
        assists,
        damage,
        damage_taken,
        gold_earned,
        gold_spent,
        cs,
        vision_score,
        level,
        cc_time,
        total_heal,
        heal_on_teammates,
    })
}

/// Side comes from `teamId` when present, otherwise from list order (blue first).
fn parse_team_objectives(
    index: usize,
    raw: &TeamDto,
    issues: &mut Vec<RecordIssue>,
) -> Option<(TeamSide, Objectives)> {
    let side = match raw.team_id.as_ref().and_then(|v| v.as_text()) {
        Some(id) => TeamSide::from_team_id(&id).or_else(|| {
            issues.push(RecordIssue::UnknownTeamEntry { index, value: id });
            None
        })?,
        None => match index {
            0 => TeamSide::Blue,
            1 => TeamSide::Red,
            _ => {
                issues.push(RecordIssue::UnknownTeamEntry {
                    index,
                    value: "missing teamId".to_string(),
                });
                return None;
            }
        },
    };

    let raw_objectives = raw.objectives.as_ref()?;
    let before = issues.len();
    let mut kills = |objective: &'static str, entry: &Option<ObjectiveDto>| -> u64 {
        match entry.as_ref().and_then(|o| o.kills.as_ref()).map(|v| v.as_count()) {
            Some(Ok(n)) => n,
            Some(Err(value)) => {
                issues.push(RecordIssue::InvalidObjective {
                    index,
                    objective,
                    value,
                });
                0
            }
            None => 0,
        }
    };

    let objectives = Objectives {
        champion_kills: kills("champion", &raw_objectives.champion),
        dragons: kills("dragon", &raw_objectives.dragon),
        barons: kills("baron", &raw_objectives.baron),
        towers: kills("tower", &raw_objectives.tower),
    };

    if issues.len() > before {
        return None;
    }
    Some((side, objectives))
}

/// Sum of counts, clamped at `u64::MAX` instead of overflowing.
pub fn total<I: IntoIterator<Item = u64>>(values: I) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// Match files are named `YYYY-MM-DD-NN.json`; anything else has no date.
pub fn date_from_id(id: &str) -> Option<NaiveDate> {
    let mut parts = id.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn kda(kills: f64, deaths: f64, assists: f64) -> f64 {
    if deaths > 0.0 {
        (kills + assists) / deaths
    } else {
        kills + assists
    }
}

pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn dto(json: &str) -> MatchDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_from_dto_builds_typed_participants() {
        let raw = dto(r#"{
            "gameDuration": 1834000,
            "gameVersion": "15.10.678",
            "participants": [{
                "RIOT_ID_GAME_NAME": "AÃ©zurly", "SKIN": "Ahri", "TEAM": "100",
                "INDIVIDUAL_POSITION": "MIDDLE", "WIN": "Win",
                "CHAMPIONS_KILLED": "8", "NUM_DEATHS": "2", "ASSISTS": "6",
                "MINIONS_KILLED": "180", "NEUTRAL_MINIONS_KILLED": "12",
                "TOTAL_DAMAGE_DEALT_TO_CHAMPIONS": "24000", "GOLD_SPENT": "12000"
            }]
        }"#);

        let game = Match::from_dto("2025-05-27-02", raw).unwrap();
        assert_eq!(game.duration_secs, 1834);
        assert_eq!(game.duration_formatted(), "30:34");
        assert_eq!(game.date_string(), "2025-05-27");
        assert_eq!(game.version, "15.10.678");

        let p = &game.participants[0];
        assert_eq!(p.name, "Aézurly");
        assert_eq!(p.team, TeamSide::Blue);
        assert_eq!(p.position, Position::Middle);
        assert!(p.win);
        assert_eq!(p.cs, 192);
        assert_eq!(p.kda(), 7.0);
        assert_eq!(p.damage_per_gold(), 2.0);
        assert_eq!(p.gold_earned, 0);
    }

    #[test]
    fn test_from_dto_reports_all_issues() {
        let raw = dto(r#"{
            "gameDuration": "long",
            "participants": [
                {"SKIN": "Ahri", "TEAM": "100"},
                {"RIOT_ID_GAME_NAME": "B", "SKIN": "Zed", "TEAM": "300", "NUM_DEATHS": "x"}
            ]
        }"#);

        let issues = Match::from_dto("bad", raw).unwrap_err();
        assert_eq!(
            issues,
            vec![
                RecordIssue::InvalidDuration("long".to_string()),
                RecordIssue::MissingField { index: 0, field: "RIOT_ID_GAME_NAME" },
                RecordIssue::UnknownTeam { index: 1, value: "300".to_string() },
                RecordIssue::InvalidNumber { index: 1, field: "NUM_DEATHS", value: "x".to_string() },
            ]
        );
    }

    #[test]
    fn test_overflowing_cs_is_reported_not_panicking() {
        let raw = dto(r#"{
            "participants": [{
                "RIOT_ID_GAME_NAME": "Farmer", "SKIN": "Nasus", "TEAM": "100",
                "MINIONS_KILLED": "18446744073709551615", "NEUTRAL_MINIONS_KILLED": "1"
            }]
        }"#);

        let issues = Match::from_dto("2025-05-27-03", raw).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            RecordIssue::InvalidNumber { index: 0, field: "NEUTRAL_MINIONS_KILLED", .. }
        ));
    }

    #[test]
    fn test_kill_participation_saturates() {
        let mut p = fixtures::participant("A", "Ahri", TeamSide::Blue, Position::Middle);
        p.kills = u64::MAX;
        p.assists = 5;
        assert_eq!(p.kill_participation(u64::MAX), 1.0);
        assert_eq!(total([u64::MAX, 1, 2]), u64::MAX);
        assert_eq!(total([3, 4]), 7);
    }

    #[test]
    fn test_team_objectives_by_id_and_order() {
        let raw = dto(r#"{
            "participants": [],
            "teams": [
                {"teamId": 200, "objectives": {"champion": {"kills": 21}, "dragon": {"kills": 4}, "baron": {"kills": 1}}},
                {"teamId": "100", "objectives": {"champion": {"kills": 9}, "tower": {"kills": "2"}}}
            ]
        }"#);
        let game = Match::from_dto("2025-05-27-04", raw).unwrap();
        assert_eq!(
            game.objectives(TeamSide::Red),
            Some(&Objectives { champion_kills: 21, dragons: 4, barons: 1, towers: 0 })
        );
        assert_eq!(game.objectives(TeamSide::Blue).unwrap().towers, 2);

        let positional = dto(r#"{"teams": [{"objectives": {"dragon": {"kills": 2}}}, {}]}"#);
        let game = Match::from_dto("2025-05-27-05", positional).unwrap();
        assert_eq!(game.objectives(TeamSide::Blue).unwrap().dragons, 2);
        assert_eq!(game.objectives(TeamSide::Red), None);
    }

    #[test]
    fn test_team_objectives_issues() {
        let raw = dto(r#"{"teams": [
            {"teamId": 300},
            {"teamId": 200, "objectives": {"baron": {"kills": "many"}}}
        ]}"#);
        let issues = Match::from_dto("bad-teams", raw).unwrap_err();
        assert_eq!(
            issues,
            vec![
                RecordIssue::UnknownTeamEntry { index: 0, value: "300".to_string() },
                RecordIssue::InvalidObjective { index: 1, objective: "baron", value: "many".to_string() },
            ]
        );
    }

    #[test]
    fn test_zero_participants_is_valid() {
        let game = Match::from_dto("empty", dto(r#"{"participants": []}"#)).unwrap();
        assert!(game.participants.is_empty());
        assert_eq!(game.version, UNKNOWN_VALUE);
        assert_eq!(game.date, None);
    }

    #[test]
    fn test_position_parse_and_short_names() {
        assert_eq!(Position::parse("bottom"), Position::Bottom);
        assert_eq!(Position::parse("UTILITY").short_name(), "SUP");
        assert_eq!(Position::parse("Invalid"), Position::Unknown);
    }

    #[test]
    fn test_kda_without_deaths() {
        assert_eq!(kda(5.0, 0.0, 3.0), 8.0);
        assert_eq!(kda(5.0, 2.0, 3.0), 4.0);
    }

    #[test]
    fn test_date_from_id() {
        assert_eq!(date_from_id("2025-05-27-02"), NaiveDate::from_ymd_opt(2025, 5, 27));
        assert_eq!(date_from_id("scrim-final"), None);
        assert_eq!(date_from_id("2025-13-40-01"), None);
    }
}
