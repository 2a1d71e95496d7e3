use crate::data::record::{ratio, total, Match, Objectives, Participant, Position, TeamSide};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub side: TeamSide,
    pub won: bool,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub damage: u64,
    pub gold_earned: u64,
    pub objectives: Option<Objectives>,
    pub players: Vec<String>,
    pub champions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantLine {
    pub name: String,
    pub champion: String,
    pub team: TeamSide,
    pub position: Position,
    pub win: bool,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub kda: f64,
    pub damage: u64,
    pub damage_share: f64,
    pub kill_participation: f64,
    pub gold_earned: u64,
    pub gold_share: f64,
    pub cs: u64,
    pub cs_per_minute: f64,
    pub damage_per_minute: f64,
    pub damage_per_gold: f64,
    pub vision_score: u64,
}

/// Derived statistics for a single game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub match_id: String,
    pub date: String,
    pub version: String,
    pub duration: String,
    pub participant_count: usize,
    pub blue: TeamSummary,
    pub red: TeamSummary,
    pub winner: Option<TeamSide>,
    /// Blue gold minus red gold.
    pub gold_diff: i64,
    pub participants: Vec<ParticipantLine>,
}

impl GameSummary {
    pub fn team(&self, side: TeamSide) -> &TeamSummary {
        match side {
            TeamSide::Blue => &self.blue,
            TeamSide::Red => &self.red,
        }
    }
}

fn team_summary(game: &Match, side: TeamSide) -> TeamSummary {
    let members: Vec<&Participant> = game.team(side).collect();
    TeamSummary {
        side,
        won: members.first().map(|p| p.win).unwrap_or(false),
        kills: total(members.iter().map(|p| p.kills)),
        deaths: total(members.iter().map(|p| p.deaths)),
        assists: total(members.iter().map(|p| p.assists)),
        damage: total(members.iter().map(|p| p.damage)),
        gold_earned: total(members.iter().map(|p| p.gold_earned)),
        objectives: game.objectives(side).copied(),
        players: members.iter().map(|p| p.name.clone()).collect(),
        champions: members.iter().map(|p| p.champion.clone()).collect(),
    }
}

fn participant_line(game: &Match, team: &TeamSummary, p: &Participant) -> ParticipantLine {
    let minutes = game.duration_minutes();
    ParticipantLine {
        name: p.name.clone(),
        champion: p.champion.clone(),
        team: p.team,
        position: p.position,
        win: p.win,
        kills: p.kills,
        deaths: p.deaths,
        assists: p.assists,
        kda: p.kda(),
        damage: p.damage,
        damage_share: ratio(p.damage as f64, team.damage as f64),
        kill_participation: p.kill_participation(team.kills),
        gold_earned: p.gold_earned,
        gold_share: ratio(p.gold_earned as f64, team.gold_earned as f64),
        cs: p.cs,
        cs_per_minute: ratio(p.cs as f64, minutes),
        damage_per_minute: ratio(p.damage as f64, minutes),
        damage_per_gold: p.damage_per_gold(),
        vision_score: p.vision_score,
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub fn summarize_game(game: &Match) -> GameSummary {
    let blue = team_summary(game, TeamSide::Blue);
    let red = team_summary(game, TeamSide::Red);

    let participants = game
        .participants
        .iter()
        .map(|p| {
            let team = if p.team == TeamSide::Blue { &blue } else { &red };
            participant_line(game, team, p)
        })
        .collect();

    let winner = match (blue.won, red.won) {
        (true, false) => Some(TeamSide::Blue),
        (false, true) => Some(TeamSide::Red),
        _ => None,
    };

    GameSummary {
        match_id: game.id.clone(),
        date: game.date_string(),
        version: game.version.clone(),
        duration: game.duration_formatted(),
        participant_count: game.participants.len(),
        gold_diff: signed(blue.gold_earned).saturating_sub(signed(red.gold_earned)),
        winner,
        blue,
        red,
        participants,
    }
}
