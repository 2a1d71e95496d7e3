use crate::analysis::game::{GameSummary, ParticipantLine};
use crate::analysis::rankings::{
    ChampionMain, Metric, MetricComparison, PlayerProfile, PlayerRanking, PlayerRow,
};
use crate::analysis::roster::{RosterAnalysis, RosterComparison, RosterStat};
use crate::data::loader::LoadFailure;
use crate::data::record::TeamSide;
use crate::error::AppError;
use colored::*;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

use super::Presenter;

#[derive(Tabled)]
struct ParticipantRow {
    player: String,
    champion: String,
    #[tabled(rename = "pos")]
    position: String,
    #[tabled(rename = "K/D/A")]
    kda_line: String,
    #[tabled(rename = "KDA")]
    kda: String,
    damage: String,
    #[tabled(rename = "dmg %")]
    damage_share: String,
    #[tabled(rename = "KP")]
    kill_participation: String,
    gold: String,
    #[tabled(rename = "CS/min")]
    cs_per_minute: String,
    vision: String,
}

#[derive(Tabled)]
struct GameRow {
    #[tabled(rename = "match")]
    match_id: String,
    date: String,
    duration: String,
    winner: String,
    kills: String,
    #[tabled(rename = "gold diff")]
    gold_diff: String,
    blue: String,
    red: String,
}

#[derive(Tabled)]
struct RankingRow {
    rank: String,
    player: String,
    #[tabled(rename = "pos")]
    position: String,
    games: String,
    value: String,
}

#[derive(Tabled)]
struct PlayerTableRow {
    player: String,
    #[tabled(rename = "pos")]
    position: String,
    #[tabled(rename = "most played")]
    most_played: String,
    games: String,
    #[tabled(rename = "win rate")]
    win_rate: String,
    #[tabled(rename = "avg KDA")]
    kda: String,
    #[tabled(rename = "CS/min")]
    cs_per_minute: String,
    #[tabled(rename = "Dmg/min")]
    damage_per_minute: String,
    #[tabled(rename = "DMG/Gold")]
    damage_per_gold: String,
    #[tabled(rename = "Vision/min")]
    vision_per_minute: String,
}

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    games: String,
    #[tabled(rename = "win rate")]
    win_rate: String,
    #[tabled(rename = "KDA")]
    kda: String,
}

#[derive(Tabled)]
struct ComparisonRow {
    metric: String,
    player: String,
    #[tabled(rename = "position avg")]
    average: String,
    rank: String,
    difference: String,
}

#[derive(Tabled)]
struct RosterRow {
    statistic: String,
    player: String,
    opponents: String,
    difference: String,
    #[tabled(rename = "% diff")]
    percent: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn heading(title: &str, width: usize) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(width).cyan());
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_difference(difference_pct: Option<f64>) -> String {
    match difference_pct {
        None => "N/A".to_string(),
        Some(diff) if diff > 0.0 => format!("📈 +{:.1}%", diff),
        Some(diff) if diff < 0.0 => format!("📉 {:.1}%", diff),
        Some(_) => "➡️ 0.0%".to_string(),
    }
}

/// Rank colored by third: green for the top, red for the bottom.
fn colored_rank(rank: usize, total: usize) -> String {
    let text = format!("{}/{}", rank, total);
    let total = total as f64;
    let rank = rank as f64;
    if rank <= total / 3.0 {
        text.green().to_string()
    } else if rank > 2.0 * total / 3.0 {
        text.red().to_string()
    } else {
        text.yellow().to_string()
    }
}

fn participant_row(line: &ParticipantLine) -> ParticipantRow {
    ParticipantRow {
        player: line.name.clone(),
        champion: line.champion.clone(),
        position: line.position.to_string(),
        kda_line: format!("{}/{}/{}", line.kills, line.deaths, line.assists),
        kda: format!("{:.2}", line.kda),
        damage: line.damage.to_string(),
        damage_share: percent(line.damage_share),
        kill_participation: percent(line.kill_participation),
        gold: line.gold_earned.to_string(),
        cs_per_minute: format!("{:.1}", line.cs_per_minute),
        vision: line.vision_score.to_string(),
    }
}

fn side_label(side: TeamSide) -> ColoredString {
    match side {
        TeamSide::Blue => "🔵 Blue Side".blue().bold(),
        TeamSide::Red => "🔴 Red Side".red().bold(),
    }
}

/// Tables on stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn load_report(&mut self, loaded: usize, failures: &[LoadFailure]) -> Result<(), AppError> {
        display_success(&format!("Loaded {} games", loaded));
        for failure in failures {
            println!(
                "{} {}: {}",
                "⚠️".yellow(),
                failure.path.display(),
                failure.reason
            );
        }
        Ok(())
    }

    fn game(&mut self, summary: &GameSummary) -> Result<(), AppError> {
        heading(&format!("📊 GAME {}", summary.match_id), 80);
        println!(
            "{} {}   {} {}   {} {}\n",
            "Date:".bold(),
            summary.date,
            "Duration:".bold(),
            summary.duration,
            "Version:".bold(),
            summary.version
        );

        if summary.participant_count == 0 {
            println!("{}", "No participants recorded for this game".yellow());
            return Ok(());
        }

        for side in [TeamSide::Blue, TeamSide::Red] {
            let team = summary.team(side);
            let result = if team.won {
                "🏆 WIN".green().to_string()
            } else {
                "💀 LOSS".red().to_string()
            };
            println!(
                "{} {}  {} kills, {} damage, {} gold",
                side_label(side),
                result,
                team.kills,
                team.damage,
                team.gold_earned
            );
            if let Some(objectives) = team.objectives {
                println!(
                    "   🐉 {} dragons, {} barons, {} towers, {} champion kills",
                    objectives.dragons,
                    objectives.barons,
                    objectives.towers,
                    objectives.champion_kills
                );
            }

            let rows: Vec<ParticipantRow> = summary
                .participants
                .iter()
                .filter(|p| p.team == side)
                .map(participant_row)
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}\n", table);
        }

        let diff = if summary.gold_diff >= 0 {
            format!("+{} Blue", summary.gold_diff).blue()
        } else {
            format!("+{} Red", -summary.gold_diff).red()
        };
        println!("{} {}\n", "💰 Gold difference:".bold(), diff);
        Ok(())
    }

    fn game_list(&mut self, games: &[GameSummary]) -> Result<(), AppError> {
        heading(&format!("🎮 GAMES ({})", games.len()), 80);

        let rows: Vec<GameRow> = games
            .iter()
            .map(|g| GameRow {
                match_id: g.match_id.clone(),
                date: g.date.clone(),
                duration: g.duration.clone(),
                winner: match g.winner {
                    Some(TeamSide::Blue) => "Blue".blue().to_string(),
                    Some(TeamSide::Red) => "Red".red().to_string(),
                    None => "-".to_string(),
                },
                kills: format!("{} - {}", g.blue.kills, g.red.kills),
                gold_diff: format!("{:+}", g.gold_diff),
                blue: g.blue.champions.join(", "),
                red: g.red.champions.join(", "),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}\n", table);
        Ok(())
    }

    fn rankings(
        &mut self,
        metric: Metric,
        top: &[PlayerRanking],
        rows: &[PlayerRow],
    ) -> Result<(), AppError> {
        heading(&format!("🏅 TOP PLAYERS BY {}", metric.label().to_uppercase()), 60);

        if top.is_empty() {
            println!("{}", "No players to rank".yellow());
            return Ok(());
        }

        let ranking_rows: Vec<RankingRow> = top
            .iter()
            .map(|r| RankingRow {
                rank: format!("#{}", r.rank),
                player: r.name.clone(),
                position: r.position.to_string(),
                games: r.games.to_string(),
                value: metric.format(r.value),
            })
            .collect();
        let mut table = Table::new(ranking_rows);
        table.with(Style::rounded());
        println!("{}", table);

        heading("📋 ALL PLAYERS", 60);
        let player_rows: Vec<PlayerTableRow> = rows
            .iter()
            .map(|r| PlayerTableRow {
                player: r.name.clone(),
                position: r.position.to_string(),
                most_played: r.most_played.clone(),
                games: r.games.to_string(),
                win_rate: percent(r.win_rate),
                kda: format!("{:.2}", r.kda),
                cs_per_minute: format!("{:.1}", r.cs_per_minute),
                damage_per_minute: format!("{:.1}", r.damage_per_minute),
                damage_per_gold: format!("{:.2}", r.damage_per_gold),
                vision_per_minute: format!("{:.2}", r.vision_per_minute),
            })
            .collect();
        let mut table = Table::new(player_rows);
        table.with(Style::rounded());
        println!("{}\n", table);
        Ok(())
    }

    fn champion_pool(&mut self, pool: &BTreeMap<String, Vec<ChampionMain>>) -> Result<(), AppError> {
        heading("🧙 CHAMPION POOL", 60);
        for (champion, mains) in pool {
            let players: Vec<String> = mains
                .iter()
                .map(|m| format!("{} ({} games)", m.player, m.games))
                .collect();
            println!("{} {}", format!("{}:", champion).bold(), players.join(", "));
        }
        println!();
        Ok(())
    }

    fn player_profile(&mut self, profile: &PlayerProfile) -> Result<(), AppError> {
        let s = &profile.summary;
        heading(&format!("👤 {}", s.name), 60);
        println!(
            "{} {}   {} {}   {} {}   {} {:.2}",
            "Games:".bold(),
            s.games,
            "Position:".bold(),
            s.position,
            "Main:".bold(),
            s.most_played,
            "Avg KDA:".bold(),
            s.kda
        );
        println!(
            "{} {:.1}   {} {:.1}   {} {:.2}   {} {:.2}",
            "Dmg/min:".bold(),
            s.damage_per_minute,
            "CS/min:".bold(),
            s.cs_per_minute,
            "Vision/min:".bold(),
            s.vision_per_minute,
            "DMG/Gold:".bold(),
            s.damage_per_gold
        );
        println!(
            "{} {}   {} {}   {} {}\n",
            "Win rate:".bold(),
            percent(s.win_rate),
            "Total kills:".bold(),
            profile.total_kills.to_string().green(),
            "Total deaths:".bold(),
            profile.total_deaths.to_string().red()
        );

        let champion_rows: Vec<ChampionRow> = profile
            .champions
            .iter()
            .map(|c| ChampionRow {
                champion: c.champion.clone(),
                games: c.games.to_string(),
                win_rate: percent(c.win_rate),
                kda: format!("{:.2}", c.kda),
            })
            .collect();
        let mut table = Table::new(champion_rows);
        table.with(Style::rounded());
        println!("{}", table);

        match &profile.position_comparison {
            Some(comparison) => print_position_comparison(&s.position.to_string(), comparison),
            None => println!(
                "\n{}\n",
                "Not enough players in this position for a comparison".yellow()
            ),
        }
        Ok(())
    }

    fn roster(
        &mut self,
        analysis: &RosterAnalysis,
        comparisons: &[RosterComparison],
    ) -> Result<(), AppError> {
        heading(&format!("👥 ROSTER OF {}", analysis.target), 60);

        if analysis.roster.is_empty() {
            println!(
                "{}",
                format!("{} does not appear in any game", analysis.target).yellow()
            );
            return Ok(());
        }

        println!(
            "{} {} games, players: {}\n",
            "📈 Analysis:".bold(),
            analysis.games_analyzed,
            analysis.roster_players().join(", ")
        );

        for comparison in comparisons {
            println!(
                "{}",
                format!(
                    "{} vs average {} opponents ({} games, {} vs {})",
                    comparison.player,
                    comparison.position,
                    comparison.player_stats.games_played,
                    comparison.player_stats.champion,
                    comparison.opponent_stats.champion
                )
                .bold()
                .magenta()
            );

            let rows: Vec<RosterRow> = RosterStat::MAIN
                .iter()
                .filter_map(|stat| comparison.difference(*stat))
                .map(|d| {
                    let whole = matches!(d.stat, RosterStat::Damage | RosterStat::CsPerMinute);
                    let (player, opponents, difference) = if whole {
                        (
                            format!("{:.0}", d.player_value),
                            format!("{:.0}", d.opponent_value),
                            format!("{:+.0}", d.absolute_diff),
                        )
                    } else {
                        (
                            format!("{:.2}", d.player_value),
                            format!("{:.2}", d.opponent_value),
                            format!("{:+.2}", d.absolute_diff),
                        )
                    };
                    let pct = format!("{:+.1}%", d.percentage_diff);
                    RosterRow {
                        statistic: d.stat.label().to_string(),
                        player,
                        opponents,
                        difference,
                        percent: if d.is_better {
                            pct.green().to_string()
                        } else {
                            pct.red().to_string()
                        },
                    }
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}\n", table);
        }
        Ok(())
    }
}

fn print_position_comparison(position: &str, comparison: &[MetricComparison]) {
    println!("\n{}", format!("Compared to other {} players", position).bold().yellow());

    let rows: Vec<ComparisonRow> = comparison
        .iter()
        .map(|c| ComparisonRow {
            metric: c.metric.label().to_string(),
            player: c.metric.format(c.player_value),
            average: c.metric.format(c.position_average),
            rank: colored_rank(c.rank, c.total),
            difference: format_difference(c.difference_pct),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::game::summarize_game;
    use crate::analysis::roster::analyze_roster;
    use crate::data::record::fixtures::{game, participant};
    use crate::data::record::{Objectives, Position};

    #[test]
    fn test_format_difference() {
        assert_eq!(format_difference(None), "N/A");
        assert_eq!(format_difference(Some(12.34)), "📈 +12.3%");
        assert_eq!(format_difference(Some(-5.0)), "📉 -5.0%");
        assert_eq!(format_difference(Some(0.0)), "➡️ 0.0%");
    }

    #[test]
    fn test_empty_inputs_render_without_error() {
        let mut presenter = TerminalPresenter;
        let empty = summarize_game(&game("2025-05-27-01", 0, vec![]));
        assert!(presenter.game(&empty).is_ok());
        assert!(presenter.game_list(&[]).is_ok());
        assert!(presenter.rankings(Metric::Kda, &[], &[]).is_ok());

        let analysis = analyze_roster(&[], "Nobody");
        assert!(presenter.roster(&analysis, &analysis.all_comparisons()).is_ok());
    }

    #[test]
    fn test_game_with_objectives_renders() {
        let mut g = game(
            "2025-05-27-02",
            900,
            vec![participant("A", "Ahri", TeamSide::Blue, Position::Middle)],
        );
        g.objectives.insert(
            TeamSide::Blue,
            Objectives {
                champion_kills: 3,
                dragons: 1,
                barons: 0,
                towers: 2,
            },
        );
        assert!(TerminalPresenter.game(&summarize_game(&g)).is_ok());
    }

    #[test]
    fn test_colored_rank_thirds() {
        colored::control::set_override(false);
        assert_eq!(colored_rank(1, 6), "1/6");
        assert_eq!(colored_rank(6, 6), "6/6");
    }
}
