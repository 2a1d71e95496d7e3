use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use league_stats::analysis::aggregator::{aggregate, Aggregation};
use league_stats::analysis::game::summarize_game;
use league_stats::analysis::rankings::{Leaderboard, Metric};
use league_stats::analysis::roster::analyze_roster;
use league_stats::config::Config;
use league_stats::data::loader::{find_match_files, load_files, load_match_file, LoadReport};
use league_stats::display::json::JsonPresenter;
use league_stats::display::output::{display_error, display_info, TerminalPresenter};
use league_stats::display::Presenter;
use league_stats::error::AppError;
use league_stats::logging::setup_logging;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Colored tables
    Terminal,
    /// One pretty JSON object on stdout
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "League Stats")]
#[command(about = "Statistics for recorded League of Legends games", long_about = None)]
struct Args {
    /// Directory holding one JSON file per game (default: $LEAGUE_STATS_DATA_DIR or ./data)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal", global = true)]
    format: Format,

    /// Log level: error, warn, info, debug or trace (default: $LEAGUE_STATS_LOG or warn)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breakdown of a single game file
    Game {
        /// Path to the match JSON file
        file: PathBuf,
    },

    /// List every game in the data directory
    Games,

    /// Cross-game player leaderboard
    Rankings {
        /// Metric to rank by
        #[arg(short, long, value_enum, default_value = "kda")]
        metric: Metric,

        /// Number of players to show (default: 10)
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Profile of one player, compared to others in the same position
    Player {
        /// Player name (case and accents are ignored)
        name: String,
    },

    /// Roster of a player compared to opponents at each position
    Roster {
        /// Player whose teammates form the roster (default: $LEAGUE_STATS_TARGET_PLAYER)
        #[arg(short, long)]
        target: Option<String>,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    setup_logging(&config.log_level);

    let mut presenter: Box<dyn Presenter> = match args.format {
        Format::Terminal => Box::new(TerminalPresenter),
        Format::Json => Box::new(JsonPresenter::new(std::io::stdout())),
    };
    let interactive = args.format == Format::Terminal;

    match args.command {
        Command::Game { file } => {
            let game = load_match_file(&file)
                .with_context(|| format!("could not load game {}", file.display()))?;
            presenter.game(&summarize_game(&game))?;
        }
        Command::Games => {
            let report = load_all(&config.data_dir, interactive, presenter.as_mut())?;
            let agg = aggregate(&report.matches);
            presenter.game_list(&agg.games)?;
        }
        Command::Rankings { metric, top } => {
            let report = load_all(&config.data_dir, interactive, presenter.as_mut())?;
            let agg = analyzed(&report)?;
            let leaders = Leaderboard::top_players(&agg, metric, top);
            presenter.rankings(metric, &leaders, &Leaderboard::player_rows(&agg))?;
            presenter.champion_pool(&Leaderboard::champion_pool(&agg))?;
        }
        Command::Player { name } => {
            let report = load_all(&config.data_dir, interactive, presenter.as_mut())?;
            let agg = analyzed(&report)?;
            let profile = Leaderboard::player_profile(&agg, &name).ok_or_else(|| {
                let suggestions = agg.search_players(&name);
                if suggestions.is_empty() {
                    AppError::PlayerNotFound(name.clone())
                } else {
                    AppError::PlayerNotFound(format!(
                        "{} (did you mean: {}?)",
                        name,
                        suggestions.join(", ")
                    ))
                }
            })?;
            presenter.player_profile(&profile)?;
        }
        Command::Roster { target } => {
            let target = target.unwrap_or(config.target_player);
            let report = load_all(&config.data_dir, interactive, presenter.as_mut())?;
            if report.matches.is_empty() {
                return Err(AppError::NoGamesAnalyzed.into());
            }
            let analysis = analyze_roster(&report.matches, &target);
            presenter.roster(&analysis, &analysis.all_comparisons())?;
        }
    }

    presenter.finish()?;
    Ok(())
}

fn load_all(dir: &Path, interactive: bool, presenter: &mut dyn Presenter) -> Result<LoadReport, AppError> {
    let files = find_match_files(dir)?;

    if interactive {
        display_info(&format!("Loading {} games from {}", files.len(), dir.display()));
    }
    let pb = if interactive {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_message("Loading games");

    let report = load_files(&files, |_| pb.inc(1));
    pb.finish_and_clear();

    info!(
        "{} games loaded, {} skipped",
        report.matches.len(),
        report.failures.len()
    );
    presenter.load_report(report.matches.len(), &report.failures)?;
    Ok(report)
}

fn analyzed(report: &LoadReport) -> Result<Aggregation, AppError> {
    if report.matches.is_empty() {
        return Err(AppError::NoGamesAnalyzed);
    }
    Ok(aggregate(&report.matches))
}
