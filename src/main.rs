use anyhow::{Context, Result};
use clap::Parser;
use snake_duel::game::{FinalScores, GameConfig};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_duel")]
#[command(version, about = "Two-player competitive Snake in the terminal")]
struct Cli {
    /// Number of players (1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    players: Option<u8>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Simulation ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also write the final scores to this file as JSON
    #[arg(long)]
    scores_json: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::default(),
        };

        if let Some(players) = self.players {
            config.players = usize::from(players);
        }
        if let Some(rows) = self.rows {
            config.grid_rows = rows;
        }
        if let Some(cols) = self.cols {
            config.grid_cols = cols;
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_hz = tick_rate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn write_scores(path: &Path, scores: &FinalScores) -> Result<()> {
    let json = serde_json::to_string_pretty(scores).context("Failed to serialize scores")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write scores file {}", path.display()))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snake_duel=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs only go to a file
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    let scores = snake_duel::run(config).await?;

    println!("Final scores:");
    for player in &scores.0 {
        println!("  {}: {}", player.name, player.score);
    }
    if let Some(path) = &cli.scores_json {
        write_scores(path, &scores)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_duel::game::PlayerScore;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["snake_duel"]);
        assert_eq!(cli.game_config().expect("valid"), GameConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "snake_duel",
            "--players",
            "1",
            "--rows",
            "12",
            "--cols",
            "30",
            "--length",
            "4",
            "--tick-rate",
            "15",
            "--seed",
            "7",
        ]);
        let config = cli.game_config().expect("valid");
        assert_eq!(config.players, 1);
        assert_eq!(config.grid_rows, 12);
        assert_eq!(config.grid_cols, 30);
        assert_eq!(config.initial_snake_length, 4);
        assert_eq!(config.tick_rate_hz, 15);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_player_count_is_bounded() {
        assert!(Cli::try_parse_from(["snake_duel", "--players", "3"]).is_err());
    }

    #[test]
    fn test_invalid_combination_rejected() {
        let cli = Cli::parse_from(["snake_duel", "--cols", "15"]);
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_scores_written_as_json() {
        let scores = FinalScores(vec![
            PlayerScore {
                name: "Player 1".to_string(),
                score: 40,
            },
            PlayerScore {
                name: "Player 2".to_string(),
                score: 30,
            },
        ]);
        let path = std::env::temp_dir()
            .join(format!("snake_duel_scores_{}.json", std::process::id()));

        write_scores(&path, &scores).expect("scores written");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("scores file")).expect("json");
        let _ = fs::remove_file(&path);

        assert_eq!(
            written,
            serde_json::json!([
                { "name": "Player 1", "score": 40 },
                { "name": "Player 2", "score": 30 }
            ])
        );
    }
}
