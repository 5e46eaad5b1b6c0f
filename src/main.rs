//! Swarm Insights CLI
//!
//! Command-line front end for the check-in dashboard:
//! - Replay check-ins in the terminal
//! - Print stats, the weekly timeline or the check-in list
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use swarm_insights::api::{ApiClient, CheckinSource};
use swarm_insights::config::{generate_default_config, Config};
use swarm_insights::dashboard::{Dashboard, DashboardState, Intent};
use swarm_insights::model::{GeoCheckin, SummaryStats, WeeklyBucket};
use swarm_insights::playback::PlaybackStatus;
use swarm_insights::render::{progress_bar, render_frame};
use swarm_insights::telemetry;

#[derive(Parser)]
#[command(name = "swarm-insights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay your check-in history in the terminal")]
#[command(long_about = "Swarm Insights loads your check-in stats from the dashboard API\nand replays every check-in in order, one per tick.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the dashboard and replay check-ins
    Play {
        /// Start playback as soon as the check-ins are loaded
        #[arg(long)]
        autoplay: bool,
        /// Quit once every check-in has been revealed
        #[arg(long)]
        exit_on_finish: bool,
        /// Tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Show summary statistics
    Stats,

    /// Show weekly check-in counts
    Timeline,

    /// List geo-tagged check-ins
    Checkins {
        /// Only show the first N check-ins
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Wrote default config to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let loaded = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    telemetry::init(&loaded.config.logging);
    loaded.report();

    let mut config = loaded.config;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    tracing::debug!("Swarm Insights v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let client = ApiClient::new(config.api.client_config())?;

    match cli.command {
        Commands::Play {
            autoplay,
            exit_on_finish,
            tick_ms,
        } => {
            if let Some(ms) = tick_ms {
                config.playback.tick_interval_ms = ms;
            }
            let autoplay = autoplay || config.playback.autoplay;
            play(client, &config, autoplay, exit_on_finish).await?;
        }

        Commands::Stats => {
            let stats = client
                .fetch_stats()
                .await
                .context("failed to fetch stats")?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => print_stats(&stats),
            }
        }

        Commands::Timeline => {
            let weeks = client
                .fetch_weekly_timeline()
                .await
                .context("failed to fetch weekly timeline")?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&weeks)?),
                OutputFormat::Table => print_timeline(&weeks),
            }
        }

        Commands::Checkins { limit } => {
            let mut checkins = client
                .fetch_geo_checkins()
                .await
                .context("failed to fetch check-ins")?;
            if let Some(limit) = limit {
                checkins.truncate(limit);
            }
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&checkins)?),
                OutputFormat::Table => print_checkins(&checkins),
            }
        }

        // Written before any config was loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn play(
    client: ApiClient,
    config: &Config,
    autoplay: bool,
    exit_on_finish: bool,
) -> anyhow::Result<()> {
    let dashboard = Dashboard::new(Arc::new(client), config.playback.tick_interval());
    let handle = dashboard.handle();

    // Keyboard intents, one per line
    let input = handle.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match Intent::from_input(&line) {
                Some(intent) => {
                    if !input.send(intent) {
                        break;
                    }
                }
                None => eprintln!("keys: [enter]/p play-pause, r reset, l reload, q quit"),
            }
        }
    });

    let interrupt = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.quit();
        }
    });

    let options = config.playback.render_options();
    let interactive = std::io::stdout().is_terminal();
    let mut autoplay_pending = autoplay;
    let mut quitting = false;

    let final_state = dashboard
        .run(|state| {
            if autoplay_pending && state.checkins.ready().is_some() {
                autoplay_pending = false;
                handle.send(Intent::Play);
            }

            if exit_on_finish && !quitting && finished(state) {
                quitting = true;
                handle.quit();
            }

            if interactive {
                let mut stdout = std::io::stdout().lock();
                let _ = write!(stdout, "\x1b[2J\x1b[H{}", render_frame(state, &options));
                let _ = stdout.flush();
            }
        })
        .await;

    if !interactive {
        print!("{}", render_frame(&final_state, &options));
    }

    tracing::info!(
        revealed = final_state.playback.index(),
        total = final_state.playback.len(),
        "Dashboard closed"
    );
    Ok(())
}

/// Nothing left to replay: every check-in revealed, or none to reveal
fn finished(state: &DashboardState) -> bool {
    match state.checkins.error() {
        Some(_) => true,
        None => {
            state.checkins.ready().is_some()
                && state.playback.status() == PlaybackStatus::Finished
        }
    }
}

fn print_stats(stats: &SummaryStats) {
    println!("Total check-ins:  {}", stats.total_checkins);
    println!("Unique venues:    {}", stats.unique_venues);
    println!("Top city:         {}", stats.top_city);
    println!("Total distance:   {:.0} km", stats.total_distance_km);
}

fn print_timeline(weeks: &[WeeklyBucket]) {
    if weeks.is_empty() {
        println!("No check-ins");
        return;
    }

    let max = weeks.iter().map(|w| w.count).max().unwrap_or(0).max(1);
    println!("{:<12} {:>6}", "WEEK", "COUNT");
    println!("{}", "-".repeat(52));
    for week in weeks {
        let bar = progress_bar(week.count as f64 / max as f64, 30);
        println!("{:<12} {:>6} {}", week.week, week.count, bar);
    }
}

fn print_checkins(checkins: &[GeoCheckin]) {
    if checkins.is_empty() {
        println!("No check-ins");
        return;
    }

    println!(
        "{:<12} {:<30} {:>9} {:>10}  {}",
        "DATE", "VENUE", "LAT", "LNG", "SHOUT"
    );
    println!("{}", "-".repeat(80));
    for checkin in checkins {
        println!(
            "{:<12} {:<30} {:>9.4} {:>10.4}  {}",
            checkin.local_date(),
            truncate(&checkin.venue_name, 30),
            checkin.lat,
            checkin.lng,
            checkin.shout_text().unwrap_or("")
        );
    }
    println!();
    println!("{} check-ins", checkins.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
