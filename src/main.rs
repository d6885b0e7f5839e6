use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cycle_dashboard::config::DashboardConfig;
use cycle_dashboard::controller::{
    ConfirmFn, DashboardController, PreferenceStore, Tab, TextSurface,
};
use cycle_dashboard::gateway::{BotApi, BotApiClient, BotConfig, ExportKind};
use cycle_dashboard::types::{BacktestStrategy, MarketPeriod, ProfileDraft};

#[derive(Parser)]
#[command(name = "cycle-dashboard")]
#[command(version = "0.1.0")]
#[command(about = "Terminal dashboard for the cycle trading bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the dashboard with periodic refreshes until interrupted
    Watch {
        /// Tab to open (overview, charts, orders, automation, market,
        /// backtest, profiles); defaults to the last one used
        #[arg(short, long)]
        tab: Option<String>,
    },
    /// Print the overview stats once
    Stats,
    /// Show the analytics charts once
    Charts,
    /// List active sell orders
    Orders,
    /// Show the market snapshot and price chart
    Market {
        /// History span: 24h, 7d, 30d, 90d, 180d, 365d or max
        #[arg(short, long, default_value = "24h")]
        period: String,
    },
    /// Run a backtest against the completed cycle history
    Backtest {
        /// Sizing strategy (default, percentage_5/10/20, fixed_50/100/200)
        #[arg(short, long, default_value = "default")]
        strategy: String,

        /// Starting capital in USDC
        #[arg(long, default_value = "1000")]
        capital: f64,
    },
    /// Cycle actions
    Cycle {
        #[command(subcommand)]
        action: CycleAction,
    },
    /// Automation scheduler control
    Auto {
        #[command(subcommand)]
        action: AutoAction,
    },
    /// Manage configuration profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Export cycle history and download the CSV/JSON files
    Export {
        /// Directory to write the downloaded files into
        #[arg(short, long, default_value = ".")]
        out: String,
    },
    /// Show or change the bot's trading parameters
    BotConfig {
        /// New buy offset in dollars
        #[arg(long)]
        buy_offset: Option<i64>,

        /// New sell offset in dollars
        #[arg(long)]
        sell_offset: Option<i64>,

        /// New per-cycle balance percentage
        #[arg(long)]
        percent: Option<Decimal>,
    },
}

#[derive(Subcommand)]
enum CycleAction {
    /// Start a new buy cycle
    New,
    /// Cancel a cycle and revoke its open orders
    Cancel { id: u64 },
    /// Ask the backend to re-check order fills now
    Refresh,
    /// Move the sell order of a cycle to a new price
    SellPrice { id: u64, price: Decimal },
    /// Reconcile local state with the exchange
    Sync,
}

#[derive(Subcommand)]
enum AutoAction {
    /// Show the scheduler state
    Status,
    /// Enable automatic cycle creation
    Start {
        /// Minutes between cycles
        #[arg(short, long, default_value = "60")]
        interval: f64,
    },
    /// Disable automatic cycle creation
    Stop,
    /// Change the interval without toggling the scheduler
    Interval { minutes: f64 },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List saved profiles
    List,
    /// Save a new profile
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        buy_offset: i64,
        #[arg(long, allow_hyphen_values = true)]
        sell_offset: i64,
        #[arg(long)]
        percent: Decimal,
    },
    /// Delete a profile
    Delete { id: u64 },
    /// Apply a profile to the live bot configuration
    Apply { id: u64 },
}

fn confirm_via_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = DashboardConfig::load(&cli.config)?;
    config
        .validate()
        .map_err(|errors| anyhow!("invalid configuration: {}", errors.join(", ")))?;

    let api: Arc<dyn BotApi> = Arc::new(BotApiClient::new(config.backend_url.clone()));
    let prefs = Arc::new(PreferenceStore::open(&config.preferences_path));
    let confirm: ConfirmFn = if cli.yes {
        Arc::new(|_prompt: &str| true)
    } else {
        Arc::new(confirm_via_stdin)
    };
    let controller = DashboardController::new(
        Arc::clone(&api),
        config,
        Arc::new(TextSurface),
        prefs,
        confirm,
    );

    match cli.command {
        Commands::Watch { tab } => {
            if let Some(name) = tab {
                let tab = Tab::from_str(&name)
                    .ok_or_else(|| anyhow!("unknown tab '{}'", name))?;
                controller.enter_tab(tab).await;
            }
            controller.start().await;
            info!("watching; press Ctrl-C to exit");
            tokio::signal::ctrl_c().await?;
            controller.shutdown().await;
        }
        Commands::Stats => {
            controller.enter_tab(Tab::Overview).await;
            controller.shutdown().await;
        }
        Commands::Charts => {
            controller.enter_tab(Tab::Charts).await;
            controller.shutdown().await;
        }
        Commands::Orders => {
            controller.enter_tab(Tab::Orders).await;
            controller.shutdown().await;
        }
        Commands::Market { period } => {
            let period = MarketPeriod::from_str(&period)
                .ok_or_else(|| anyhow!("unknown period '{}'", period))?;
            controller.set_market_period(period).await;
            controller.enter_tab(Tab::Market).await;
            controller.shutdown().await;
        }
        Commands::Backtest { strategy, capital } => {
            let strategy = BacktestStrategy::from_str(&strategy)
                .ok_or_else(|| anyhow!("unknown strategy '{}'", strategy))?;
            let capital = Decimal::try_from(capital)?;
            info!("running backtest: {} with {}", strategy.display_name(), capital);
            controller.run_backtest(strategy, capital).await?;
            controller.enter_tab(Tab::Backtest).await;
            controller.shutdown().await;
        }
        Commands::Cycle { action } => match action {
            CycleAction::New => {
                if controller.request_new_cycle().await? {
                    println!("new cycle started");
                }
            }
            CycleAction::Cancel { id } => {
                if controller.request_cancel_cycle(id).await? {
                    println!("cycle #{} cancelled", id);
                }
            }
            CycleAction::Refresh => {
                controller.force_update_cycles().await?;
                println!("cycle refresh requested");
            }
            CycleAction::SellPrice { id, price } => {
                let data = api.dashboard_data().await?;
                let cycle = data
                    .cycles
                    .iter()
                    .find(|c| c.id == id)
                    .ok_or_else(|| anyhow!("no cycle #{}", id))?;
                if controller.request_sell_order_update(cycle, price).await? {
                    println!("sell order of cycle #{} moved to {}", id, price);
                }
            }
            CycleAction::Sync => {
                controller.sync_exchange().await?;
                println!("exchange sync requested");
            }
        },
        Commands::Auto { action } => match action {
            AutoAction::Status => {
                controller.enter_tab(Tab::Automation).await;
                controller.shutdown().await;
            }
            AutoAction::Start { interval } => {
                let message = controller.auto_start(interval).await?;
                println!("{}", message);
            }
            AutoAction::Stop => {
                let message = controller.auto_stop().await?;
                println!("{}", message);
            }
            AutoAction::Interval { minutes } => {
                let message = controller.auto_configure(minutes).await?;
                println!("{}", message);
            }
        },
        Commands::Profiles { action } => match action {
            ProfileAction::List => {
                controller.enter_tab(Tab::Profiles).await;
                controller.shutdown().await;
            }
            ProfileAction::Create {
                name,
                description,
                buy_offset,
                sell_offset,
                percent,
            } => {
                let draft = ProfileDraft {
                    name,
                    description,
                    buy_offset,
                    sell_offset,
                    percent,
                };
                controller.create_profile(&draft).await?;
                println!("profile '{}' saved", draft.name);
            }
            ProfileAction::Delete { id } => {
                if controller.request_delete_profile(id).await? {
                    println!("profile #{} deleted", id);
                }
            }
            ProfileAction::Apply { id } => {
                controller.apply_profile(id).await?;
                println!("profile #{} applied", id);
            }
        },
        Commands::Export { out } => {
            let result = controller.export().await?;
            let out = Path::new(&out);
            if let Some(name) = result.csv_file.as_deref() {
                let bytes = controller.download_export(ExportKind::Csv).await?;
                let path = out.join(file_name_of(name));
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            if let Some(name) = result.json_file.as_deref() {
                let bytes = controller.download_export(ExportKind::Json).await?;
                let path = out.join(file_name_of(name));
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
        }
        Commands::BotConfig {
            buy_offset,
            sell_offset,
            percent,
        } => {
            let current = controller.get_bot_config().await?;
            if buy_offset.is_none() && sell_offset.is_none() && percent.is_none() {
                println!(
                    "buy offset {}  sell offset {}  percent {}",
                    current.buy_offset, current.sell_offset, current.percent
                );
            } else {
                let updated = BotConfig {
                    buy_offset: buy_offset.unwrap_or(current.buy_offset),
                    sell_offset: sell_offset.unwrap_or(current.sell_offset),
                    percent: percent.unwrap_or(current.percent),
                };
                controller.update_bot_config(&updated).await?;
                println!("configuration updated");
            }
        }
    }

    Ok(())
}

/// Backend file names may arrive as paths; keep only the final component.
fn file_name_of(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
