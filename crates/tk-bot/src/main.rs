//! Command-line host for the Tablekeeper bot.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tk_bot::{BotConfig, BotResult};

#[derive(Parser)]
#[command(
    name = "tablekeeper",
    about = "Tablekeeper: dice, loot, monsters and session tracking for tabletop games",
    version,
    propagate_version = true
)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config and TABLEKEEPER_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot on the terminal, as one player in one guild
    Console {
        /// Guild (table) id the messages belong to
        #[arg(short, long, default_value = "console")]
        guild: String,

        /// Player name the messages come from
        #[arg(short, long, default_value = "player")]
        author: String,

        /// Keep finished sessions in memory instead of the database
        #[arg(long)]
        no_persist: bool,
    },

    /// Roll dice, e.g. 3d6+2
    Roll {
        /// Dice expression
        dice: String,
    },

    /// Draw a random item
    Item {
        /// Rarity: common, uncommon, rare, very-rare, legendary or random
        #[arg(short, long, default_value = "random")]
        rarity: String,

        /// Item type: weapon, armor, potion, ring, wondrous or any
        #[arg(short, long, default_value = "any")]
        kind: String,

        /// Only magic items
        #[arg(short, long)]
        magic: bool,
    },

    /// Open a pile of loot
    Loot {
        /// Container: pouch, chest or hoard
        #[arg(default_value = "chest")]
        chest: String,
    },

    /// Show a monster stat block (random if no name is given)
    Monster {
        /// Monster name (case-insensitive)
        name: Vec<String>,
    },

    /// Import monsters from a JSON array
    ImportMonsters {
        /// JSON file
        file: PathBuf,
    },

    /// Import a fillable PDF character sheet
    ImportSheet {
        /// PDF file
        pdf: PathBuf,

        /// Chat user id that owns the character
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// List archived sessions
    Sessions {
        /// Only sessions from this guild
        #[arg(short, long)]
        guild: Option<String>,

        /// Maximum number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tablekeeper=info,tk_bot=info,tk_session=info,tk_store=info,tk_mechanics=info"
                    .into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> BotResult<BotConfig> {
    let mut config = BotConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config = config.with_database(db.clone());
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Console {
            guild,
            author,
            no_persist,
        } => commands::console::run(config, &guild, &author, no_persist),
        Commands::Roll { dice } => commands::generate::roll(&config, &dice),
        Commands::Item { rarity, kind, magic } => {
            commands::generate::item(&config, &rarity, &kind, magic)
        }
        Commands::Loot { chest } => commands::generate::loot(&config, &chest),
        Commands::Monster { name } => commands::monsters::show(&config, &name.join(" ")),
        Commands::ImportMonsters { file } => commands::monsters::import(&config, &file),
        Commands::ImportSheet { pdf, owner } => {
            commands::sheets::import(&config, &pdf, owner.as_deref())
        }
        Commands::Sessions { guild, limit } => {
            commands::sessions::list(&config, guild.as_deref(), limit)
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
