use std::io::{self, IsTerminal};

use tk_bot::{Bot, BotConfig, BotResult, Context};
use tk_session::MemoryArchive;
use tk_store::Database;

pub fn run(config: BotConfig, guild: &str, author: &str, no_persist: bool) -> BotResult<()> {
    let db = Database::open(&config.database)?;
    let mut bot = if no_persist {
        Bot::with_archive(config, db, Box::new(MemoryArchive::new()))
    } else {
        Bot::new(config, db)
    };
    let ctx = Context::new(guild, author);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    tk_bot::console::run(&mut bot, &ctx, stdin.lock(), &mut stdout, interactive)?;
    Ok(())
}
