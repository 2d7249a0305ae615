//! Turns chat lines into replies.
//!
//! [`Bot::handle`] strips the command prefix, splits off the command word
//! and dispatches to a handler. Handlers call the generators, the stores
//! and the session tracker, then record what happened into the guild's
//! active session. Lines that are not commands get no reply.

mod characters;
mod general;
mod generators;
mod session;

pub use characters::character_embed;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tk_session::{GuildId, SessionArchive, SessionTracker};
use tk_store::{Database, StoreError};

use crate::config::BotConfig;
use crate::reply::Reply;

/// A file uploaded together with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name as uploaded.
    pub filename: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// An attachment with the given name and contents.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    fn is_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Who sent a command, where, and what they uploaded with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Guild the message was posted in.
    pub guild: GuildId,
    /// Stable user id, used for character ownership.
    pub author_id: String,
    /// Display name, used in session logs.
    pub author_name: String,
    /// Files uploaded with the message.
    pub attachments: Vec<Attachment>,
}

impl Context {
    /// A context where the user id and display name are the same.
    pub fn new(guild: impl Into<GuildId>, author: &str) -> Self {
        Self {
            guild: guild.into(),
            author_id: author.to_string(),
            author_name: author.to_string(),
            attachments: Vec::new(),
        }
    }

    /// Set a separate user id.
    pub fn with_author_id(mut self, id: impl Into<String>) -> Self {
        self.author_id = id.into();
        self
    }

    /// Add an uploaded file.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The first uploaded PDF, if any.
    pub fn pdf_attachment(&self) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.is_pdf())
    }
}

/// The command router and the state it works on.
pub struct Bot {
    config: BotConfig,
    tracker: SessionTracker,
    db: Database,
    rng: StdRng,
}

impl Bot {
    /// A bot that archives finished sessions into `db`.
    pub fn new(config: BotConfig, db: Database) -> Self {
        let archive = Box::new(db.sessions());
        Self::with_archive(config, db, archive)
    }

    /// A bot that archives finished sessions somewhere other than `db`.
    pub fn with_archive(config: BotConfig, db: Database, archive: Box<dyn SessionArchive>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let tracker = SessionTracker::new(archive, config.session.clone());
        Self {
            config,
            tracker,
            db,
            rng,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Get the session tracker.
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Get the database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Handle one chat line. Returns `None` for lines that are not commands.
    pub fn handle(&mut self, ctx: &Context, line: &str) -> Option<Reply> {
        let (command, rest) = split_command(&self.config.prefix, line)?;
        tracing::debug!(guild = %ctx.guild, author = %ctx.author_name, %command, "handling command");

        let reply = match command.as_str() {
            "hello" => self.do_hello(ctx),
            "help" => self.do_help(),
            "roll" => self.do_roll(ctx, rest),
            "monster" => self.do_monster(ctx, rest),
            "monsters" => self.do_monsters(rest),
            "item" => self.do_item(rest),
            "loot" => self.do_loot(ctx, rest),
            "session_start" => self.do_session_start(ctx, rest),
            "session_end" => self.do_session_end(ctx),
            "session" => self.do_session_status(ctx),
            "session_history" => self.do_session_history(ctx, rest),
            "join" => self.do_join(ctx, rest),
            "use" => self.do_use(ctx, rest),
            "log" => self.do_log(ctx, rest),
            "xp" => self.do_xp(ctx, rest),
            "importsheet" => self.do_import_sheet(ctx),
            "character" => self.do_character(ctx, rest),
            "claim" => self.do_claim(ctx, rest),
            "delete_character" => self.do_delete_character(rest),
            _ => return None,
        };
        Some(reply)
    }

    fn prefixed(&self, command: &str) -> String {
        format!("`{}{command}`", self.config.prefix)
    }

    fn usage(&self, command: &str, args: &str) -> Reply {
        Reply::text(format!(
            "Usage: `{}{command} {args}`",
            self.config.prefix
        ))
    }

    fn store_failure(&self, what: &str, e: &StoreError) -> Reply {
        tracing::warn!(error = %e, "{what} failed");
        Reply::text(format!("Something went wrong while {what}: {e}"))
    }
}

/// Split `/command rest` into a lowercase command word and its arguments.
fn split_command<'a>(prefix: &str, line: &'a str) -> Option<(String, &'a str)> {
    let body = line.trim().strip_prefix(prefix)?;
    let mut parts = body.splitn(2, char::is_whitespace);
    let command = parts.next()?.trim().to_lowercase();
    if command.is_empty() {
        return None;
    }
    Some((command, parts.next().map_or("", str::trim)))
}
