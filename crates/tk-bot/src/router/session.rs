use chrono::Utc;
use tk_session::{Session, SessionError, format_clock};

use super::{Bot, Context};
use crate::embed::{Colour, Embed};
use crate::reply::Reply;

const HISTORY_LIMIT: usize = 5;
const HISTORY_MAX: usize = 25;

/// Parsed `session_start` arguments.
#[derive(Debug, PartialEq, Eq)]
struct StartArgs<'a> {
    number: Option<u32>,
    level: u32,
    location: &'a str,
}

/// `[number] <level> <location...>`. Two leading numbers mean number and
/// level; one means level only.
fn parse_start(rest: &str) -> Option<StartArgs<'_>> {
    let (first, after_first) = split_word(rest);
    let first: u32 = first.parse().ok()?;

    let (second, after_second) = split_word(after_first);
    let args = match second.parse::<u32>() {
        Ok(level) if !after_second.is_empty() => StartArgs {
            number: Some(first),
            level,
            location: after_second,
        },
        _ => StartArgs {
            number: None,
            level: first,
            location: after_first,
        },
    };
    (!args.location.is_empty()).then_some(args)
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

impl Bot {
    fn no_session(&self) -> Reply {
        Reply::text(format!(
            "No active session. Start one with {}.",
            self.prefixed("session_start <level> <location>")
        ))
    }

    pub(super) fn do_session_start(&mut self, ctx: &Context, rest: &str) -> Reply {
        let Some(args) = parse_start(rest) else {
            return self.usage("session_start", "[number] <level> <location>");
        };

        let started = match args.number {
            Some(number) => self.tracker.start(&ctx.guild, number, args.location, args.level),
            None => self.tracker.start_next(&ctx.guild, args.location, args.level),
        };
        match started {
            Ok(session) => Embed::new(format!("Session {} Started", session.number), Colour::Green)
                .description(format!(
                    "**Location:** {}\n**Level:** {}",
                    session.location, session.level
                ))
                .timestamp(session.started_at)
                .into(),
            Err(SessionError::AlreadyActive { .. }) => Reply::text(format!(
                "There's already an active session. End it first with {}",
                self.prefixed("session_end")
            )),
            Err(e) => Reply::text(format!("Could not start the session: {e}")),
        }
    }

    pub(super) fn do_session_end(&mut self, ctx: &Context) -> Reply {
        match self.tracker.end(&ctx.guild) {
            Ok(recap) => Embed::from(&recap).into(),
            Err(SessionError::NoActiveSession(_)) => Reply::text("No active session found."),
            Err(e) => Reply::text(format!(
                "Could not save the session, it is still running: {e}"
            )),
        }
    }

    pub(super) fn do_session_status(&self, ctx: &Context) -> Reply {
        let Some(session) = self.tracker.active(&ctx.guild) else {
            return self.no_session();
        };
        status_embed(session, &self.config.session.time_format).into()
    }

    pub(super) fn do_session_history(&self, ctx: &Context, rest: &str) -> Reply {
        let limit = rest
            .parse::<usize>()
            .map_or(HISTORY_LIMIT, |n| n.clamp(1, HISTORY_MAX));
        let records = match self.tracker.history(&ctx.guild, limit) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "reading session history failed");
                return Reply::text(format!("Could not read session history: {e}"));
            }
        };
        if records.is_empty() {
            return Reply::text("No sessions have been archived yet.");
        }

        let fmt = &self.config.session.time_format;
        let mut embed = Embed::new("Session History", Colour::Gold);
        for r in &records {
            let minutes = (r.ended_at - r.started_at).num_minutes().max(0);
            let players = if r.players.is_empty() {
                "None recorded"
            } else {
                r.players.as_str()
            };
            embed = embed.field(
                format!("Session {}: {}", r.number, r.location),
                format!(
                    "Level {} | {} {} | {}h {}m | XP {}\nPlayers: {players}",
                    r.level,
                    r.started_at.format("%Y-%m-%d"),
                    format_clock(r.started_at, fmt),
                    minutes / 60,
                    minutes % 60,
                    r.xp_given
                ),
            );
        }
        embed.into()
    }

    pub(super) fn do_join(&mut self, ctx: &Context, rest: &str) -> Reply {
        let name = if rest.is_empty() {
            ctx.author_name.as_str()
        } else {
            rest
        };
        let Some(number) = self.tracker.active(&ctx.guild).map(|s| s.number) else {
            return self.no_session();
        };
        if self.tracker.add_player(&ctx.guild, name) {
            Reply::text(format!("**{name}** joined session {number}."))
        } else {
            Reply::text(format!("**{name}** is already in the session."))
        }
    }

    pub(super) fn do_use(&mut self, ctx: &Context, item: &str) -> Reply {
        if item.is_empty() {
            return self.usage("use", "<item>");
        }
        if self
            .tracker
            .use_consumable(&ctx.guild, item, &ctx.author_name)
        {
            Reply::text(format!("{} used **{item}**.", ctx.author_name))
        } else {
            self.no_session()
        }
    }

    pub(super) fn do_log(&mut self, ctx: &Context, text: &str) -> Reply {
        if text.is_empty() {
            return self.usage("log", "<text>");
        }
        if self.tracker.log_action(&ctx.guild, text) {
            Reply::text("Logged.")
        } else {
            self.no_session()
        }
    }

    pub(super) fn do_xp(&mut self, ctx: &Context, rest: &str) -> Reply {
        let amount = match rest.parse::<u32>() {
            Ok(amount) if amount > 0 => amount,
            _ => return self.usage("xp", "<amount>"),
        };
        if self.tracker.award_xp(&ctx.guild, amount) {
            let total = self
                .tracker
                .active(&ctx.guild)
                .map_or(amount, |s| s.xp_given());
            Reply::text(format!("Awarded {amount} XP ({total} this session)."))
        } else {
            self.no_session()
        }
    }
}

fn status_embed(session: &Session, time_format: &str) -> Embed {
    let now = Utc::now();
    let elapsed = session.duration(now).num_minutes();
    let players = if session.players().is_empty() {
        "None yet".to_string()
    } else {
        session.players().join(", ")
    };
    Embed::new(format!("Session {} In Progress", session.number), Colour::Gold)
        .description(format!(
            "**Location:** {}\n**Level:** {}",
            session.location, session.level
        ))
        .field("Players", players)
        .inline_field("Elapsed", format!("{}h {}m", elapsed / 60, elapsed % 60))
        .inline_field("Events", session.actions().len().to_string())
        .inline_field("XP", session.xp_given().to_string())
        .footer(format!(
            "Started: {}",
            format_clock(session.started_at, time_format)
        ))
        .timestamp(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::router::tests::{bot, ctx, text};
    use tk_session::{GuildId, MemoryArchive, SessionArchive, SessionRecord, SessionResult};
    use tk_store::Database;

    fn embed(reply: Option<Reply>) -> Embed {
        match reply.expect("expected a reply") {
            Reply::Embed(e) => e,
            Reply::Text(t) => panic!("expected embed, got text {t}"),
        }
    }

    /// Refuses the first `failures` archive calls, then keeps records in memory.
    struct FlakyArchive {
        failures: usize,
        inner: MemoryArchive,
    }

    impl SessionArchive for FlakyArchive {
        fn archive(&mut self, record: &SessionRecord) -> SessionResult<i64> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(SessionError::Archive("database is locked".into()));
            }
            self.inner.archive(record)
        }

        fn history(&self, guild: &GuildId, limit: usize) -> SessionResult<Vec<SessionRecord>> {
            self.inner.history(guild, limit)
        }

        fn latest_number(&self, guild: &GuildId) -> SessionResult<Option<u32>> {
            self.inner.latest_number(guild)
        }
    }

    #[test]
    fn failed_archive_keeps_session_running() {
        let archive = FlakyArchive {
            failures: 1,
            inner: MemoryArchive::default(),
        };
        let db = Database::open_in_memory().unwrap();
        let mut b = Bot::with_archive(BotConfig::default().with_seed(1), db, Box::new(archive));
        b.handle(&ctx(), "/session_start 2 Phandalin").unwrap();
        b.handle(&ctx(), "/log the goblins flee").unwrap();

        let out = text(b.handle(&ctx(), "/session_end"));
        assert!(
            out.starts_with("Could not save the session, it is still running: "),
            "{out}"
        );
        assert!(out.contains("database is locked"), "{out}");
        let session = b.tracker().active(&ctx().guild).unwrap();
        assert_eq!(session.number, 1);
        assert_eq!(session.actions().len(), 1);

        let recap = embed(b.handle(&ctx(), "/session_end"));
        assert_eq!(recap.title, "Session 1 Complete");
        assert!(!b.tracker().is_active(&ctx().guild));
    }

    #[test]
    fn parse_start_forms() {
        assert_eq!(
            parse_start("3 5 Neverwinter Wood"),
            Some(StartArgs {
                number: Some(3),
                level: 5,
                location: "Neverwinter Wood"
            })
        );
        assert_eq!(
            parse_start("5 Neverwinter Wood"),
            Some(StartArgs {
                number: None,
                level: 5,
                location: "Neverwinter Wood"
            })
        );
        assert_eq!(
            parse_start("2 10"),
            Some(StartArgs {
                number: None,
                level: 2,
                location: "10"
            })
        );
        assert_eq!(parse_start("5"), None);
        assert_eq!(parse_start("Neverwinter"), None);
        assert_eq!(parse_start(""), None);
    }

    #[test]
    fn start_posts_green_embed() {
        let mut b = bot();
        let e = embed(b.handle(&ctx(), "/session_start 4 2 Thundertree"));
        assert_eq!(e.title, "Session 4 Started");
        assert_eq!(e.colour, Colour::Green);
        assert_eq!(
            e.description.as_deref(),
            Some("**Location:** Thundertree\n**Level:** 2")
        );
    }

    #[test]
    fn second_start_is_refused() {
        let mut b = bot();
        b.handle(&ctx(), "/session_start 1 Phandalin");
        assert_eq!(
            text(b.handle(&ctx(), "/session_start 2 Elsewhere")),
            "There's already an active session. End it first with `/session_end`"
        );
    }

    #[test]
    fn start_without_level_shows_usage() {
        let mut b = bot();
        assert!(text(b.handle(&ctx(), "/session_start Phandalin")).starts_with("Usage:"));
    }

    #[test]
    fn end_without_session() {
        let mut b = bot();
        assert_eq!(
            text(b.handle(&ctx(), "/session_end")),
            "No active session found."
        );
    }

    #[test]
    fn full_session_recap() {
        let mut b = bot();
        b.handle(&ctx(), "/session_start 1 Phandalin");
        assert_eq!(
            text(b.handle(&ctx(), "/join")),
            "**Ana** joined session 1."
        );
        assert_eq!(
            text(b.handle(&ctx(), "/join Ana")),
            "**Ana** is already in the session."
        );
        b.handle(&ctx(), "/join Bo");
        assert_eq!(
            text(b.handle(&ctx(), "/use Healing Potion")),
            "Ana used **Healing Potion**."
        );
        assert_eq!(text(b.handle(&ctx(), "/log The goblins flee")), "Logged.");
        assert_eq!(
            text(b.handle(&ctx(), "/xp 200")),
            "Awarded 200 XP (200 this session)."
        );

        let recap = embed(b.handle(&ctx(), "/session_end"));
        assert_eq!(recap.title, "Session 1 Complete");
        assert_eq!(recap.field_value("Players"), Some("Ana, Bo"));
        assert_eq!(recap.field_value("Duration"), Some("0h 0m"));
        assert_eq!(recap.field_value("XP Awarded"), Some("200"));
        assert_eq!(
            recap.field_value("Consumables Used"),
            Some("Ana: Healing Potion")
        );
        let events = recap.field_value("Session Events").unwrap();
        assert!(events.contains("Ana used **Healing Potion**"));
        assert!(events.contains("The goblins flee"));
        assert!(events.contains("Awarded 200 XP"));
        assert!(b.tracker().active(&ctx().guild).is_none());
    }

    #[test]
    fn recording_commands_need_a_session() {
        let mut b = bot();
        for line in ["/join", "/use Rope", "/log hi", "/xp 10", "/session"] {
            assert!(
                text(b.handle(&ctx(), line)).starts_with("No active session."),
                "{line}"
            );
        }
    }

    #[test]
    fn xp_rejects_bad_amounts() {
        let mut b = bot();
        b.handle(&ctx(), "/session_start 1 Phandalin");
        assert!(text(b.handle(&ctx(), "/xp 0")).starts_with("Usage:"));
        assert!(text(b.handle(&ctx(), "/xp lots")).starts_with("Usage:"));
    }

    #[test]
    fn status_shows_running_session() {
        let mut b = bot();
        b.handle(&ctx(), "/session_start 3 2 Tresendar Manor");
        b.handle(&ctx(), "/join");
        let e = embed(b.handle(&ctx(), "/session"));
        assert_eq!(e.title, "Session 3 In Progress");
        assert_eq!(e.field_value("Players"), Some("Ana"));
        assert_eq!(e.field_value("Events"), Some("0"));
    }

    #[test]
    fn history_and_auto_numbering() {
        let mut b = bot();
        assert_eq!(
            text(b.handle(&ctx(), "/session_history")),
            "No sessions have been archived yet."
        );
        b.handle(&ctx(), "/session_start 7 1 Phandalin");
        b.handle(&ctx(), "/session_end");
        let started = embed(b.handle(&ctx(), "/session_start 1 Cragmaw Castle"));
        assert_eq!(started.title, "Session 8 Started");
        b.handle(&ctx(), "/session_end");

        let history = embed(b.handle(&ctx(), "/session_history"));
        let names: Vec<&str> = history.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Session 8: Cragmaw Castle", "Session 7: Phandalin"]);
    }

    #[test]
    fn guilds_do_not_share_sessions() {
        let mut b = bot();
        b.handle(&ctx(), "/session_start 1 Phandalin");
        let other = crate::router::Context::new("guild-2", "Bo");
        assert!(text(b.handle(&other, "/log hello")).starts_with("No active session."));
    }
}
