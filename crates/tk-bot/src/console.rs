//! A chat channel on the terminal.
//!
//! Each input line is treated as a chat message from one author in one
//! guild. Replies are printed as they would be posted, with embeds laid
//! out as text. Since the console user is on the host, `importsheet`
//! takes a local file path and sends that file as the upload.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::embed::Embed;
use crate::reply::Reply;
use crate::router::{Attachment, Bot, Context};

/// Read lines from `input` until EOF or `quit`, writing replies to `out`.
pub fn run<R: BufRead, W: Write>(
    bot: &mut Bot,
    ctx: &Context,
    mut input: R,
    out: &mut W,
    interactive: bool,
) -> io::Result<()> {
    if interactive {
        writeln!(out, "  {} Tablekeeper console", "Starting".bold())?;
        writeln!(out, "  Guild: {} | Player: {}", ctx.guild, ctx.author_name)?;
        writeln!(
            out,
            "  Type '{}help' for commands, 'quit' to exit.\n",
            bot.config().prefix
        )?;
    }

    let mut line = String::new();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("quit") || message.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = match upload_path(&bot.config().prefix, message) {
            Some(path) => import_local_sheet(bot, ctx, path),
            None => bot.handle(ctx, message),
        };
        if let Some(reply) = reply {
            write_reply(out, &reply)?;
        }
    }

    if let Some(session) = bot.tracker().active(&ctx.guild) {
        writeln!(
            out,
            "{}",
            format!(
                "Session {} is still running and will not be archived.",
                session.number
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// The path in `importsheet <path>`, if the message is that command.
fn upload_path<'a>(prefix: &str, message: &'a str) -> Option<&'a str> {
    let body = message.strip_prefix(prefix)?;
    let (command, path) = body.split_once(char::is_whitespace)?;
    let path = path.trim();
    (command.eq_ignore_ascii_case("importsheet") && !path.is_empty()).then_some(path)
}

fn import_local_sheet(bot: &mut Bot, ctx: &Context, path: &str) -> Option<Reply> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return Some(Reply::text(format!("Could not read {path}: {e}"))),
    };
    let filename = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
    let upload = ctx.clone().with_attachment(Attachment::new(filename, bytes));
    let command = format!("{}importsheet", bot.config().prefix);
    bot.handle(&upload, &command)
}

/// Print one reply followed by a blank line.
pub fn write_reply<W: Write>(out: &mut W, reply: &Reply) -> io::Result<()> {
    match reply {
        Reply::Text(text) => writeln!(out, "{text}\n"),
        Reply::Embed(embed) => write_embed(out, embed),
    }
}

fn write_embed<W: Write>(out: &mut W, embed: &Embed) -> io::Result<()> {
    writeln!(out, "{}", embed.title.bold())?;
    if let Some(description) = &embed.description {
        writeln!(out, "{description}")?;
    }
    for field in &embed.fields {
        if field.value.contains('\n') {
            writeln!(out, "{}", format!("{}:", field.name).cyan())?;
            for line in field.value.lines() {
                writeln!(out, "  {line}")?;
            }
        } else {
            writeln!(out, "{} {}", format!("{}:", field.name).cyan(), field.value)?;
        }
    }
    if let Some(footer) = &embed.footer {
        writeln!(out, "{}", footer.dimmed())?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use tk_store::Database;

    #[test]
    fn upload_path_only_for_importsheet() {
        assert_eq!(upload_path("/", "/importsheet  sheets/mira.pdf "), Some("sheets/mira.pdf"));
        assert_eq!(upload_path("/", "/ImportSheet a.pdf"), Some("a.pdf"));
        assert_eq!(upload_path("/", "/importsheet"), None);
        assert_eq!(upload_path("/", "/log importsheet a.pdf"), None);
        assert_eq!(upload_path("!", "/importsheet a.pdf"), None);
    }

    #[test]
    fn imports_local_sheet_as_upload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mira.pdf");
        std::fs::write(&path, crate::router::tests::sheet_pdf("Mira Vale")).unwrap();

        let out = transcript(&format!("/importsheet {}\n/character Mira Vale\n", path.display()));
        assert!(out.starts_with("Character **Mira Vale** imported!"), "{out}");
        assert!(out.contains("D&D Character Sheet"));
    }

    #[test]
    fn missing_local_sheet() {
        let out = transcript("/importsheet /no/such/sheet.pdf\n");
        assert!(out.starts_with("Could not read /no/such/sheet.pdf: "), "{out}");
    }

    fn transcript(input: &str) -> String {
        colored::control::set_override(false);
        let db = Database::open_in_memory().unwrap();
        let mut bot = Bot::new(BotConfig::default().with_seed(3), db);
        let ctx = Context::new("table", "Ana");
        let mut out = Vec::new();
        run(&mut bot, &ctx, input.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn replies_to_commands_only() {
        let out = transcript("hello there\n/hello\n\n/unknown\n");
        assert_eq!(out, "Hello, Ana!\n\n");
    }

    #[test]
    fn stops_at_quit() {
        let out = transcript("/hello\nquit\n/hello\n");
        assert_eq!(out.matches("Hello, Ana!").count(), 1);
    }

    #[test]
    fn session_round_trip() {
        let out = transcript("/session_start 2 Phandalin\n/join\n/session_end\n");
        assert!(out.contains("Session 1 Started"));
        assert!(out.contains("Session 1 Complete"));
        assert!(out.contains("Players: Ana"));
        assert!(out.contains("Started: "));
    }

    #[test]
    fn warns_about_unfinished_session() {
        let out = transcript("/session_start 2 Phandalin\n");
        assert!(out.contains("Session 1 is still running"));
    }
}
