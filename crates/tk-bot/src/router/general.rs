use super::{Bot, Context};
use crate::reply::Reply;

impl Bot {
    pub(super) fn do_hello(&self, ctx: &Context) -> Reply {
        Reply::text(format!("Hello, {}!", ctx.author_name))
    }

    pub(super) fn do_help(&self) -> Reply {
        let p = &self.config.prefix;
        Reply::text(format!(
            "\
Tablekeeper Commands:
  {p}roll <dice>                     Roll dice, e.g. 3d6+2 or d20
  {p}monster [name]                  Look up a monster, or meet a random one
  {p}monsters <type> [legendary]     List monsters of a type
  {p}item [rarity] [type] [magic]    Draw a random item
  {p}loot [pouch|chest|hoard]        Open some loot
  {p}session_start [number] <level> <location>
                                    Start a session
  {p}session_end                     End the session and post a recap
  {p}session                         Show the running session
  {p}session_history                 Show recent sessions
  {p}join [name]                     Join the running session
  {p}use <item>                      Record a consumable
  {p}log <text>                      Add a line to the session log
  {p}xp <amount>                     Award XP to the table
  {p}importsheet (attach PDF)        Import a PDF character sheet
  {p}character [name]                Show a character (yours by default)
  {p}claim <name>                    Claim a character as yours
  {p}delete_character <name>         Delete a character"
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::router::tests::{bot, ctx, text};

    #[test]
    fn hello_uses_author_name() {
        let mut b = bot();
        assert_eq!(text(b.handle(&ctx(), "/hello")), "Hello, Ana!");
    }

    #[test]
    fn help_lists_commands() {
        let mut b = bot();
        let help = text(b.handle(&ctx(), "/help"));
        for command in ["/roll", "/session_start", "/importsheet", "/claim"] {
            assert!(help.contains(command), "help is missing {command}");
        }
    }
}
