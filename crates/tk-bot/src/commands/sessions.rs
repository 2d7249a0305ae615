use comfy_table::{ContentArrangement, Table};
use tk_bot::{BotConfig, BotResult};
use tk_session::GuildId;
use tk_store::Database;

pub fn list(config: &BotConfig, guild: Option<&str>, limit: usize) -> BotResult<()> {
    let store = Database::open(&config.database)?.sessions();
    let records = match guild {
        Some(guild) => store.recent(&GuildId::from(guild), limit)?,
        None => store.recent_all(limit)?,
    };

    if records.is_empty() {
        println!("  No archived sessions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Guild", "#", "Location", "Level", "Started", "Length", "Players", "XP",
    ]);

    for r in &records {
        let minutes = (r.ended_at - r.started_at).num_minutes().max(0);
        let players = if r.players.is_empty() {
            "—".to_string()
        } else {
            r.players.clone()
        };
        table.add_row(vec![
            r.guild_id.to_string(),
            r.number.to_string(),
            r.location.clone(),
            r.level.to_string(),
            r.started_at.format("%Y-%m-%d %H:%M").to_string(),
            format!("{}h {}m", minutes / 60, minutes % 60),
            players,
            r.xp_given.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} sessions", records.len());
    Ok(())
}
