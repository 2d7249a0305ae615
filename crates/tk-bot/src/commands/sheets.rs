use std::path::Path;

use tk_bot::{BotConfig, BotResult, character_embed, console};
use tk_mechanics::CharacterSheet;
use tk_store::{Database, Upsert};

pub fn import(config: &BotConfig, pdf: &Path, owner: Option<&str>) -> BotResult<()> {
    let mut sheet = CharacterSheet::from_pdf(pdf)?;
    sheet.owner = owner.map(str::to_string);

    let store = Database::open(&config.database)?.characters();
    let verb = match store.upsert(&sheet)? {
        Upsert::Inserted => "imported",
        Upsert::Updated => "updated",
    };
    println!("Character {} {verb}.\n", sheet.name);

    let mut stdout = std::io::stdout().lock();
    console::write_reply(&mut stdout, &character_embed(&sheet).into())?;
    Ok(())
}
