use std::path::Path;

use tk_bot::{BotConfig, BotResult};
use tk_store::Database;

pub fn show(config: &BotConfig, name: &str) -> BotResult<()> {
    let store = Database::open(&config.database)?.monsters();
    let name = name.trim();
    let found = if name.is_empty() {
        store.random(&mut super::rng(config))?
    } else {
        store.find_by_name(name)?
    };

    match found {
        Some(monster) => println!("{monster}"),
        None if name.is_empty() => println!("The monster manual is empty. Import monsters first."),
        None => println!("Could not find a monster with the name {name}."),
    }
    Ok(())
}

pub fn import(config: &BotConfig, file: &Path) -> BotResult<()> {
    let json = std::fs::read_to_string(file)?;
    let store = Database::open(&config.database)?.monsters();
    let count = store.import_json(&json)?;
    println!("Imported {count} monsters ({} in the manual).", store.count()?);
    Ok(())
}
