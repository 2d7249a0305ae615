use tk_bot::{BotConfig, BotResult};
use tk_mechanics::DiceExpr;
use tk_mechanics::loot::{ChestSize, ItemFilter, random_item, random_loot, render_item, render_loot};

pub fn roll(config: &BotConfig, dice: &str) -> BotResult<()> {
    let expr = DiceExpr::parse(dice)?;
    let roll = expr.roll(&mut super::rng(config));
    println!("{roll}");
    Ok(())
}

pub fn item(config: &BotConfig, rarity: &str, kind: &str, magic: bool) -> BotResult<()> {
    let mut filter = ItemFilter::from_args(rarity, kind, "no")?;
    filter.magic_only = magic;
    println!("{}", render_item(random_item(&filter, &mut super::rng(config))));
    Ok(())
}

pub fn loot(config: &BotConfig, chest: &str) -> BotResult<()> {
    let items = random_loot(ChestSize::parse(chest), false, &mut super::rng(config));
    println!("{}", render_loot(&items));
    Ok(())
}
