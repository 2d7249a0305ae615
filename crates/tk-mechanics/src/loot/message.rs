//! Chat-ready text for item and loot draws.

use super::Item;

/// Header line of a loot message.
pub const LOOT_HEADER: &str = "**You open the loot and find:**";

fn magic_suffix(item: &Item) -> &'static str {
    if item.magic { " (magic)" } else { "" }
}

/// Describe a single item draw.
pub fn render_item(item: Option<&Item>) -> String {
    match item {
        Some(item) => format!(
            "**Item:** {}{}\nRarity: {} | Type: {}",
            item.name,
            magic_suffix(item),
            item.rarity.title(),
            item.kind_title()
        ),
        None => "I couldn't find an item matching those filters.".to_string(),
    }
}

/// Describe a loot pile as a numbered list.
pub fn render_loot(items: &[&Item]) -> String {
    if items.is_empty() {
        return "The chest is empty...".to_string();
    }
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}. {}{} — {} {}",
                idx + 1,
                item.name,
                magic_suffix(item),
                item.rarity.title(),
                item.kind_title()
            )
        })
        .collect();
    format!("{LOOT_HEADER}\n{}", lines.join("\n"))
}
