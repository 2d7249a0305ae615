use tk_mechanics::DiceExpr;
use tk_mechanics::loot::{ChestSize, ItemFilter, random_item, random_loot, render_item, render_loot};

use super::{Bot, Context};
use crate::reply::Reply;

const MONSTER_LIST_LIMIT: usize = 25;

impl Bot {
    pub(super) fn do_roll(&mut self, ctx: &Context, rest: &str) -> Reply {
        if rest.is_empty() {
            return self.usage("roll", "<dice>");
        }
        let expr = match DiceExpr::parse(rest) {
            Ok(expr) => expr,
            Err(e) => return Reply::text(format!("Invalid dice: {e}")),
        };
        let roll = expr.roll(&mut self.rng);
        self.tracker.record_roll(&ctx.guild, &ctx.author_name, &roll);

        let mut text = roll.to_string();
        if roll.is_natural_twenty() {
            text.push_str("\nNatural 20!");
        }
        Reply::Text(text)
    }

    pub(super) fn do_monster(&mut self, ctx: &Context, name: &str) -> Reply {
        let store = self.db.monsters();
        let found = if name.is_empty() {
            store.random(&mut self.rng)
        } else {
            store.find_by_name(name)
        };

        match found {
            Ok(Some(monster)) => {
                self.tracker
                    .record_encounter(&ctx.guild, &ctx.author_name, &[monster.name.as_str()]);
                Reply::Text(monster.to_string())
            }
            Ok(None) if name.is_empty() => {
                Reply::text("The monster manual is empty. Import monsters first.")
            }
            Ok(None) => Reply::text(format!("Could not find a monster with the name {name}.")),
            Err(e) => self.store_failure("looking up monsters", &e),
        }
    }

    pub(super) fn do_monsters(&self, rest: &str) -> Reply {
        let mut words = rest.split_whitespace();
        let Some(kind) = words.next() else {
            return self.usage("monsters", "<type> [legendary]");
        };
        let legendary = words.any(|w| w.eq_ignore_ascii_case("legendary"));

        let monsters = match self
            .db
            .monsters()
            .search(kind, legendary, MONSTER_LIST_LIMIT)
        {
            Ok(monsters) => monsters,
            Err(e) => return self.store_failure("searching monsters", &e),
        };

        let label = if legendary {
            format!("legendary {kind}")
        } else {
            kind.to_string()
        };
        if monsters.is_empty() {
            return Reply::text(format!("No {label} monsters found."));
        }

        let mut text = format!("**{} {label} monsters:**", monsters.len());
        for m in &monsters {
            text.push_str(&format!("\n• {} (AC {}, HP {})", m.name, m.ac, m.hp));
        }
        if monsters.len() == MONSTER_LIST_LIMIT {
            text.push_str("\n...");
        }
        Reply::Text(text)
    }

    pub(super) fn do_item(&mut self, rest: &str) -> Reply {
        let mut words = rest.split_whitespace();
        let rarity = words.next().unwrap_or("random");
        let kind = words.next().unwrap_or("any");
        let magic = words.next().unwrap_or("no");

        match ItemFilter::from_args(rarity, kind, magic) {
            Ok(filter) => Reply::Text(render_item(random_item(&filter, &mut self.rng))),
            Err(e) => Reply::text(format!("{e}. Try common, uncommon, rare, very-rare or legendary.")),
        }
    }

    pub(super) fn do_loot(&mut self, ctx: &Context, rest: &str) -> Reply {
        let chest = rest.split_whitespace().next().unwrap_or("chest");
        let items = random_loot(ChestSize::parse(chest), false, &mut self.rng);

        let names: Vec<&str> = items.iter().map(|i| i.name).collect();
        self.tracker.record_loot(&ctx.guild, &ctx.author_name, &names);
        Reply::Text(render_loot(&items))
    }
}
