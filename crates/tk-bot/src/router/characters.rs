use tk_mechanics::CharacterSheet;
use tk_store::{StoreError, Upsert};

use super::{Bot, Context};
use crate::embed::{Colour, Embed};
use crate::reply::Reply;

/// Character card: class and level up top, summary fields inline.
pub fn character_embed(sheet: &CharacterSheet) -> Embed {
    let mut embed = Embed::new(&sheet.name, Colour::Blue).description(sheet.class_level_or_default());
    for (label, value) in sheet.summary() {
        embed = embed.inline_field(label, value);
    }
    embed.footer("D&D Character Sheet")
}

impl Bot {
    pub(super) fn do_import_sheet(&mut self, ctx: &Context) -> Reply {
        let Some(pdf) = ctx.pdf_attachment() else {
            return Reply::text(format!(
                "Attach the completed PDF character sheet to {}.",
                self.prefixed("importsheet")
            ));
        };
        tracing::debug!(file = %pdf.filename, bytes = pdf.bytes.len(), "importing sheet");
        let sheet = match CharacterSheet::from_pdf_bytes(&pdf.bytes) {
            Ok(sheet) => sheet,
            Err(e) => return Reply::text(format!("Error importing sheet: {e}")),
        };
        match self.db.characters().upsert(&sheet) {
            Ok(Upsert::Inserted) => Reply::text(format!("Character **{}** imported!", sheet.name)),
            Ok(Upsert::Updated) => Reply::text(format!("Character **{}** updated!", sheet.name)),
            Err(e) => self.store_failure("saving the character", &e),
        }
    }

    pub(super) fn do_character(&self, ctx: &Context, name: &str) -> Reply {
        let store = self.db.characters();
        let found = if name.is_empty() {
            store.get_by_owner(&ctx.author_id)
        } else {
            store.get(name)
        };
        match found {
            Ok(Some(sheet)) => character_embed(&sheet).into(),
            Ok(None) if name.is_empty() => Reply::text(format!(
                "You haven't claimed a character yet. Use {}.",
                self.prefixed("claim <name>")
            )),
            Ok(None) => Reply::text(format!("No character named **{name}**.")),
            Err(e) => self.store_failure("loading the character", &e),
        }
    }

    pub(super) fn do_claim(&mut self, ctx: &Context, name: &str) -> Reply {
        if name.is_empty() {
            return self.usage("claim", "<name>");
        }
        match self.db.characters().set_owner(name, &ctx.author_id) {
            Ok(()) => Reply::text(format!("**{name}** now belongs to {}.", ctx.author_name)),
            Err(StoreError::NotFound(_)) => Reply::text(format!("No character named **{name}**.")),
            Err(e) => self.store_failure("claiming the character", &e),
        }
    }

    pub(super) fn do_delete_character(&mut self, name: &str) -> Reply {
        if name.is_empty() {
            return self.usage("delete_character", "<name>");
        }
        match self.db.characters().delete(name) {
            Ok(true) => Reply::text(format!("Deleted character: {name}")),
            Ok(false) => Reply::text(format!("No character named **{name}**.")),
            Err(e) => self.store_failure("deleting the character", &e),
        }
    }
}
