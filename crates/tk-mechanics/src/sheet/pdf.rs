//! AcroForm field extraction.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{MechError, MechResult};

/// Nested form fields deeper than this are ignored.
const MAX_FIELD_DEPTH: usize = 16;

/// Forms with more fields than this are rejected.
const MAX_FIELDS: usize = 4096;

/// Read every form field in a PDF as `fully.qualified.name -> value`.
///
/// Fields without a value map to an empty string.
pub fn read_form_fields(path: &Path) -> MechResult<BTreeMap<String, String>> {
    let doc = Document::load(path).map_err(|e| MechError::Pdf(e.to_string()))?;
    form_fields(&doc)
}

/// Like [`read_form_fields`], for a PDF already in memory.
pub fn read_form_fields_from_bytes(bytes: &[u8]) -> MechResult<BTreeMap<String, String>> {
    let doc = Document::load_mem(bytes).map_err(|e| MechError::Pdf(e.to_string()))?;
    form_fields(&doc)
}

fn form_fields(doc: &Document) -> MechResult<BTreeMap<String, String>> {
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| MechError::Pdf("document has no catalog".into()))?;
    let catalog = as_dict(doc, root)?;
    let acroform = catalog
        .get(b"AcroForm")
        .map_err(|_| MechError::Pdf("document has no form fields".into()))?;
    let fields = as_dict(doc, acroform)?
        .get(b"Fields")
        .map_err(|_| MechError::Pdf("form has no field list".into()))?;

    let mut walker = FieldWalker {
        doc,
        seen: HashSet::new(),
        visited: 0,
        out: BTreeMap::new(),
    };
    for field in as_array(doc, fields)? {
        walker.collect(field, None, 0)?;
    }
    tracing::debug!(fields = walker.out.len(), "read form fields");
    Ok(walker.out)
}

/// Depth-first walk over the field tree.
///
/// Each indirect field object is entered at most once, so cyclic or
/// shared `Kids` arrays cannot blow up the walk.
struct FieldWalker<'a> {
    doc: &'a Document,
    seen: HashSet<ObjectId>,
    visited: usize,
    out: BTreeMap<String, String>,
}

impl FieldWalker<'_> {
    /// Mark `field` as entered. Returns false when it was entered before.
    fn enter(&mut self, field: &Object) -> MechResult<bool> {
        if let Object::Reference(id) = field
            && !self.seen.insert(*id)
        {
            return Ok(false);
        }
        self.visited += 1;
        if self.visited > MAX_FIELDS {
            return Err(MechError::Pdf(format!("form has more than {MAX_FIELDS} fields")));
        }
        Ok(true)
    }

    fn collect(&mut self, field: &Object, parent: Option<&str>, depth: usize) -> MechResult<()> {
        if depth > MAX_FIELD_DEPTH || !self.enter(field)? {
            return Ok(());
        }
        let doc = self.doc;
        let dict = as_dict(doc, field)?;

        // Widget annotations carry no partial name of their own.
        let Some(partial) = dict.get(b"T").ok().map(|t| object_text(doc, t)) else {
            return Ok(());
        };
        let name = match parent {
            Some(p) => format!("{p}.{partial}"),
            None => partial,
        };

        let mut named_kids = 0;
        if let Ok(kids) = dict.get(b"Kids") {
            for kid in as_array(doc, kids)? {
                if is_seen(&self.seen, kid) || !as_dict(doc, kid)?.has(b"T") {
                    continue;
                }
                named_kids += 1;
                self.collect(kid, Some(&name), depth + 1)?;
            }
        }

        if named_kids == 0 || dict.has(b"V") {
            let value = dict
                .get(b"V")
                .map(|v| object_text(doc, v))
                .unwrap_or_default();
            self.out.insert(name, value);
        }
        Ok(())
    }
}

fn is_seen(seen: &HashSet<ObjectId>, obj: &Object) -> bool {
    matches!(obj, Object::Reference(id) if seen.contains(id))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> MechResult<&'a Object> {
    let mut current = obj;
    for _ in 0..MAX_FIELD_DEPTH {
        match current {
            Object::Reference(id) => {
                current = doc
                    .get_object(*id)
                    .map_err(|e| MechError::Pdf(e.to_string()))?;
            }
            other => return Ok(other),
        }
    }
    Err(MechError::Pdf("reference chain too deep".into()))
}

fn as_dict<'a>(doc: &'a Document, obj: &'a Object) -> MechResult<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(dict) => Ok(dict),
        Object::Stream(stream) => Ok(&stream.dict),
        _ => Err(MechError::Pdf("expected a dictionary".into())),
    }
}

fn as_array<'a>(doc: &'a Document, obj: &'a Object) -> MechResult<&'a [Object]> {
    match resolve(doc, obj)? {
        Object::Array(items) => Ok(items),
        _ => Err(MechError::Pdf("expected an array".into())),
    }
}

fn object_text(doc: &Document, obj: &Object) -> String {
    match resolve(doc, obj) {
        Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
        Ok(Object::Name(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        Ok(Object::Integer(i)) => i.to_string(),
        Ok(Object::Real(r)) => r.to_string(),
        Ok(Object::Boolean(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Decode a PDF text string: UTF-16BE when it has a byte-order mark,
/// otherwise UTF-8, falling back to Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{StringFormat, dictionary};

    fn text_field(doc: &mut Document, name: &str, value: Option<Object>) -> ObjectId {
        let mut dict = dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal(name),
        };
        if let Some(v) = value {
            dict.set("V", v);
        }
        doc.add_object(dict)
    }

    fn sheet_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let name = text_field(
            &mut doc,
            "CharacterName",
            Some(Object::string_literal("Mira Vale")),
        );
        let race = text_field(
            &mut doc,
            "Race ",
            Some(Object::String(
                vec![0xFE, 0xFF, 0x00, b'E', 0x00, b'l', 0x00, b'f'],
                StringFormat::Hexadecimal,
            )),
        );
        let hp = text_field(&mut doc, "HPMax", None);
        let strength = text_field(&mut doc, "STR", Some(Object::Integer(14)));

        let child = text_field(&mut doc, "Name", Some(Object::string_literal("Bag")));
        let parent = doc.add_object(dictionary! {
            "T" => Object::string_literal("Equipment"),
            "Kids" => vec![Object::Reference(child)],
        });

        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "AcroForm" => dictionary! {
                "Fields" => vec![
                    Object::Reference(name),
                    Object::Reference(race),
                    Object::Reference(hp),
                    Object::Reference(strength),
                    Object::Reference(parent),
                ],
            },
        });
        doc.trailer.set("Root", catalog);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn reads_fields_from_memory() {
        let fields = read_form_fields_from_bytes(&sheet_pdf()).unwrap();
        assert_eq!(fields["CharacterName"], "Mira Vale");
        assert_eq!(fields["Race "], "Elf");
        assert_eq!(fields["HPMax"], "");
        assert_eq!(fields["STR"], "14");
        assert_eq!(fields["Equipment.Name"], "Bag");
        assert!(!fields.contains_key("Equipment"));
    }

    #[test]
    fn reads_fields_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sheet.pdf");
        std::fs::write(&path, sheet_pdf()).unwrap();

        let sheet = crate::CharacterSheet::from_pdf(&path).unwrap();
        assert_eq!(sheet.name, "Mira Vale");
        assert_eq!(sheet.race, "Elf");
    }

    fn form_pdf(doc: &mut Document, fields: Vec<Object>) -> Vec<u8> {
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "AcroForm" => dictionary! { "Fields" => fields },
        });
        doc.trailer.set("Root", catalog);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn self_referencing_kids_are_read_once() {
        let mut doc = Document::with_version("1.5");
        let id = doc.new_object_id();
        doc.objects.insert(
            id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal("Loop"),
                "V" => Object::string_literal("round"),
                "Kids" => vec![Object::Reference(id); 6],
            }),
        );
        let pdf = form_pdf(&mut doc, vec![Object::Reference(id)]);

        let fields = read_form_fields_from_bytes(&pdf).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Loop"], "round");
    }

    #[test]
    fn shared_kids_are_read_once() {
        let mut doc = Document::with_version("1.5");
        let leaf = text_field(&mut doc, "Leaf", Some(Object::string_literal("x")));
        let mut level = leaf;
        for depth in 0..MAX_FIELD_DEPTH {
            level = doc.add_object(dictionary! {
                "T" => Object::string_literal(format!("L{depth}")),
                "Kids" => vec![Object::Reference(level); 8],
            });
        }
        let pdf = form_pdf(&mut doc, vec![Object::Reference(level)]);

        let fields = read_form_fields_from_bytes(&pdf).unwrap();
        assert_eq!(fields.len(), 1);
        assert!(fields.keys().all(|k| k.ends_with(".Leaf")));
    }

    #[test]
    fn rejects_oversized_forms() {
        let mut doc = Document::with_version("1.5");
        let fields: Vec<Object> = (0..=MAX_FIELDS)
            .map(|i| Object::Reference(text_field(&mut doc, &format!("F{i}"), None)))
            .collect();
        let pdf = form_pdf(&mut doc, fields);

        assert!(matches!(
            read_form_fields_from_bytes(&pdf),
            Err(MechError::Pdf(msg)) if msg.contains("more than")
        ));
    }

    #[test]
    fn rejects_non_pdf() {
        assert!(matches!(
            read_form_fields_from_bytes(b"not a pdf"),
            Err(MechError::Pdf(_))
        ));
    }

    #[test]
    fn decode_variants() {
        assert_eq!(decode_pdf_string(b"plain"), "plain");
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_pdf_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }
}
