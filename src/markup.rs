/*!
 * Section markup handling.
 *
 * Chapter sections are stored as XHTML. Before chunking we re-serialize the
 * markup through an event round-trip to get a canonical string form with the
 * tags kept literally in place; the inspector instead wants the plain text
 * with tags stripped and entities resolved.
 */

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use regex::Regex;

use crate::errors::BookError;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Re-serialize section markup into its canonical string form.
///
/// Tags, attributes and entity references pass through unchanged; this only
/// normalizes the serialization so the chunker always sees the same string
/// for the same document structure.
pub fn canonicalize(markup: &str) -> Result<String, BookError> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => writer
                .write_event(event)
                .map_err(|e| BookError::Markup(e.to_string()))?,
            Err(e) => return Err(e.into()),
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|_| BookError::Markup("Re-serialized markup is not valid UTF-8".into()))
}

/// Extract the plain text of section markup, with tags stripped and
/// entity references resolved
pub fn extract_text(markup: &str) -> Result<String, BookError> {
    let mut reader = Reader::from_str(markup);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    text.push_str(&resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(text)
}

/// Collapse runs of two-or-more newlines into a single newline
pub fn collapse_newlines(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text, "\n").into_owned()
}

/// Resolve an entity reference to its text, covering the predefined XML
/// entities plus numeric character references like &#160; and &#xA0;
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => Some("'".to_string()),
        "quot" => Some("\"".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "amp" => Some("&".to_string()),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = if let Some(hex) = code.strip_prefix('x').or_else(|| code.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                code.parse::<u32>().ok()?
            };
            char::from_u32(value).map(|c| c.to_string())
        }
    }
}
