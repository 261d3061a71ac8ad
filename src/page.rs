use std::io;

use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, Serializer};

use crate::listing::{cards, ListingQuery, SortKey};
use crate::server::Storefront;
use crate::templates;
use crate::Error;

/// JSON formatter that keeps string contents inert inside a `<script>` block.
struct ScriptSafeFormatter(CompactFormatter);

impl Formatter for ScriptSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\'' => "\\u0027",
                _ => continue,
            };
            writer.write_all(fragment[start..index].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = index + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => self.0.write_char_escape(writer, other),
        }
    }
}

pub fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, ScriptSafeFormatter(CompactFormatter));
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Sort applied when the page is opened without one, matching the first
/// entry of the sort control.
pub const DEFAULT_SORT: SortKey = SortKey::DateAsc;

/// An `<option>` of one of the select controls.
pub struct Choice<'a> {
    pub value: &'a str,
    pub label: &'a str,
    pub selected: bool,
}

pub fn render(
    storefront: &Storefront,
    notice: Option<&str>,
    query: &ListingQuery,
) -> Result<Vec<u8>, Error> {
    let catalog = storefront.catalog();
    let site = storefront.site();
    let sort = query.sort.unwrap_or(DEFAULT_SORT);

    let cities: Vec<Choice> = catalog
        .cities()
        .into_iter()
        .map(|city| Choice {
            value: city,
            label: city,
            selected: query.city == city,
        })
        .collect();
    let sorts: Vec<Choice> = SortKey::CHOICES
        .iter()
        .map(|(key, label)| Choice {
            value: key.as_str(),
            label: *label,
            selected: *key == sort,
        })
        .collect();
    let catalog_json = script_safe_json(catalog.events())?;
    let cards = cards(catalog, query, sort, &site.currency);

    let mut buf = Vec::new();
    templates::page_html(
        &mut buf,
        site,
        notice,
        query,
        &cities,
        &sorts,
        &catalog_json,
        &cards,
    )?;
    Ok(buf)
}
