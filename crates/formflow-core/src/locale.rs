//! Locale-dependent number symbols.
//!
//! A [`Locale`] pairs a tag such as `de_AT` with the decimal and grouping
//! separators used to format and parse numbers in that locale. Symbols come
//! from a built-in table; lookups fall back from `lang_REGION` to `lang` and
//! finally to the root locale (`.` and `,`).
//!
//! ```
//! use formflow_core::locale::Locale;
//!
//! let locale = Locale::new("de-AT");
//! assert_eq!(locale.tag(), "de_AT");
//! assert_eq!(locale.symbols().decimal, ',');
//! assert_eq!(locale.symbols().group, '\u{a0}');
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

/// Decimal and grouping separators of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: char,
}

impl NumberSymbols {
    const fn new(decimal: char, group: char) -> Self {
        Self { decimal, group }
    }

    /// Returns `true` when the grouping separator is a kind of space.
    pub const fn group_is_space(&self) -> bool {
        matches!(self.group, ' ' | '\u{a0}' | '\u{202f}')
    }
}

/// The symbols of the root locale.
pub const ROOT_SYMBOLS: NumberSymbols = NumberSymbols::new('.', ',');

const NBSP: char = '\u{a0}';
const NNBSP: char = '\u{202f}';

fn symbol_table() -> &'static HashMap<&'static str, NumberSymbols> {
    static TABLE: OnceLock<HashMap<&'static str, NumberSymbols>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("en", NumberSymbols::new('.', ',')),
            ("ja", NumberSymbols::new('.', ',')),
            ("zh", NumberSymbols::new('.', ',')),
            ("de", NumberSymbols::new(',', '.')),
            ("de_AT", NumberSymbols::new(',', NBSP)),
            ("de_CH", NumberSymbols::new('.', '\u{2019}')),
            ("fr", NumberSymbols::new(',', NNBSP)),
            ("fr_CH", NumberSymbols::new(',', NNBSP)),
            ("ru", NumberSymbols::new(',', NBSP)),
            ("fi", NumberSymbols::new(',', NBSP)),
            ("bg", NumberSymbols::new(',', NBSP)),
            ("pl", NumberSymbols::new(',', NBSP)),
            ("pt", NumberSymbols::new(',', NBSP)),
            ("sv", NumberSymbols::new(',', NBSP)),
            ("pt_BR", NumberSymbols::new(',', '.')),
            ("it", NumberSymbols::new(',', '.')),
            ("es", NumberSymbols::new(',', '.')),
            ("nl", NumberSymbols::new(',', '.')),
        ])
    })
}

/// A locale tag with its resolved number symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    symbols: NumberSymbols,
}

impl Locale {
    /// Resolves a locale tag. Both `de-AT` and `de_AT` are accepted.
    pub fn new(tag: &str) -> Self {
        let tag = tag.replace('-', "_");
        let symbols = lookup(&tag);
        Self { tag, symbols }
    }

    /// The root locale: `.` as decimal and `,` as grouping separator.
    pub fn root() -> Self {
        Self {
            tag: "root".to_string(),
            symbols: ROOT_SYMBOLS,
        }
    }

    /// The normalized tag, with `_` between language and region.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub const fn symbols(&self) -> NumberSymbols {
        self.symbols
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

fn lookup(tag: &str) -> NumberSymbols {
    let table = symbol_table();
    if let Some(symbols) = table.get(tag) {
        return *symbols;
    }
    if let Some((lang, _)) = tag.split_once('_') {
        if let Some(symbols) = table.get(lang) {
            tracing::debug!(locale = tag, fallback = lang, "Using language number symbols");
            return *symbols;
        }
    }
    tracing::debug!(locale = tag, "Unknown locale, using root number symbols");
    ROOT_SYMBOLS
}
