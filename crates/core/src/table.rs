//! Positional table extraction.
//!
//! Upstream tables have no stable ids or header names, only column order.
//! Every page shape is described once by a [`TableLayout`] (which `<tbody>`
//! of the page and which cell feeds which field). The mapper drops the header
//! row and turns every remaining `<tr>` into a [`Row`] of named cells, which a
//! [`FromRow`] record then consumes.
//!
//! A layout change upstream means editing [`PageKind::layout`], nothing else.

use scraper::ElementRef;

use crate::dom::{find_by_tag, text_content};
use crate::parse::Document;
use crate::{ModStatsError, Result};

/// How a cell's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept verbatim, whitespace included.
    Text,
    /// Trimmed and parsed as an unsigned integer.
    Int,
}

/// One field read from a fixed cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub index: usize,
    pub kind: FieldKind,
}

const fn text(field: &'static str, index: usize) -> Column {
    Column { field, index, kind: FieldKind::Text }
}

const fn int(field: &'static str, index: usize) -> Column {
    Column { field, index, kind: FieldKind::Int }
}

/// Where a page's data lives: the `<tbody>` index and its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub table: usize,
    pub columns: &'static [Column],
}

/// Every table shape served by the upstream site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Today's mod list (`modmigrationprogress.php`).
    ModList,
    /// All-time ranking (`modmigrationprogressalltime.php`).
    AllTimeRanks,
    /// First table of the author page: the author's mods by rank.
    AuthorMods,
    /// Fourth table of the author page: mods the author maintains.
    AuthorMaintained,
    /// Per-version download history of one mod.
    ModHistory,
}

const MOD_LIST: &[Column] = &[
    text("display_name", 0),
    int("downloads_today", 1),
    int("downloads_yesterday", 2),
    text("tmodloader_version", 3),
    text("internal_name", 4),
];

const ALL_TIME_RANKS: &[Column] = &[int("rank", 0), text("display_name", 1), int("downloads_total", 2)];

const AUTHOR_MODS: &[Column] = &[
    int("rank", 0),
    text("display_name", 1),
    int("downloads_total", 2),
    int("downloads_yesterday", 3),
];

const AUTHOR_MAINTAINED: &[Column] = &[
    text("internal_name", 0),
    int("downloads_total", 1),
    int("downloads_yesterday", 2),
];

const MOD_HISTORY: &[Column] = &[
    text("version", 0),
    int("downloads", 1),
    text("tmodloader_version", 2),
    text("publish_date", 3),
];

impl PageKind {
    pub const fn layout(self) -> TableLayout {
        match self {
            Self::ModList => TableLayout { table: 0, columns: MOD_LIST },
            Self::AllTimeRanks => TableLayout { table: 0, columns: ALL_TIME_RANKS },
            Self::AuthorMods => TableLayout { table: 0, columns: AUTHOR_MODS },
            Self::AuthorMaintained => TableLayout { table: 3, columns: AUTHOR_MAINTAINED },
            Self::ModHistory => TableLayout { table: 0, columns: MOD_HISTORY },
        }
    }
}

/// A converted cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(u64),
}

/// The named cells of one data row, in layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(&'static str, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, cell: Cell) {
        self.cells.push((field, cell));
    }

    fn get(&self, field: &str) -> Result<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, cell)| cell)
            .ok_or_else(|| ModStatsError::Config(format!("table layout has no field `{}`", field)))
    }

    /// Gets a text field.
    pub fn text(&self, field: &str) -> Result<String> {
        match self.get(field)? {
            Cell::Text(value) => Ok(value.clone()),
            Cell::Int(_) => Err(ModStatsError::Config(format!("field `{}` is numeric", field))),
        }
    }

    /// Gets a numeric field.
    pub fn int(&self, field: &str) -> Result<u64> {
        match self.get(field)? {
            Cell::Int(value) => Ok(*value),
            Cell::Text(_) => Err(ModStatsError::Config(format!("field `{}` is not numeric", field))),
        }
    }
}

/// Records that can be built from one mapped table row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

/// Parses a numeric cell, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`ModStatsError::InvalidNumber`] naming `field` and the raw text.
pub fn parse_int(field: &'static str, text: &str) -> Result<u64> {
    text.trim()
        .parse()
        .map_err(|_| ModStatsError::InvalidNumber { field, value: text.to_string() })
}

/// Reads the layout's cells out of one `<tr>`.
pub fn read_row(tr: ElementRef<'_>, columns: &[Column]) -> Result<Row> {
    let cells = find_by_tag(tr, "td")?;
    let mut row = Row::new();

    for column in columns {
        let cell = cells.get(column.index).ok_or_else(|| ModStatsError::MissingCell {
            field: column.field,
            index: column.index,
            found: cells.len(),
        })?;
        let content = text_content(*cell);
        let value = match column.kind {
            FieldKind::Text => Cell::Text(content),
            FieldKind::Int => Cell::Int(parse_int(column.field, &content)?),
        };
        row.push(column.field, value);
    }

    Ok(row)
}

/// Maps every data row of `tbody` to a record, in row order.
///
/// The first `<tr>` is the header and is always skipped, whatever it holds.
/// The first failing row fails the whole table.
///
/// # Example
///
/// ```rust
/// use modstats_core::{AuthorModStats, Document, PageKind, map_table};
///
/// let doc = Document::parse(
///     "<table><tr><td>H</td></tr><tr><td>3</td><td>Fargo's Mod</td><td>15000</td><td>42</td></tr></table>",
/// );
/// let tbody = doc.table(0).unwrap();
/// let mods: Vec<AuthorModStats> = map_table(tbody, PageKind::AuthorMods.layout().columns).unwrap();
/// assert_eq!(mods[0].rank, 3);
/// ```
pub fn map_table<T: FromRow>(tbody: ElementRef<'_>, columns: &[Column]) -> Result<Vec<T>> {
    let rows = find_by_tag(tbody, "tr")?;

    rows.into_iter()
        .skip(1)
        .map(|tr| read_row(tr, columns).and_then(|row| T::from_row(&row)))
        .collect()
}

/// Locates the table of `page` in `doc` and maps it.
pub fn extract<T: FromRow>(doc: &Document, page: PageKind) -> Result<Vec<T>> {
    let layout = page.layout();
    let tbody = doc.table(layout.table)?;
    map_table(tbody, layout.columns)
}
