//! Typed records produced by the page fetchers.
//!
//! All of them serialize to the JSON shapes returned by the HTTP API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::table::{FromRow, Row};

/// One row of today's mod list, enriched with all-time rank and total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModListEntry {
    /// Display name as shown upstream; the join key against the all-time table.
    pub display_name: String,
    /// All-time rank, `0` when the display name is absent from the all-time table.
    pub rank: u64,
    /// All-time downloads, `0` on the same join miss.
    pub downloads_total: u64,
    pub downloads_today: u64,
    pub downloads_yesterday: u64,
    pub tmodloader_version: String,
    pub internal_name: String,
}

impl FromRow for ModListEntry {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            display_name: row.text("display_name")?,
            downloads_today: row.int("downloads_today")?,
            downloads_yesterday: row.int("downloads_yesterday")?,
            tmodloader_version: row.text("tmodloader_version")?,
            internal_name: row.text("internal_name")?,
            ..Default::default()
        })
    }
}

/// One row of the all-time ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMod {
    pub rank: u64,
    pub display_name: String,
    pub downloads_total: u64,
}

impl FromRow for RankedMod {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            rank: row.int("rank")?,
            display_name: row.text("display_name")?,
            downloads_total: row.int("downloads_total")?,
        })
    }
}

/// Rank and all-time downloads of one mod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTotal {
    pub rank: u64,
    pub downloads_total: u64,
}

/// Display name to rank/total lookup. Keys are compared byte for byte.
pub type RankTotalMap = HashMap<String, RankTotal>;

/// One of an author's mods, from the first table of the author page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorModStats {
    pub rank: u64,
    pub display_name: String,
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
}

impl FromRow for AuthorModStats {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            rank: row.int("rank")?,
            display_name: row.text("display_name")?,
            downloads_total: row.int("downloads_total")?,
            downloads_yesterday: row.int("downloads_yesterday")?,
        })
    }
}

/// A mod the author maintains, from the fourth table of the author page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintainedMod {
    pub internal_name: String,
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
}

impl FromRow for MaintainedMod {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            internal_name: row.text("internal_name")?,
            downloads_total: row.int("downloads_total")?,
            downloads_yesterday: row.int("downloads_yesterday")?,
        })
    }
}

/// Everything known about one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub steam_name: String,
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
    pub mods: Vec<AuthorModStats>,
    pub maintained_mods: Vec<MaintainedMod>,
}

/// Details of a single mod, merged from the mod info JSON, the description
/// form and the icon mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModInfo {
    pub display_name: String,
    pub internal_name: String,
    pub author: String,
    pub homepage: String,
    pub description: String,
    /// Icon URL, empty when the mirror has no icon for the mod.
    pub icon: String,
    pub version: String,
    pub tmodloader_version: String,
    /// Upstream timestamp, untouched.
    pub last_updated: String,
    /// Upstream dependency list, untouched.
    pub mod_dependencies: String,
    pub mod_side: String,
    pub download_link: String,
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
}

/// One published version of a mod and its download count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModVersion {
    pub version: String,
    pub downloads: u64,
    pub tmodloader_version: String,
    pub publish_date: String,
}

impl FromRow for ModVersion {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            version: row.text("version")?,
            downloads: row.int("downloads")?,
            tmodloader_version: row.text("tmodloader_version")?,
            publish_date: row.text("publish_date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_mod_list_entry_from_row_leaves_join_fields_zero() {
        let mut row = Row::new();
        row.push("display_name", Cell::Text("Calamity Mod".to_string()));
        row.push("downloads_today", Cell::Int(10));
        row.push("downloads_yesterday", Cell::Int(20));
        row.push("tmodloader_version", Cell::Text("v0.11.8.9".to_string()));
        row.push("internal_name", Cell::Text("CalamityMod".to_string()));

        let entry = ModListEntry::from_row(&row).unwrap();
        assert_eq!(entry.internal_name, "CalamityMod");
        assert_eq!(entry.rank, 0);
        assert_eq!(entry.downloads_total, 0);
    }

    #[test]
    fn test_author_serializes_snake_case() {
        let author = Author {
            steam_name: "someone".to_string(),
            downloads_total: 5,
            downloads_yesterday: 1,
            mods: Vec::new(),
            maintained_mods: Vec::new(),
        };
        let json = serde_json::to_value(&author).unwrap();

        assert_eq!(json["steam_name"], "someone");
        assert!(json["maintained_mods"].is_array());
    }
}
