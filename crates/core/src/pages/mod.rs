//! One fetcher per upstream page, plus the operations that combine them.
//!
//! Fetchers issue exactly one request each. Parsing is split into plain
//! functions over a [`Document`](crate::Document) so the page shapes can be
//! tested against saved fixtures without a network.

pub mod author;
pub mod history;
pub mod info;
pub mod list;

pub use author::{AuthorPage, fetch_author_page, get_author_stats, parse_author_page};
pub use history::{fetch_mod_history, get_mod_history};
pub use info::{ModDescription, ModSummary, fetch_icon, fetch_mod_description, fetch_mod_summary, get_mod_info};
pub use list::{build_rank_total_map, count_mods, fetch_daily_list, get_mod_list, join_rank_totals, rank_total_map};

use crate::{ModStatsError, Result};

/// Checks a mod's internal name before it is put into any URL.
///
/// Internal names are identifiers: letters, digits and underscores.
pub fn validate_mod_name(name: &str) -> Result<&str> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ModStatsError::InvalidModName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CalamityMod", true)]
    #[case("Fargowiltas_Souls", true)]
    #[case("", false)]
    #[case("Calamity Mod", false)]
    #[case("../etc/passwd", false)]
    #[case("a?b=c", false)]
    fn test_validate_mod_name(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(validate_mod_name(name).is_ok(), valid);
    }
}
