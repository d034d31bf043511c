//! Author statistics page (`ranksbysteamid.php`).
//!
//! The page has four tables. The first lists the author's mods by rank and
//! the fourth the mods they maintain. Overall totals are not in a table at
//! all: they are the bare text right after the first two `<br>` tags of the
//! body, prefixed with a fixed label.

use scraper::ElementRef;
use tracing::debug;

use crate::dom::{find_by_tag, following_text};
use crate::fetch::Upstream;
use crate::parse::Document;
use crate::records::{Author, AuthorModStats, MaintainedMod};
use crate::steam::{SteamClient, SteamId64};
use crate::table::{PageKind, extract, parse_int};
use crate::{ModStatsError, Result};

pub const AUTHOR_PAGE: &str = "tools/ranksbysteamid.php";
pub const TOTAL_LABEL: &str = "Total Downloads: ";
pub const YESTERDAY_LABEL: &str = "Yesterday Downloads: ";

/// Everything the author page itself provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPage {
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
    pub mods: Vec<AuthorModStats>,
    pub maintained_mods: Vec<MaintainedMod>,
}

fn labelled_count(br: Option<ElementRef<'_>>, label: &'static str, field: &'static str) -> Result<u64> {
    let text = br.and_then(following_text).ok_or(ModStatsError::MissingLabel { label })?;
    let value = text.strip_prefix(label).ok_or(ModStatsError::MissingLabel { label })?;
    parse_int(field, value)
}

/// Extracts both tables and the two labelled totals from a parsed page.
pub fn parse_author_page(doc: &Document) -> Result<AuthorPage> {
    let mods = extract(doc, PageKind::AuthorMods)?;
    let maintained_mods = extract(doc, PageKind::AuthorMaintained)?;

    let body = doc.find_by_tag("body")?[0];
    let brs = find_by_tag(body, "br")?;
    let downloads_total = labelled_count(brs.first().copied(), TOTAL_LABEL, "downloads_total")?;
    let downloads_yesterday = labelled_count(brs.get(1).copied(), YESTERDAY_LABEL, "downloads_yesterday")?;

    Ok(AuthorPage { downloads_total, downloads_yesterday, mods, maintained_mods })
}

/// Fetches and parses the author page of `id`.
pub async fn fetch_author_page(upstream: &Upstream, id: SteamId64) -> Result<AuthorPage> {
    let steamid = id.to_string();
    let url = upstream.site_url(AUTHOR_PAGE, &[("steamid64", steamid.as_str())])?;
    let doc = upstream.get_html(url).await?;
    parse_author_page(&doc)
}

/// Author statistics for `id`: Steam persona name plus the author page.
///
/// The Steam lookup runs first, so an id without a profile never reaches the
/// statistics site.
pub async fn get_author_stats(upstream: &Upstream, steam: &SteamClient, id: SteamId64) -> Result<Author> {
    let profile = steam.profile(id).await?;
    let page = fetch_author_page(upstream, id).await?;
    debug!(%id, mods = page.mods.len(), maintained = page.maintained_mods.len(), "author page parsed");

    Ok(Author {
        steam_name: profile.personaname,
        downloads_total: page.downloads_total,
        downloads_yesterday: page.downloads_yesterday,
        mods: page.mods,
        maintained_mods: page.maintained_mods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(totals: &str) -> String {
        format!(
            "<html><body><h1>Author</h1>{}\
             <table><tr><th>Rank</th><th>Name</th><th>Total</th><th>Yesterday</th></tr>\
             <tr><td>12</td><td>Fargo's Mod</td><td>15000</td><td>42</td></tr>\
             <tr><td>300</td><td>Fargo's Souls</td><td>900</td><td>3</td></tr></table>\
             <table><tr><th>x</th></tr></table>\
             <table><tr><th>y</th></tr></table>\
             <table><tr><th>Name</th><th>Total</th><th>Yesterday</th></tr>\
             <tr><td>Fargowiltas</td><td>15000</td><td>42</td></tr></table>\
             </body></html>",
            totals
        )
    }

    #[test]
    fn test_parse_author_page() {
        let doc = Document::parse(&page("<br>Total Downloads: 15900<br>Yesterday Downloads: 45<br>"));
        let author = parse_author_page(&doc).unwrap();

        assert_eq!(author.downloads_total, 15900);
        assert_eq!(author.downloads_yesterday, 45);
        assert_eq!(author.mods.len(), 2);
        assert_eq!(author.mods[1].rank, 300);
        assert_eq!(author.mods[0].display_name, "Fargo's Mod");
        assert_eq!(
            author.maintained_mods,
            vec![MaintainedMod { internal_name: "Fargowiltas".to_string(), downloads_total: 15000, downloads_yesterday: 42 }]
        );
    }

    #[test]
    fn test_label_mismatch() {
        let doc = Document::parse(&page("<br>Downloads: 15900<br>Yesterday Downloads: 45"));
        let result = parse_author_page(&doc);

        assert!(matches!(result, Err(ModStatsError::MissingLabel { label: TOTAL_LABEL })));
    }

    #[test]
    fn test_missing_second_br() {
        let doc = Document::parse(&page("<br>Total Downloads: 15900"));
        let result = parse_author_page(&doc);

        assert!(matches!(result, Err(ModStatsError::MissingLabel { label: YESTERDAY_LABEL })));
    }

    #[test]
    fn test_no_br_at_all() {
        let doc = Document::parse(&page(""));
        let result = parse_author_page(&doc);

        assert!(matches!(result, Err(ModStatsError::MissingElement { ref tag }) if tag == "br"));
    }

    #[test]
    fn test_non_numeric_total() {
        let doc = Document::parse(&page("<br>Total Downloads: many<br>Yesterday Downloads: 45"));
        let result = parse_author_page(&doc);

        assert!(matches!(result, Err(ModStatsError::InvalidNumber { field: "downloads_total", .. })));
    }

    #[test]
    fn test_too_few_tables() {
        let doc = Document::parse(
            "<html><body><br>Total Downloads: 1<br>Yesterday Downloads: 1\
             <table><tr><th>h</th></tr></table></body></html>",
        );
        let result = parse_author_page(&doc);

        assert!(matches!(result, Err(ModStatsError::MissingTable { index: 3, found: 1 })));
    }
}
