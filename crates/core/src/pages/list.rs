//! Today's mod list joined with the all-time ranking.

use tracing::debug;

use crate::fetch::Upstream;
use crate::parse::Document;
use crate::records::{ModListEntry, RankTotal, RankTotalMap, RankedMod};
use crate::table::{PageKind, extract};
use crate::Result;

pub const DAILY_LIST_PAGE: &str = "modmigrationprogress.php";
pub const ALL_TIME_PAGE: &str = "modmigrationprogressalltime.php";

/// Fetches today's list. Rank and total are left at zero.
pub async fn fetch_daily_list(upstream: &Upstream) -> Result<Vec<ModListEntry>> {
    let doc = upstream.get_html(upstream.site_url(DAILY_LIST_PAGE, &[])?).await?;
    extract(&doc, PageKind::ModList)
}

/// Builds the display name to rank/total map from a parsed all-time page.
///
/// A name listed twice keeps its last row.
pub fn rank_total_map(doc: &Document) -> Result<RankTotalMap> {
    let ranked: Vec<RankedMod> = extract(doc, PageKind::AllTimeRanks)?;

    Ok(ranked
        .into_iter()
        .map(|m| (m.display_name, RankTotal { rank: m.rank, downloads_total: m.downloads_total }))
        .collect())
}

/// Fetches the all-time ranking as a lookup map.
pub async fn build_rank_total_map(upstream: &Upstream) -> Result<RankTotalMap> {
    let doc = upstream.get_html(upstream.site_url(ALL_TIME_PAGE, &[])?).await?;
    rank_total_map(&doc)
}

/// Copies rank and total onto every entry whose display name is a key of
/// `totals`.
///
/// Names are matched exactly. A miss is not an error: the entry keeps rank
/// and total at zero.
pub fn join_rank_totals(list: &mut [ModListEntry], totals: &RankTotalMap) {
    for entry in list.iter_mut() {
        match totals.get(&entry.display_name) {
            Some(found) => {
                entry.rank = found.rank;
                entry.downloads_total = found.downloads_total;
            }
            None => debug!(display_name = %entry.display_name, "no all-time row for mod"),
        }
    }
}

/// Today's list with all-time rank and total filled in.
///
/// Both pages are fetched concurrently and either failing fails the call.
pub async fn get_mod_list(upstream: &Upstream) -> Result<Vec<ModListEntry>> {
    let (mut list, totals) = tokio::try_join!(fetch_daily_list(upstream), build_rank_total_map(upstream))?;
    join_rank_totals(&mut list, &totals);
    debug!(mods = list.len(), "mod list assembled");
    Ok(list)
}

/// Number of mods in today's list.
///
/// Only the data rows of the page's first table are counted. Later tables
/// and the header row are ignored.
pub async fn count_mods(upstream: &Upstream) -> Result<usize> {
    Ok(fetch_daily_list(upstream).await?.len())
}
