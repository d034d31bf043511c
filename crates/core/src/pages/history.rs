//! Per-version download history of a mod.

use crate::fetch::Upstream;
use crate::pages::validate_mod_name;
use crate::records::ModVersion;
use crate::table::{PageKind, extract};
use crate::Result;

pub const HISTORY_PAGE: &str = "tools/moddownloadhistory.php";

/// Fetches the history table of `name`, newest version first as listed
/// upstream.
pub async fn fetch_mod_history(upstream: &Upstream, name: &str) -> Result<Vec<ModVersion>> {
    let url = upstream.site_url(HISTORY_PAGE, &[("modname", name)])?;
    let doc = upstream.get_html(url).await?;
    extract(&doc, PageKind::ModHistory)
}

/// Validates `name` and fetches its history.
pub async fn get_mod_history(upstream: &Upstream, name: &str) -> Result<Vec<ModVersion>> {
    let name = validate_mod_name(name)?;
    fetch_mod_history(upstream, name).await
}
