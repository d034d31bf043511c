//! Mod details from the mod info JSON, the description form and the icon
//! mirror.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::fetch::Upstream;
use crate::pages::validate_mod_name;
use crate::records::ModInfo;
use crate::{ModStatsError, Result};

pub const MOD_INFO_PAGE: &str = "tools/modinfo.php";
pub const DESCRIPTION_PAGE: &str = "moddescription.php";

/// Body of `modinfo.php`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModSummary {
    pub displayname: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub download: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub hot: u64,
    #[serde(default, rename = "updateTimeStamp")]
    pub update_timestamp: String,
    #[serde(default)]
    pub modloaderversion: String,
    #[serde(default)]
    pub modreferences: String,
    #[serde(default)]
    pub modside: String,
}

/// Body of the `moddescription.php` form answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModDescription {
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub description: String,
}

/// Fetches the mod info record.
///
/// The site answers unknown names with a body that is not a record, which
/// surfaces as [`ModStatsError::InvalidModName`].
pub async fn fetch_mod_summary(upstream: &Upstream, name: &str) -> Result<ModSummary> {
    let url = upstream.site_url(MOD_INFO_PAGE, &[("modname", name)])?;

    match upstream.get_json(url).await {
        Err(ModStatsError::Json(e)) => {
            debug!(name, error = %e, "mod info did not decode");
            Err(ModStatsError::InvalidModName(name.to_string()))
        }
        other => other,
    }
}

/// Posts the description form for `name`.
pub async fn fetch_mod_description(upstream: &Upstream, name: &str) -> Result<ModDescription> {
    let url = upstream.site_url(DESCRIPTION_PAGE, &[])?;
    upstream.post_form_json(url, &[("modname", name)]).await
}

/// Looks up the mod's icon on the mirror.
///
/// Returns the icon URL when it exists and an empty string on 404. Any other
/// non-2xx status is an error.
pub async fn fetch_icon(upstream: &Upstream, name: &str) -> Result<String> {
    let url = upstream.icon_url(&format!("{}.png", name))?;
    let status = upstream.get_status(url.clone()).await?;

    if status == StatusCode::NOT_FOUND {
        Ok(String::new())
    } else if status.is_success() {
        Ok(url.to_string())
    } else {
        Err(ModStatsError::Status { url: url.to_string(), status: status.as_u16() })
    }
}

impl ModInfo {
    /// Merges the three upstream answers into one record.
    pub fn assemble(summary: ModSummary, description: ModDescription, icon: String) -> Self {
        Self {
            display_name: summary.displayname,
            internal_name: summary.name,
            author: summary.author,
            homepage: description.homepage,
            description: description.description,
            icon,
            version: summary.version,
            tmodloader_version: summary.modloaderversion,
            last_updated: summary.update_timestamp,
            mod_dependencies: summary.modreferences,
            mod_side: summary.modside,
            download_link: summary.download,
            downloads_total: summary.downloads,
            downloads_yesterday: summary.hot,
        }
    }
}

/// Full details of one mod.
///
/// The info record is fetched first since it is what rejects unknown names;
/// description and icon are then fetched concurrently.
pub async fn get_mod_info(upstream: &Upstream, name: &str) -> Result<ModInfo> {
    let name = validate_mod_name(name)?;
    let summary = fetch_mod_summary(upstream, name).await?;
    let (description, icon) = tokio::try_join!(fetch_mod_description(upstream, name), fetch_icon(upstream, name))?;

    Ok(ModInfo::assemble(summary, description, icon))
}
