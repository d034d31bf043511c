pub mod dom;
pub mod error;
pub mod fetch;
pub mod pages;
pub mod parse;
pub mod records;
pub mod steam;
pub mod table;

pub use dom::{Elements, find_by_tag, following_text, text_content};
pub use error::{ErrorKind, ModStatsError, Result};
pub use fetch::{Endpoints, FetchConfig, Upstream, UpstreamBuilder};
pub use pages::{
    AuthorPage, build_rank_total_map, count_mods, fetch_author_page, fetch_daily_list, fetch_icon,
    fetch_mod_description, fetch_mod_history, fetch_mod_summary, get_author_stats, get_mod_history, get_mod_info,
    get_mod_list, join_rank_totals, parse_author_page, rank_total_map, validate_mod_name,
};
pub use parse::Document;
pub use records::{
    Author, AuthorModStats, MaintainedMod, ModInfo, ModListEntry, ModVersion, RankTotal, RankTotalMap, RankedMod,
};
pub use steam::{SteamClient, SteamId64, SteamProfile};
#[doc(hidden)]
pub use table::{Cell, Column, FieldKind, FromRow, Row};
pub use table::{PageKind, TableLayout, extract, map_table};
