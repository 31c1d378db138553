//! Shared configuration constants
//!
//! Default selectors and markers describe the DataTables markup of the
//! SkillBridge locations page. All of them can be overridden from `config.yaml`.

/// Chrome user agent string presented by the launched browser
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

pub const TARGET_URL: &str = "https://skillbridge.osd.mil/locations.htm";
pub const DEFAULT_SEARCH_TERM: &str = "*";

pub const SEARCH_INPUT_SELECTOR: &str = "#keywords";
pub const SEARCH_BUTTON_SELECTOR: &str = "#loc-search-btn";
pub const RESULTS_CONTAINER_SELECTOR: &str = "#location-table_wrapper";
pub const ROW_SELECTOR: &str = "#location-table > tbody > tr";
pub const SUMMARY_SELECTOR: &str = "#location-table_info";
pub const NEXT_PAGE_SELECTOR: &str = "#location-table_next";
/// Level-0 group starts only, so the i-th control lines up with the i-th group
pub const EXPAND_CONTROL_SELECTOR: &str =
    "#location-table > tbody > tr.dtrg-group.dtrg-start.dtrg-level-0";
pub const DETAIL_ENTRY_SELECTOR: &str = "li";
pub const DETAIL_LABEL_SELECTOR: &str = ".dtr-title";
pub const DETAIL_VALUE_SELECTOR: &str = ".dtr-data";

/// Classes that together mark the start of a level-0 row group
pub const GROUP_HEADER_CLASSES: [&str; 3] = ["dtrg-group", "dtrg-start", "dtrg-level-0"];
/// Class carried by responsive child rows holding the label/value list
pub const DETAIL_ROW_CLASS: &str = "child";

/// Attribute stamped on expand controls so each one can be addressed directly
pub const EXPAND_MARKER_ATTR: &str = "data-scrape-group";

/// Page load delay the host page needs after an interaction
pub const DEFAULT_SETTLE_MS: u64 = 500;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Ordinary rows narrower than this are layout rows, not records
pub const MIN_RECORD_CELLS: usize = 12;
