//! Row classification by structural marker classes
//!
//! Classification never looks at row content, only at the classes the table
//! widget puts on each `<tr>`.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{DETAIL_ROW_CLASS, GROUP_HEADER_CLASSES};

/// Marker classes identifying group-header and detail rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMarkers {
    /// A row is a group header only when it carries every one of these
    #[serde(default = "default_group_header")]
    pub group_header: Vec<String>,

    #[serde(default = "default_detail")]
    pub detail: String,
}

fn default_group_header() -> Vec<String> {
    GROUP_HEADER_CLASSES.iter().map(|c| c.to_string()).collect()
}

fn default_detail() -> String {
    DETAIL_ROW_CLASS.to_string()
}

impl Default for RowMarkers {
    fn default() -> Self {
        Self {
            group_header: default_group_header(),
            detail: default_detail(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    GroupHeader,
    Detail,
    Ordinary,
}

impl RowKind {
    /// Classify a row from its class list
    pub fn classify<'a>(classes: impl IntoIterator<Item = &'a str>, markers: &RowMarkers) -> Self {
        let classes: Vec<&str> = classes.into_iter().collect();

        let is_group_header = !markers.group_header.is_empty()
            && markers
                .group_header
                .iter()
                .all(|marker| classes.contains(&marker.as_str()));
        if is_group_header {
            return RowKind::GroupHeader;
        }

        if classes.contains(&markers.detail.as_str()) {
            return RowKind::Detail;
        }

        RowKind::Ordinary
    }
}

pub fn classify_row(row: ElementRef<'_>, markers: &RowMarkers) -> RowKind {
    RowKind::classify(row.value().classes(), markers)
}
