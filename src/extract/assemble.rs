//! Record assembly for one row group
//!
//! A group starts at a group-header row and extends over every following row
//! up to (not including) the next group header. Ordinary rows open a new
//! opportunity; detail rows fold their label/value list into the opportunity
//! that is currently open.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::classify::{RowKind, RowMarkers, classify_row};
use crate::model::{DetailField, Location, Opportunity};
use crate::utils::constants::MIN_RECORD_CELLS;

static SHOW_PIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ShowPin\(\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*,")
        .expect("ShowPin pattern is a valid regex")
});

/// Compiled selectors needed inside one group
#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub markers: RowMarkers,
    pub detail_entry: Selector,
    pub detail_label: Selector,
    pub detail_value: Selector,
}

/// Build one [`Location`] from a group-header row and the rows after it
pub fn assemble<'a>(
    layout: &GroupLayout,
    header: ElementRef<'a>,
    following: impl IntoIterator<Item = ElementRef<'a>>,
) -> Location {
    let company = row_cells(header)
        .first()
        .copied()
        .map(element_text)
        .unwrap_or_default();

    let mut opportunities = Vec::new();
    let mut open: Option<Opportunity> = None;

    for row in following {
        open = match classify_row(row, &layout.markers) {
            RowKind::GroupHeader => break,
            RowKind::Ordinary => match opportunity_from_row(row) {
                Some(next) => {
                    opportunities.extend(open);
                    Some(next)
                }
                None => open,
            },
            // a detail row ahead of any opportunity has nothing to attach to
            RowKind::Detail => open.map(|current| merge_details(layout, current, row)),
        };
    }
    opportunities.extend(open);

    Location {
        company,
        opportunities,
    }
}

/// Map the fixed cell positions of an ordinary row onto a new opportunity
///
/// Rows with fewer than twelve cells are layout rows and yield nothing.
pub fn opportunity_from_row(row: ElementRef<'_>) -> Option<Opportunity> {
    let cells = row_cells(row);
    if cells.len() < MIN_RECORD_CELLS {
        return None;
    }

    let text = |i: usize| element_text(cells[i]);
    let (latitude, longitude) = match pin_coordinates(&cells[0].inner_html()) {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };

    Some(Opportunity {
        program_name: text(1),
        service: text(2),
        city: text(3),
        state: text(4),
        duration: text(5),
        employer_poc: text(6),
        poc_email: text(7),
        cost: text(8),
        delivery_method: text(11),
        latitude,
        longitude,
        ..Default::default()
    })
}

/// Apply every recognised label/value pair of a detail row to `target`
pub fn merge_details(layout: &GroupLayout, mut target: Opportunity, row: ElementRef<'_>) -> Opportunity {
    for (label, value) in detail_entries(layout, row) {
        if let Some(field) = DetailField::from_label(&label) {
            target.set_detail(field, value);
        }
    }
    target
}

fn detail_entries(layout: &GroupLayout, row: ElementRef<'_>) -> Vec<(String, String)> {
    row.select(&layout.detail_entry)
        .filter_map(|entry| {
            let label = entry.select(&layout.detail_label).next().map(element_text)?;
            let value = entry
                .select(&layout.detail_value)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Some((label, value))
        })
        .collect()
}

/// Parse `ShowPin(lat,lng,...)` out of a cell's markup
pub fn pin_coordinates(html: &str) -> Option<(f64, f64)> {
    let caps = SHOW_PIN.captures(html)?;
    let lat = caps[1].parse().ok()?;
    let lng = caps[2].parse().ok()?;
    Some((lat, lng))
}

/// Direct `td` children only; markup nested inside a cell never counts as a cell
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
