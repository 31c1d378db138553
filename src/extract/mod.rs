//! Page extraction: DOM snapshot in, locations out
//!
//! Works on a static HTML snapshot of the results container, so it is a pure
//! function of the markup and never touches the live browser.

mod assemble;
mod classify;

pub use assemble::{GroupLayout, assemble, merge_details, opportunity_from_row, pin_coordinates};
pub use classify::{RowKind, RowMarkers, classify_row};

use scraper::{ElementRef, Html, Selector};

use crate::SelectorConfig;
use crate::model::Location;
use crate::utils::{ScrapeError, ScrapeResult};

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::Selector(selector.to_string()))
}

/// Compiled row and field selectors for one table layout
#[derive(Debug, Clone)]
pub struct TableExtractor {
    rows: Selector,
    layout: GroupLayout,
}

impl TableExtractor {
    pub fn new(selectors: &SelectorConfig, markers: &RowMarkers) -> ScrapeResult<Self> {
        Ok(Self {
            rows: parse_selector(&selectors.rows)?,
            layout: GroupLayout {
                markers: markers.clone(),
                detail_entry: parse_selector(&selectors.detail_entry)?,
                detail_label: parse_selector(&selectors.detail_label)?,
                detail_value: parse_selector(&selectors.detail_value)?,
            },
        })
    }

    /// Extract every group in document order
    ///
    /// Rows ahead of the first group header belong to no company and are ignored.
    pub fn extract(&self, html: &str) -> Vec<Location> {
        let document = Html::parse_document(html);
        let rows: Vec<ElementRef<'_>> = document.select(&self.rows).collect();

        rows.iter()
            .enumerate()
            .filter(|(_, row)| classify_row(**row, &self.layout.markers) == RowKind::GroupHeader)
            .map(|(i, header)| assemble(&self.layout, *header, rows[i + 1..].iter().copied()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div id="location-table_wrapper">
          <table id="location-table"><tbody>
            <tr role="row" class="odd"><td>orphan</td></tr>
            <tr class="dtrg-group dtrg-start dtrg-level-0"><td colspan="12">Acme Corp</td></tr>
            <tr role="row" class="odd">
              <td><a onclick="ShowPin(30.5,-97.25,'x')"></a></td><td>ProgA</td><td>Army</td><td>City</td>
              <td>ST</td><td>6 months</td><td>POC</td><td>poc@x.com</td><td>$0</td><td></td><td></td><td>Online</td>
            </tr>
            <tr class="child"><td class="child" colspan="12"><ul class="dtr-details">
              <li><span class="dtr-title">Job Family</span><span class="dtr-data">Cyber</span></li>
            </ul></td></tr>
            <tr class="dtrg-group dtrg-start dtrg-level-0"><td colspan="12">Beta LLC</td></tr>
          </tbody></table>
          <div id="location-table_info">Showing 1 to 1 of 1 entries</div>
        </div>"#;

    fn extractor() -> TableExtractor {
        TableExtractor::new(&SelectorConfig::default(), &RowMarkers::default()).unwrap()
    }

    #[test]
    fn extracts_groups_in_document_order() {
        let locations = extractor().extract(PAGE);

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].company, "Acme Corp");
        assert_eq!(locations[1].company, "Beta LLC");
        assert!(locations[1].opportunities.is_empty());

        let opp = &locations[0].opportunities[0];
        assert_eq!(opp.program_name, "ProgA");
        assert_eq!(opp.delivery_method, "Online");
        assert_eq!(opp.job_family, "Cyber");
        assert_eq!(opp.latitude, Some(30.5));
        assert_eq!(opp.longitude, Some(-97.25));
    }

    #[test]
    fn rejects_bad_selectors() {
        let selectors = SelectorConfig {
            rows: "tr[".to_string(),
            ..SelectorConfig::default()
        };
        assert!(matches!(
            TableExtractor::new(&selectors, &RowMarkers::default()),
            Err(ScrapeError::Selector(_))
        ));
    }

    #[test]
    fn default_expand_controls_line_up_with_groups() {
        let html = r#"
            <table id="location-table"><tbody>
              <tr class="dtrg-group dtrg-start dtrg-level-0"><td colspan="12">Acme Corp</td></tr>
              <tr class="dtrg-group dtrg-start dtrg-level-1"><td colspan="12">Texas</td></tr>
              <tr class="dtrg-group dtrg-end dtrg-level-0"><td colspan="12">3 rows</td></tr>
              <tr class="dtrg-group dtrg-start dtrg-level-0"><td colspan="12">Beta LLC</td></tr>
            </tbody></table>"#;
        let selector = parse_selector(&SelectorConfig::default().expand_control).unwrap();
        let document = Html::parse_document(html);
        let controls: Vec<String> = document
            .select(&selector)
            .map(|row| row.text().collect::<String>())
            .collect();

        let companies: Vec<String> = extractor()
            .extract(html)
            .into_iter()
            .map(|location| location.company)
            .collect();
        assert_eq!(controls, vec!["Acme Corp", "Beta LLC"]);
        assert_eq!(companies, controls);
    }
}
