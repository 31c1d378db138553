//! In-memory host page for driving the engine without a browser

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use skillbridge_scrape::{ScrapeError, ScrapeResult, TablePage};

pub fn header(company: &str) -> String {
    format!(r#"<tr class="dtrg-group dtrg-start dtrg-level-0"><td colspan="12">{company}</td></tr>"#)
}

pub fn row(cells: &[&str]) -> String {
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!(r#"<tr role="row" class="odd">{tds}</tr>"#)
}

/// Twelve-cell row whose program name is `name`
pub fn program(name: &str) -> String {
    row(&["", name, "Army", "City", "ST", "6 months", "POC", "poc@x.com", "$0", "", "", "Online"])
}

pub fn detail(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(l, v)| {
            format!(r#"<li><span class="dtr-title">{l}</span> <span class="dtr-data">{v}</span></li>"#)
        })
        .collect();
    format!(r#"<tr class="child"><td class="child" colspan="12"><ul class="dtr-details">{items}</ul></td></tr>"#)
}

pub fn table(rows: &[String]) -> String {
    format!(
        r#"<div id="location-table_wrapper"><table id="location-table"><tbody>{}</tbody></table></div>"#,
        rows.concat()
    )
}

/// One rendered page of the host table
#[derive(Clone)]
pub struct Screen {
    pub collapsed: String,
    /// Rendered once any expand control on this screen was triggered
    pub expanded: Option<String>,
    pub summary: Option<String>,
    pub expand_controls: usize,
    pub has_next: bool,
}

impl Screen {
    pub fn new(html: String, summary: Option<&str>) -> Self {
        Self {
            collapsed: html,
            expanded: None,
            summary: summary.map(str::to_string),
            expand_controls: 0,
            has_next: true,
        }
    }

    pub fn with_expansion(mut self, expanded: String, controls: usize) -> Self {
        self.expanded = Some(expanded);
        self.expand_controls = controls;
        self
    }

    pub fn without_next(mut self) -> Self {
        self.has_next = false;
        self
    }
}

#[derive(Default)]
struct State {
    current: usize,
    expanded: HashSet<usize>,
    expand_clicks: Vec<(usize, usize)>,
    next_clicks: usize,
    /// Screen that becomes current once `render_delay` has passed
    pending: Option<(usize, Instant)>,
}

pub struct FakePage {
    screens: Vec<Screen>,
    state: Mutex<State>,
    pub failing_expand: HashSet<usize>,
    pub fail_next: bool,
    pub fail_snapshot_on: Option<usize>,
    /// Clicking next leaves the page where it is
    pub stuck: bool,
    /// Time between a next click and the following screen rendering
    pub render_delay: Duration,
    /// Expand controls close an already expanded screen
    pub toggle_expand: bool,
}

impl FakePage {
    pub fn new(screens: Vec<Screen>) -> Self {
        Self {
            screens,
            state: Mutex::new(State::default()),
            failing_expand: HashSet::new(),
            fail_next: false,
            fail_snapshot_on: None,
            stuck: false,
            render_delay: Duration::ZERO,
            toggle_expand: false,
        }
    }

    pub fn next_clicks(&self) -> usize {
        self.state.lock().unwrap().next_clicks
    }

    /// (screen, control index) for every successful expand click
    pub fn expand_clicks(&self) -> Vec<(usize, usize)> {
        self.state.lock().unwrap().expand_clicks.clone()
    }

    fn screen(&self) -> (usize, Screen) {
        let mut state = self.state.lock().unwrap();
        if let Some((next, clicked)) = state.pending {
            if clicked.elapsed() >= self.render_delay {
                state.current = next;
                state.pending = None;
            }
        }
        let current = state.current;
        (current, self.screens[current].clone())
    }
}

#[async_trait]
impl TablePage for FakePage {
    async fn snapshot(&self) -> ScrapeResult<String> {
        let (current, screen) = self.screen();
        if self.fail_snapshot_on == Some(current) {
            return Err(ScrapeError::ElementNotFound("#location-table_wrapper".into()));
        }
        let expanded = self.state.lock().unwrap().expanded.contains(&current);
        Ok(match (expanded, screen.expanded) {
            (true, Some(html)) => html,
            _ => screen.collapsed,
        })
    }

    async fn pagination_summary(&self) -> ScrapeResult<Option<String>> {
        Ok(self.screen().1.summary)
    }

    async fn tag_expand_controls(&self) -> ScrapeResult<usize> {
        Ok(self.screen().1.expand_controls)
    }

    async fn click_expand(&self, index: usize) -> ScrapeResult<()> {
        let (current, screen) = self.screen();
        if index >= screen.expand_controls || self.failing_expand.contains(&index) {
            return Err(ScrapeError::ElementNotFound(format!(
                "[data-scrape-group=\"{index}\"]"
            )));
        }
        let mut state = self.state.lock().unwrap();
        if !state.expanded.insert(current) && self.toggle_expand {
            state.expanded.remove(&current);
        }
        state.expand_clicks.push((current, index));
        Ok(())
    }

    async fn click_next(&self) -> ScrapeResult<bool> {
        let (current, screen) = self.screen();
        if !screen.has_next {
            return Ok(false);
        }
        if self.fail_next {
            return Err(ScrapeError::Interaction {
                selector: "#location-table_next".into(),
                reason: "detached".into(),
            });
        }
        let mut state = self.state.lock().unwrap();
        state.next_clicks += 1;
        if !self.stuck && current + 1 < self.screens.len() {
            state.pending = Some((current + 1, Instant::now()));
        }
        Ok(true)
    }

    async fn detail_row_count(&self) -> ScrapeResult<usize> {
        let html = self.snapshot().await?;
        Ok(html.matches(r#"<tr class="child">"#).count())
    }
}
