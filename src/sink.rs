//! Result accumulation and JSON snapshots

use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::model::{Dataset, Location};
use crate::utils::ScrapeResult;

/// Append-only collection of every page's locations, in visitation order
#[derive(Debug, Default)]
pub struct Accumulator {
    locations: Vec<Location>,
    pages: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate one page's locations. No merging, no deduplication.
    pub fn append(&mut self, page_locations: Vec<Location>) {
        self.locations.extend(page_locations);
        self.pages += 1;
    }

    /// Pages appended so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Copy of the current contents, for intermediate snapshots
    pub fn snapshot(&self) -> Dataset {
        Dataset(self.locations.clone())
    }

    pub fn finalize(self) -> Dataset {
        Dataset(self.locations)
    }
}

/// Writes datasets as pretty-printed JSON under a run-specific, timestamped stem
pub struct DatasetWriter {
    dir: PathBuf,
    stem: String,
}

impl DatasetWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let stem = format!("opportunities_{}", Local::now().format("%Y-%m-%d_%H-%M-%S"));
        Self::with_stem(dir, stem)
    }

    pub fn with_stem(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    pub fn final_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.stem))
    }

    pub fn intermediate_path(&self, page: usize) -> PathBuf {
        self.dir.join(format!("{}_page{}.json", self.stem, page))
    }

    /// Snapshot taken after `page`; not authoritative
    pub fn write_intermediate(&self, dataset: &Dataset, page: usize) -> ScrapeResult<PathBuf> {
        let path = self.intermediate_path(page);
        write_json(&path, dataset)?;
        Ok(path)
    }

    pub fn write_final(&self, dataset: &Dataset) -> ScrapeResult<PathBuf> {
        let path = self.final_path();
        write_json(&path, dataset)?;
        info!(
            "Saved {} locations ({} opportunities) to {}",
            dataset.len(),
            dataset.opportunity_count(),
            path.display()
        );
        Ok(path)
    }
}

/// Page callback that writes the first-page snapshot when `enabled`
///
/// Only page 1 is snapshotted. A failed write is logged and never stops the scrape.
pub fn snapshot_hook(
    writer: &DatasetWriter,
    enabled: bool,
) -> impl FnMut(usize, &Accumulator) + '_ {
    move |page_number, so_far| {
        if !enabled || page_number != 1 {
            return;
        }
        match writer.write_intermediate(&so_far.snapshot(), page_number) {
            Ok(path) => info!("Wrote first-page snapshot to {}", path.display()),
            Err(e) => warn!("Failed to write first-page snapshot: {}", e),
        }
    }
}

fn write_json(path: &Path, dataset: &Dataset) -> ScrapeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.flush()?;
    Ok(())
}
