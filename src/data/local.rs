//! Daily files read from a local directory (offline runs and re-plots).

use std::path::PathBuf;

use chrono::NaiveDate;

use super::{Archive, FetchOutcome};
use crate::domain::DataProduct;

pub struct LocalArchive {
    dir: PathBuf,
}

impl LocalArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: NaiveDate, product: DataProduct) -> PathBuf {
        self.dir.join(product.file_name(date))
    }
}

impl Archive for LocalArchive {
    fn fetch_daily(&self, date: NaiveDate, product: DataProduct) -> FetchOutcome {
        let path = self.path_for(date, product);
        match std::fs::read_to_string(&path) {
            Ok(text) => FetchOutcome::Body(text),
            Err(e) => FetchOutcome::unavailable(format!("failed to read '{}': {e}", path.display())),
        }
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
