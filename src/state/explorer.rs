use std::path::Path;

use anyhow::Result;

use crate::data::export;
use crate::data::filter::{FilterCriteria, apply_filter};
use crate::data::model::{Dataset, Record, discover_fields};
use crate::data::page::{DEFAULT_PAGE_SIZE, Page, PageError, paginate};

// ---------------------------------------------------------------------------
// Record explorer state
// ---------------------------------------------------------------------------

/// State behind the record explorer: the loaded collection, the active
/// criteria, the filtered view and the current page. Independent of rendering.
#[derive(Debug, Clone)]
pub struct DatasetExplorer {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    criteria: FilterCriteria,

    /// Records passing the current criteria (cached).
    filtered: Vec<Record>,

    page_index: usize,
    page_size: usize,

    /// Status / error message shown to the user.
    pub status_message: Option<String>,
}

impl Default for DatasetExplorer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl DatasetExplorer {
    /// A page size of zero is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::explorer_default(),
            filtered: Vec::new(),
            page_index: 1,
            page_size: page_size.max(1),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and go back to the first page.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filtered = apply_filter(&dataset.records, &self.criteria);
        self.dataset = Some(dataset);
        self.page_index = 1;
        self.status_message = None;
    }

    /// Record a failed load without touching the current dataset.
    pub fn set_load_error(&mut self, error: &anyhow::Error) {
        log::error!("Failed to load dataset: {error:#}");
        self.status_message = Some(format!("Error: {error:#}"));
    }

    /// Load from a file, keeping the previous dataset on failure.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        match crate::data::loader::load_dataset(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                self.set_load_error(&e);
                Err(e)
            }
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Change one field's constraint, refilter and return to page 1.
    pub fn set_filter(&mut self, field: &str, value: &str) {
        self.criteria.set(field, value);
        self.refilter();
    }

    /// Replace all constraints at once.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.refilter();
    }

    /// Recompute the filtered view after a criteria change. The page always
    /// resets: the old index may no longer exist.
    fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filtered = apply_filter(&ds.records, &self.criteria);
        }
        self.page_index = 1;
    }

    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    /// Table headers: the fields of the first filtered record.
    pub fn headers(&self) -> Vec<String> {
        discover_fields(&self.filtered)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> Page<'_> {
        match paginate(&self.filtered, self.page_index, self.page_size) {
            Ok(page) => page,
            // page_index is only ever set to a validated value or 1.
            Err(_) => Page {
                visible: &[],
                page_index: 1,
                page_size: self.page_size,
                total_pages: 1,
                total_records: self.filtered.len(),
            },
        }
    }

    /// Jump to `page_index`. Requests outside `1..=total_pages` are refused and
    /// leave the current page unchanged.
    pub fn go_to_page(&mut self, page_index: usize) -> Result<(), PageError> {
        let page = paginate(&self.filtered, page_index, self.page_size)?;
        self.page_index = page.page_index;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<(), PageError> {
        self.go_to_page(self.page_index + 1)
    }

    pub fn previous_page(&mut self) -> Result<(), PageError> {
        self.go_to_page(self.page_index.saturating_sub(1))
    }

    /// CSV text of the whole filtered set, not just the visible page.
    pub fn export_csv(&self) -> Result<String> {
        export::to_csv(&self.filtered)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        export::write_csv(&self.filtered, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_json;

    fn two_countries() -> Dataset {
        parse_json(
            r#"[
                {"pays": "France", "maladie": "Grippe", "date": "2024-01-05"},
                {"pays": "Italie", "maladie": "Grippe", "date": "2024-02-10"}
            ]"#,
        )
        .unwrap()
    }

    fn many(n: usize) -> Dataset {
        let records = (0..n)
            .map(|i| {
                Record::new()
                    .with("pays", if i % 2 == 0 { "France" } else { "Italie" })
                    .with("maladie", "Covid")
                    .with("date", format!("2024-03-{:02}", i % 28 + 1).as_str())
            })
            .collect();
        Dataset::from_records(records)
    }

    #[test]
    fn filter_page_and_export_end_to_end() {
        let mut explorer = DatasetExplorer::new(5);
        explorer.set_dataset(two_countries());
        explorer.set_filter("pays", "Fra");

        assert_eq!(explorer.filtered().len(), 1);
        let page = explorer.current_page();
        assert_eq!(page.page_index, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.visible.len(), 1);
        assert_eq!(explorer.export_csv().unwrap(), "France,Grippe,2024-01-05");
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut explorer = DatasetExplorer::new(5);
        explorer.set_dataset(many(23));
        explorer.go_to_page(5).unwrap();
        assert_eq!(explorer.page_index(), 5);

        explorer.set_filter("pays", "Ital");
        assert_eq!(explorer.page_index(), 1);
        assert_eq!(explorer.current_page().total_pages, 3);
    }

    #[test]
    fn navigation_is_refused_at_the_bounds() {
        let mut explorer = DatasetExplorer::new(5);
        explorer.set_dataset(many(12));

        assert!(explorer.previous_page().is_err());
        explorer.next_page().unwrap();
        explorer.next_page().unwrap();
        assert_eq!(
            explorer.next_page(),
            Err(PageError::OutOfRange { requested: 4, total_pages: 3 })
        );
        assert_eq!(explorer.page_index(), 3);
        assert!(!explorer.current_page().has_next());
    }

    #[test]
    fn export_covers_the_whole_filtered_set() {
        let mut explorer = DatasetExplorer::new(5);
        explorer.set_dataset(many(12));
        explorer.set_filter("pays", "France");
        let csv = explorer.export_csv().unwrap();
        assert_eq!(csv.lines().count(), 6);
        assert_eq!(explorer.current_page().visible.len(), 5);
    }

    #[test]
    fn empty_result_keeps_a_single_page() {
        let mut explorer = DatasetExplorer::new(5);
        explorer.set_dataset(two_countries());
        explorer.set_filter("maladie", "Rougeole");
        let page = explorer.current_page();
        assert_eq!(page.total_pages, 1);
        assert!(page.visible.is_empty());
        assert!(explorer.headers().is_empty());
        assert_eq!(explorer.export_csv().unwrap(), "");
    }

    #[test]
    fn headers_follow_the_first_record() {
        let mut explorer = DatasetExplorer::default();
        explorer.set_dataset(two_countries());
        assert_eq!(explorer.headers(), ["pays", "maladie", "date"]);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut explorer = DatasetExplorer::default();
        explorer.set_dataset(two_countries());
        let missing = std::env::temp_dir().join("epi-missing-dataset.json");
        assert!(explorer.load_file(&missing).is_err());
        assert_eq!(explorer.filtered().len(), 2);
        assert!(explorer.status_message.is_some());
    }
}
