mod ui;

use crate::session::Dataset;

/// Generated datasets, their selection and the plot actions.
#[derive(Debug, Default)]
pub struct DatasetPanel {
    filter: String,
}

impl DatasetPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case insensitive match of the filter against label and expression.
    fn matches(&self, dataset: &Dataset) -> bool {
        let filter = self.filter.trim().to_lowercase();
        filter.is_empty()
            || dataset.label.to_lowercase().contains(&filter)
            || dataset.function.expression.to_lowercase().contains(&filter)
    }
}
