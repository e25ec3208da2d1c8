//! Everything the application knows about, independent of the GUI.

pub mod dataset;
pub mod domain;
pub mod errors;
pub mod evaluate;
pub mod figure;
pub mod functions;

use std::collections::BTreeSet;

pub use dataset::{Dataset, DatasetID, DatasetStore, FunctionSnapshot};
pub use domain::{AxisRange, Domain, DomainDraft, DomainID, DomainManager, MAX_RESOLUTION};
pub use errors::{AppError, AppResult};
pub use figure::{Figure, PlotMode, PlotView, SliceSelection};
pub use functions::{FunctionDef, FunctionRegistry, LoadMode};

#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub function: Option<String>,
    pub domain: Option<DomainID>,
    pub datasets: BTreeSet<DatasetID>,
}

#[derive(Debug, Default)]
pub struct Session {
    pub functions: FunctionRegistry,
    pub domains: DomainManager,
    pub datasets: DatasetStore,
    pub selection: Selection,
    pub figure: Figure,
}

impl Session {
    /// Session with the builtin functions and default domains.
    pub fn with_defaults() -> Self {
        Self {
            functions: FunctionRegistry::with_builtins(),
            domains: DomainManager::with_defaults(),
            ..Default::default()
        }
    }

    pub fn selected_function(&self) -> Option<&FunctionDef> {
        self.selection
            .function
            .as_deref()
            .and_then(|name| self.functions.get(name))
    }

    pub fn selected_domain(&self) -> Option<&Domain> {
        self.selection.domain.and_then(|id| self.domains.get(id))
    }

    /// Datasets in the figure, in plotting order.
    pub fn plotted(&self) -> impl Iterator<Item = &Dataset> {
        self.figure
            .datasets()
            .iter()
            .filter_map(|id| self.datasets.get(*id))
    }
}
