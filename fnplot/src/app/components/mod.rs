mod dataset_panel;
mod domain_panel;
mod function_panel;
mod plotter;

pub use dataset_panel::DatasetPanel;
pub use domain_panel::DomainPanel;
pub use function_panel::FunctionPanel;
pub use plotter::{auto_color, Plotter};
