//! The only way the UI changes the session. Every action reports its outcome
//! to a [`Reporter`] and hands the result back to the caller.

use std::{collections::BTreeMap, path::Path};

use app_core::report::Reporter;

use crate::session::{
    evaluate::sample_grid, functions::FunctionDraft, AppError, AppResult, AxisRange, DatasetID,
    DomainDraft, DomainID, FunctionSnapshot, LoadMode, PlotMode, PlotView, Session,
    SliceSelection,
};

pub struct Controller<R: Reporter> {
    session: Session,
    reporter: R,
}

impl<R: Reporter> Controller<R> {
    pub fn new(session: Session, reporter: R) -> Self {
        Self { session, reporter }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    fn reported<T>(&mut self, action: &str, result: AppResult<T>) -> AppResult<T> {
        if let Err(err) = &result {
            log::debug!("{action} failed: {err}");
            self.reporter.error(err.to_string());
        }
        result
    }

    pub fn load_functions(&mut self, path: &Path, mode: LoadMode) -> AppResult<usize> {
        let result = self.session.functions.load_file(path, mode);
        let count = self.reported("loading functions", result)?;
        if let Some(name) = &self.session.selection.function {
            if !self.session.functions.contains(name) {
                self.session.selection.function = None;
            }
        }
        self.reporter.info(format!(
            "loaded {count} function{} from {}",
            if count == 1 { "" } else { "s" },
            path.display()
        ));
        Ok(count)
    }

    pub fn select_function(&mut self, name: &str) -> AppResult<()> {
        let Some(def) = self.session.functions.get(name) else {
            return self.reported(
                "selecting function",
                Err(AppError::UnknownFunction(name.to_owned())),
            );
        };
        let mut message = def.name.clone();
        if !def.description.is_empty() {
            message.push_str(&format!(", {}", def.description));
        }
        for (param, val) in def.parameters.iter() {
            match def.parameter_descriptions.get(param) {
                Some(desc) => message.push_str(&format!(", {param} ({desc}) = {val}")),
                None => message.push_str(&format!(", {param} = {val}")),
            }
        }
        log::debug!("selected function '{name}'");
        self.session.selection.function = Some(def.name.clone());
        self.reporter.info(message);
        Ok(())
    }

    pub fn modify_function(
        &mut self,
        name: &str,
        expression: &str,
        parameters: BTreeMap<String, f64>,
    ) -> AppResult<()> {
        let result = self
            .session
            .functions
            .update(name, expression, parameters);
        self.reported("modifying function", result)?;
        let summary = self
            .session
            .functions
            .get(name)
            .map(|def| format!("{}({}) = {}", def.name, def.parameter_summary(), def.expression))
            .unwrap_or_default();
        self.reporter.info(format!("updated {summary}"));
        Ok(())
    }

    /// [`Self::modify_function`] from the contents of the edit dialog.
    pub fn submit_function_edit(&mut self, draft: &FunctionDraft) -> AppResult<()> {
        let parameters = self.reported("modifying function", draft.parse_parameters())?;
        self.modify_function(&draft.name, &draft.expression, parameters)
    }

    pub fn create_domain(
        &mut self,
        name: &str,
        x: AxisRange,
        y: AxisRange,
        resolution: usize,
    ) -> AppResult<DomainID> {
        let result = self.session.domains.create(name, x, y, resolution);
        let id = self.reported("creating domain", result)?;
        self.session.selection.domain = Some(id);
        if let Some(domain) = self.session.domains.get(id) {
            self.reporter.info(format!("created domain {}", domain.name));
        }
        Ok(id)
    }

    /// [`Self::create_domain`] from the text fields of the domain dialog.
    pub fn submit_domain(&mut self, draft: &DomainDraft) -> AppResult<DomainID> {
        let (x, y, resolution) = self.reported("creating domain", draft.parse())?;
        self.create_domain(&draft.name, x, y, resolution)
    }

    pub fn select_domain(&mut self, id: DomainID) -> AppResult<()> {
        let Some(domain) = self.session.domains.get(id) else {
            return self.reported("selecting domain", Err(AppError::UnknownDomain(id)));
        };
        let message = domain.summary();
        self.session.selection.domain = Some(id);
        self.reporter.info(message);
        Ok(())
    }

    /// Evaluate the selected function on the selected domain.
    pub fn generate_dataset(&mut self) -> AppResult<DatasetID> {
        let selection = &self.session.selection;
        let target = match (selection.function.clone(), selection.domain) {
            (None, _) => Err(AppError::NoFunctionSelected),
            (_, None) => Err(AppError::NoDomainSelected),
            (Some(name), Some(domain)) => Ok((name, domain)),
        };
        let (name, domain) = self.reported("generating dataset", target)?;
        self.generate(&name, domain)
    }

    pub fn generate(&mut self, name: &str, domain: DomainID) -> AppResult<DatasetID> {
        let result = self.sample(name, domain);
        let id = self.reported("generating dataset", result)?;
        if let Some(dataset) = self.session.datasets.get(id) {
            log::info!("generated dataset '{}'", dataset.label);
            self.reporter
                .info(format!("generated dataset {}", dataset.label));
        }
        Ok(id)
    }

    fn sample(&mut self, name: &str, domain: DomainID) -> AppResult<DatasetID> {
        let function = self
            .session
            .functions
            .get(name)
            .ok_or_else(|| AppError::UnknownFunction(name.to_owned()))?;
        let domain = self
            .session
            .domains
            .get(domain)
            .ok_or(AppError::UnknownDomain(domain))?;
        let grid = sample_grid(function, domain)?;
        let snapshot = FunctionSnapshot::from(function);
        let domain = domain.clone();
        Ok(self.session.datasets.push(snapshot, domain, grid))
    }

    /// Flip the selection state of a dataset and return the new state.
    pub fn toggle_dataset(&mut self, id: DatasetID) -> AppResult<bool> {
        let selected = !self.session.selection.datasets.contains(&id);
        self.set_dataset_selected(id, selected)?;
        Ok(selected)
    }

    pub fn set_dataset_selected(&mut self, id: DatasetID, selected: bool) -> AppResult<()> {
        let Some(dataset) = self.session.datasets.get(id) else {
            return self.reported(
                "selecting dataset",
                Err(AppError::UnknownDataset(id)),
            );
        };
        let label = dataset.label.clone();
        if selected {
            self.session.selection.datasets.insert(id);
        } else {
            self.session.selection.datasets.remove(&id);
        }
        log::debug!("dataset '{label}' selected: {selected}");
        Ok(())
    }

    /// Plot the selected datasets. Returns how many are drawn afterwards.
    /// With nothing selected this only warns.
    pub fn plot_selected(&mut self, mode: PlotMode) -> AppResult<usize> {
        if self.session.selection.datasets.is_empty() {
            log::warn!("requested plot without any dataset selected");
            self.reporter.warn("no dataset selected to plot");
            return Ok(self.session.figure.datasets().len());
        }
        let ids: Vec<DatasetID> = self.session.selection.datasets.iter().copied().collect();
        self.session.figure.plot(ids, mode);
        let count = self.session.figure.datasets().len();
        self.reporter.info(format!(
            "plotting {count} dataset{}",
            if count == 1 { "" } else { "s" }
        ));
        Ok(count)
    }

    pub fn clear_plot(&mut self) {
        self.session.figure.clear();
        self.reporter.info("cleared plot");
    }

    pub fn set_view(&mut self, view: PlotView) {
        log::debug!("switching plot view to {view}");
        self.session.figure.view = view;
    }

    pub fn set_slice(&mut self, slice: SliceSelection) {
        self.session.figure.slice = slice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::report::{Level, RecordingReporter};
    use std::io::Write;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn controller() -> Controller<RecordingReporter> {
        init();
        Controller::new(Session::with_defaults(), RecordingReporter::new())
    }

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect()
    }

    #[test]
    fn test_paraboloid_scenario() {
        let mut ctrl = controller();
        let unit = AxisRange::new(-1.0, 1.0);
        let domain = ctrl.create_domain("unit", unit, unit, 5).unwrap();

        ctrl.modify_function("paraboloid", "a*x^2 + b*y", params(&[("a", 1.0), ("b", 1.0)]))
            .unwrap();
        let first = ctrl.generate("paraboloid", domain).unwrap();
        let first_values = ctrl.session().datasets.get(first).unwrap().values.clone();

        ctrl.modify_function("paraboloid", "a*x^2 + b*y", params(&[("a", 2.0), ("b", 1.0)]))
            .unwrap();
        let second = ctrl.generate("paraboloid", domain).unwrap();

        let session = ctrl.session();
        let ds1 = session.datasets.get(first).unwrap();
        let ds2 = session.datasets.get(second).unwrap();
        assert_eq!(ds1.values.len(), 25);
        assert_eq!(ds2.values.len(), 25);
        assert_ne!(ds1.label, ds2.label);
        // the first dataset is a snapshot and unaffected by the edit
        assert_eq!(ds1.values, first_values);
        assert_eq!(ds1.function.parameters["a"], 1.0);
        assert_eq!(ds2.function.parameters["a"], 2.0);
        // f(1, -1) = a - 1
        assert_eq!(ds1.value(4, 0), Some(0.0));
        assert_eq!(ds2.value(4, 0), Some(1.0));

        ctrl.set_dataset_selected(first, true).unwrap();
        ctrl.set_dataset_selected(second, true).unwrap();
        assert_eq!(ctrl.plot_selected(PlotMode::Replace).unwrap(), 2);
        assert_eq!(ctrl.session().figure.datasets(), &[first, second]);
        assert_eq!(ctrl.session().plotted().count(), 2);
        assert_eq!(ctrl.reporter().count(Level::Error), 0);
    }

    #[test]
    fn test_regenerating_is_deterministic() {
        let mut ctrl = controller();
        ctrl.select_function("damped_oscillator").unwrap();
        let domain = ctrl.session().domains.list()[0].id;
        ctrl.select_domain(domain).unwrap();

        let first = ctrl.generate_dataset().unwrap();
        let second = ctrl.generate_dataset().unwrap();
        let datasets = &ctrl.session().datasets;
        let (ds1, ds2) = (datasets.get(first).unwrap(), datasets.get(second).unwrap());
        assert_eq!(ds1.values, ds2.values);
        assert_eq!(ds2.label, format!("{} #2", ds1.label));
    }

    #[test]
    fn test_plot_without_selection_warns() {
        let mut ctrl = controller();
        assert_eq!(ctrl.plot_selected(PlotMode::Replace).unwrap(), 0);
        let report = ctrl.reporter().last().unwrap();
        assert_eq!(report.level, Level::Warning);
        assert!(ctrl.session().figure.is_empty());
    }

    #[test]
    fn test_generate_requires_selection() {
        let mut ctrl = controller();
        assert!(matches!(
            ctrl.generate_dataset(),
            Err(AppError::NoFunctionSelected)
        ));
        ctrl.select_function("paraboloid").unwrap();
        assert!(matches!(
            ctrl.generate_dataset(),
            Err(AppError::NoDomainSelected)
        ));
        assert_eq!(ctrl.reporter().count(Level::Error), 2);
        assert!(ctrl.session().datasets.is_empty());
    }

    #[test]
    fn test_evaluation_error_adds_no_dataset() {
        let mut ctrl = controller();
        let unit = AxisRange::new(-1.0, 1.0);
        let domain = ctrl.create_domain("", unit, unit, 3).unwrap();
        ctrl.modify_function("paraboloid", "a / x + b*y", params(&[("a", 1.0), ("b", 1.0)]))
            .unwrap();
        assert!(matches!(
            ctrl.generate("paraboloid", domain),
            Err(AppError::Evaluation { .. })
        ));
        assert!(ctrl.session().datasets.is_empty());
        assert_eq!(ctrl.reporter().last().unwrap().level, Level::Error);
    }

    #[test]
    fn test_select_function_reports_parameters() {
        let mut ctrl = controller();
        ctrl.select_function("damped_oscillator").unwrap();
        let text = &ctrl.reporter().last().unwrap().text;
        assert!(text.starts_with("damped_oscillator"));
        assert!(text.contains("A (amplitude) = 1"));
        assert!(matches!(
            ctrl.select_function("missing"),
            Err(AppError::UnknownFunction(_))
        ));
        assert_eq!(
            ctrl.session().selection.function.as_deref(),
            Some("damped_oscillator")
        );
    }

    #[test]
    fn test_submit_domain_invalid_number() {
        let mut ctrl = controller();
        let before = ctrl.session().domains.len();
        let mut draft = DomainDraft::new(10);
        draft.y_min = "low".into();
        assert!(matches!(
            ctrl.submit_domain(&draft),
            Err(AppError::InvalidNumber { .. })
        ));
        draft.y_min = "2".into();
        assert!(matches!(ctrl.submit_domain(&draft), Err(AppError::Range(_))));
        draft.y_min = "-2".into();
        draft.resolution = "-3".into();
        assert!(matches!(ctrl.submit_domain(&draft), Err(AppError::Range(_))));
        draft.resolution = "10".into();
        assert_eq!(ctrl.session().domains.len(), before);

        draft.y_min = "-2".into();
        let id = ctrl.submit_domain(&draft).unwrap();
        assert_eq!(ctrl.session().selection.domain, Some(id));
    }

    #[test]
    fn test_plot_modes_and_clear() {
        let mut ctrl = controller();
        let domain = ctrl.session().domains.list()[0].id;
        let a = ctrl.generate("paraboloid", domain).unwrap();
        let b = ctrl.generate("damped_oscillator", domain).unwrap();

        assert!(ctrl.toggle_dataset(a).unwrap());
        ctrl.plot_selected(PlotMode::Replace).unwrap();
        assert!(!ctrl.toggle_dataset(a).unwrap());
        ctrl.toggle_dataset(b).unwrap();
        assert_eq!(ctrl.plot_selected(PlotMode::Append).unwrap(), 2);
        assert_eq!(ctrl.plot_selected(PlotMode::Replace).unwrap(), 1);
        assert_eq!(ctrl.session().figure.datasets(), &[b]);

        ctrl.clear_plot();
        assert!(ctrl.session().figure.is_empty());
        // datasets survive clearing the plot
        assert_eq!(ctrl.session().datasets.len(), 2);
    }

    #[test]
    fn test_load_functions_reports() {
        let mut ctrl = controller();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "plane": { "expression": "m*x + y", "parameters": { "m": 0.5 } } }"#)
            .unwrap();

        ctrl.select_function("paraboloid").unwrap();
        assert_eq!(ctrl.load_functions(file.path(), LoadMode::Replace).unwrap(), 1);
        assert_eq!(ctrl.reporter().last().unwrap().level, Level::Info);
        // selection of a function that disappeared is dropped
        assert_eq!(ctrl.session().selection.function, None);

        file.as_file_mut().set_len(0).unwrap();
        assert!(ctrl.load_functions(file.path(), LoadMode::Merge).is_err());
        assert_eq!(ctrl.reporter().last().unwrap().level, Level::Error);
        assert!(ctrl.session().functions.contains("plane"));
    }
}
