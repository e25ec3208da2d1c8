use std::{path::PathBuf, thread::JoinHandle};

use derive_new::new;

use super::EguiApp;
use crate::session::{
    functions::FunctionDraft, DatasetID, DomainDraft, DomainID, LoadMode, PlotMode, PlotView,
    SliceSelection,
};
use app_core::{
    event::{AppEvent, EventState},
    string_error::ErrorStringExt,
};

// ---------------------------------------------------------------------------
//
//
// EventQueue
//
//
// ---------------------------------------------------------------------------

/// Events queued by the UI during a frame and applied at the start of the
/// next one.
pub struct EventQueue<EguiApp> {
    /// Stores events for later processing.
    queue: Vec<Box<dyn AppEvent<App = EguiApp>>>,
    /// Events still waiting on something (e.g. a file dialog).
    tmp_backlog: Vec<Box<dyn AppEvent<App = EguiApp>>>,
}

impl<EguiApp> EventQueue<EguiApp> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            tmp_backlog: Vec::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = EguiApp>>) {
        self.queue.push(event);
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.tmp_backlog.is_empty()
    }
}

impl EguiApp {
    pub fn run_events(&mut self) {
        // Events are applied in the order they were queued.
        let events = std::mem::take(&mut self.event_queue.queue);
        for mut event in events {
            match event.apply(self) {
                Ok(EventState::Finished) => {
                    self.request_redraw();
                }
                Ok(EventState::Busy) => {
                    self.event_queue.tmp_backlog.push(event);
                }
                // already shown to the user by the status bar
                Err(err) => {
                    log::debug!("event failed: {err}")
                }
            }
        }

        // Busy events go first next frame, followed by anything queued
        // while applying.
        let queued_meanwhile = std::mem::take(&mut self.event_queue.queue);
        std::mem::swap(
            &mut self.event_queue.queue,
            &mut self.event_queue.tmp_backlog,
        );
        self.event_queue.queue.extend(queued_meanwhile);
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// Load definitions once the file dialog running on `thread_handle` returns.
#[derive(new)]
pub struct LoadFunctionsRequested {
    mode: LoadMode,
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

/// Load definitions from a known path, e.g. the one from the config file.
#[derive(new)]
pub struct LoadFunctions {
    path: PathBuf,
    mode: LoadMode,
}

#[derive(new)]
pub struct SelectFunction {
    name: String,
}

#[derive(new)]
pub struct SubmitFunctionEdit {
    draft: FunctionDraft,
}

#[derive(new)]
pub struct SelectDomain {
    id: DomainID,
}

#[derive(new)]
pub struct SubmitDomain {
    draft: DomainDraft,
}

pub struct GenerateDataset;

#[derive(new)]
pub struct ToggleDataset {
    id: DatasetID,
}

#[derive(new)]
pub struct PlotSelected {
    mode: PlotMode,
}

pub struct ClearPlot;

#[derive(new)]
pub struct SetPlotView {
    view: PlotView,
}

#[derive(new)]
pub struct SetSlice {
    slice: SliceSelection,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for LoadFunctionsRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => {
                    LoadFunctions::new(path, self.mode).apply(app)?;
                }
                Ok(None) => log::debug!("function loading cancelled"),
                Err(err) => {
                    log::error!("file dialog failed: {:?}", err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for LoadFunctions {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .load_functions(&self.path, self.mode)
            .err_to_string("could not load functions")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for SelectFunction {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .select_function(&self.name)
            .err_to_string("could not select function")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for SubmitFunctionEdit {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Err(err) = app.controller.submit_function_edit(&self.draft) {
            // keep the dialog open so the input can be fixed
            app.function_panel.reopen(self.draft.clone());
            return Err(format!("could not modify function: {err}"));
        }
        Ok(EventState::Finished)
    }
}

impl AppEvent for SelectDomain {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .select_domain(self.id)
            .err_to_string("could not select domain")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for SubmitDomain {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Err(err) = app.controller.submit_domain(&self.draft) {
            app.domain_panel.reopen(self.draft.clone());
            return Err(format!("could not create domain: {err}"));
        }
        Ok(EventState::Finished)
    }
}

impl AppEvent for GenerateDataset {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .generate_dataset()
            .err_to_string("could not generate dataset")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for ToggleDataset {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .toggle_dataset(self.id)
            .err_to_string("could not select dataset")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for PlotSelected {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller
            .plot_selected(self.mode)
            .err_to_string("could not plot datasets")?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for ClearPlot {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller.clear_plot();
        Ok(EventState::Finished)
    }
}

impl AppEvent for SetPlotView {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller.set_view(self.view);
        Ok(EventState::Finished)
    }
}

impl AppEvent for SetSlice {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.controller.set_slice(self.slice);
        Ok(EventState::Finished)
    }
}
