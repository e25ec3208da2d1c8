mod components;
pub mod config;
mod events;
pub mod status;

use std::time::Duration;

use self::components::{DatasetPanel, DomainPanel, FunctionPanel, Plotter};
use crate::controller::Controller;
use crate::session::{LoadMode, PlotMode, Session};
use config::Config;
use events::{
    EventQueue, GenerateDataset, LoadFunctions, LoadFunctionsRequested, PlotSelected, SetPlotView,
};
use status::StatusBar;

pub struct EguiApp {
    config: Config,
    controller: Controller<StatusBar>,
    plotter: Plotter,
    function_panel: FunctionPanel,
    domain_panel: DomainPanel,
    dataset_panel: DatasetPanel,
    shortcuts_modal_open: bool,
    ui_selection: UISelection,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
}

#[derive(Debug, PartialEq, Eq)]
enum UISelection {
    Plot,
    Preferences,
}

impl EguiApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut session = Session::with_defaults();
        session.figure.view = config.plot_view;

        let mut event_queue = EventQueue::<Self>::new();
        if let Some(path) = &config.definitions_path {
            event_queue.queue_event(Box::new(LoadFunctions::new(path.clone(), LoadMode::Merge)));
        }

        Self {
            config,
            controller: Controller::new(session, StatusBar::new()),
            plotter: Plotter::new(),
            function_panel: FunctionPanel::new(),
            domain_panel: DomainPanel::new(),
            dataset_panel: DatasetPanel::new(),
            shortcuts_modal_open: false,
            ui_selection: UISelection::Plot,
            event_queue,
            request_redraw: None,
        }
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    fn request_load(&mut self, mode: LoadMode) {
        log::debug!("open dialog to select definitions file");
        let handle = std::thread::spawn(|| {
            rfd::FileDialog::new()
                .add_filter("function definitions", &["json"])
                .pick_file()
        });
        let event = LoadFunctionsRequested::new(mode, Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }

    fn dialog_open(&self) -> bool {
        self.function_panel.is_editing() || self.domain_panel.is_editing()
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }

        self.run_events();
        // Keep polling while a file dialog is open.
        if !self.event_queue.is_idle() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut should_quit = false;
        let mut load_requested = false;

        // Handle keyboard input.
        let dialog_open = self.dialog_open();
        ctx.input(|i| {
            // Help window.
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            // Cycle plot view.
            if i.key_pressed(egui::Key::F3) {
                let view = self.controller.session().figure.view.next();
                self.event_queue.queue_event(Box::new(SetPlotView::new(view)));
            }
            // Toggle preferences.
            if i.key_pressed(egui::Key::F12) {
                self.ui_selection = match self.ui_selection {
                    UISelection::Plot => UISelection::Preferences,
                    UISelection::Preferences => UISelection::Plot,
                };
            }
            if dialog_open || !i.modifiers.ctrl {
                return;
            }
            if i.key_pressed(egui::Key::L) {
                load_requested = true;
            }
            if i.key_pressed(egui::Key::G) {
                self.event_queue.queue_event(Box::new(GenerateDataset));
            }
            if i.key_pressed(egui::Key::P) {
                self.event_queue
                    .queue_event(Box::new(PlotSelected::new(PlotMode::Replace)));
            }
            if i.key_pressed(egui::Key::Q) {
                should_quit = true;
            }
        });
        if load_requested {
            self.request_load(LoadMode::Merge);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            self.controller.reporter_mut().render(ui);
        });

        egui::SidePanel::left("session_panel")
            .min_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.side_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel(ui);
        });

        self.controller.reporter_mut().render_error_modal(ctx);

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl EguiApp {
    fn side_panel(&mut self, ui: &mut egui::Ui) {
        let session = self.controller.session();
        self.function_panel
            .render(session, &mut self.event_queue, ui);
        ui.separator();
        self.domain_panel.render(
            session,
            self.config.default_resolution,
            &mut self.event_queue,
            ui,
        );
        ui.separator();
        self.dataset_panel
            .render(session, &mut self.event_queue, ui);
    }

    fn central_panel(&mut self, ui: &mut egui::Ui) {
        match self.ui_selection {
            UISelection::Plot => self.plotter.render(
                self.controller.session(),
                &self.config,
                &mut self.event_queue,
                ui,
            ),
            UISelection::Preferences => {
                self.config.render(ui);
                ui.add_space(8.0);
                if ui.button("Back to Plot").clicked() {
                    self.ui_selection = UISelection::Plot;
                }
            }
        }
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Load Functions").clicked() {
                    self.request_load(LoadMode::Merge);
                    ui.close_menu();
                }
                if ui
                    .button("Reload Functions")
                    .on_hover_text("Load a definitions file, dropping all current functions")
                    .clicked()
                {
                    self.request_load(LoadMode::Replace);
                    ui.close_menu();
                }
                if ui.button("Preferences").clicked() {
                    self.ui_selection = UISelection::Preferences;
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // Selection of ui view.
            ui.menu_button("View", |ui| {
                ui.selectable_value(&mut self.ui_selection, UISelection::Plot, "Plot");
                ui.selectable_value(
                    &mut self.ui_selection,
                    UISelection::Preferences,
                    "Preferences",
                );
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
            });
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("CTRL + L = Load Function Definitions");
                    ui.separator();
                    ui.label("CTRL + G = Generate Dataset");
                    ui.separator();
                    ui.label("CTRL + P = Plot Selected Datasets");
                    ui.separator();
                    ui.label("CTRL + Q = Quit App");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F3 = Cycle Plot View");
                    ui.separator();
                    ui.label("F12 = Toggle Preferences");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
