use egui::TextEdit;

use crate::app::{
    events::{EventQueue, SelectFunction, SubmitFunctionEdit},
    EguiApp,
};
use crate::session::{
    functions::{FunctionDraft, DEFAULT_PARAMETER_VALUE},
    Session,
};

enum EditorAction {
    Apply,
    Cancel,
}

impl super::FunctionPanel {
    pub fn render(
        &mut self,
        session: &Session,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) {
        ui.heading("Functions");

        let selected = session.selection.function.as_deref();
        egui::ScrollArea::vertical()
            .id_salt("function_list")
            .max_height(180.0)
            .show(ui, |ui| {
                for def in session.functions.iter() {
                    let response = ui
                        .selectable_label(selected == Some(def.name.as_str()), &def.name)
                        .on_hover_ui(|ui| {
                            ui.monospace(def.expression.source());
                            if !def.parameters.is_empty() {
                                ui.label(def.parameter_summary());
                            }
                            if !def.description.is_empty() {
                                ui.weak(&def.description);
                            }
                        });
                    if response.clicked() {
                        event_queue.queue_event(Box::new(SelectFunction::new(def.name.clone())));
                    }
                    // Shortcut for select + "Modify Function".
                    if response.double_clicked() {
                        self.editor = Some(FunctionDraft::from(def));
                        self.detect_message = None;
                    }
                }
            });

        let selected_def = session.selected_function();
        if ui
            .add_enabled(selected_def.is_some(), egui::Button::new("Modify Function"))
            .clicked()
        {
            self.editor = selected_def.map(FunctionDraft::from);
            self.detect_message = None;
        }

        self.render_editor(event_queue, ui.ctx());
    }

    fn render_editor(&mut self, event_queue: &mut EventQueue<EguiApp>, ctx: &egui::Context) {
        if self.editor.is_none() {
            return;
        }
        let mut action = None;
        let mut detect = false;

        let modal = egui::Modal::new("function_editor".into()).show(ctx, |ui| {
            let Some(draft) = self.editor.as_mut() else {
                return;
            };
            ui.set_min_width(380.0);
            ui.heading(format!("Modify Function '{}'", draft.name));
            ui.separator();

            ui.label("Expression");
            ui.add(
                TextEdit::singleline(&mut draft.expression)
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(4.0);

            ui.label("Parameters");
            let mut remove = None;
            egui::Grid::new("function_editor_parameters")
                .num_columns(3)
                .show(ui, |ui| {
                    for (idx, (name, value)) in draft.parameters.iter_mut().enumerate() {
                        ui.add(TextEdit::singleline(name).desired_width(90.0));
                        ui.add(TextEdit::singleline(value).desired_width(140.0));
                        if ui
                            .small_button("🗙")
                            .on_hover_text("Remove parameter")
                            .clicked()
                        {
                            remove = Some(idx);
                        }
                        ui.end_row();
                    }
                });
            if let Some(idx) = remove {
                draft.parameters.remove(idx);
            }

            ui.horizontal(|ui| {
                if ui.button("Add parameter").clicked() {
                    draft
                        .parameters
                        .push((String::new(), DEFAULT_PARAMETER_VALUE.to_string()));
                }
                if ui
                    .button("Detect parameters")
                    .on_hover_text("Add every symbol besides x and y that is not declared yet")
                    .clicked()
                {
                    detect = true;
                }
            });
            if let Some(message) = &self.detect_message {
                ui.weak(message);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    action = Some(EditorAction::Apply);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(EditorAction::Cancel);
                }
            });
        });

        if detect {
            self.detect_parameters();
        }
        if modal.should_close() && action.is_none() {
            action = Some(EditorAction::Cancel);
        }
        match action {
            Some(EditorAction::Apply) => {
                if let Some(draft) = self.editor.take() {
                    event_queue.queue_event(Box::new(SubmitFunctionEdit::new(draft)));
                }
                self.detect_message = None;
            }
            Some(EditorAction::Cancel) => {
                self.editor = None;
                self.detect_message = None;
            }
            None => {}
        }
    }
}
