use crate::app::{
    events::{EventQueue, SelectDomain, SubmitDomain},
    EguiApp,
};
use crate::session::Session;

impl super::DomainPanel {
    pub fn render(
        &mut self,
        session: &Session,
        default_resolution: usize,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) {
        ui.heading("Domains");

        egui::ScrollArea::vertical()
            .id_salt("domain_list")
            .max_height(160.0)
            .show(ui, |ui| {
                for domain in session.domains.list() {
                    let is_selected = session.selection.domain == Some(domain.id);
                    if ui
                        .selectable_label(is_selected, &domain.name)
                        .on_hover_text(domain.summary())
                        .clicked()
                    {
                        event_queue.queue_event(Box::new(SelectDomain::new(domain.id)));
                    }
                }
            });

        if ui.button("New Domain").clicked() {
            self.open(default_resolution);
        }

        self.render_dialog(event_queue, ui.ctx());
    }

    fn render_dialog(&mut self, event_queue: &mut EventQueue<EguiApp>, ctx: &egui::Context) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let mut submit = false;
        let mut cancel = false;

        let modal = egui::Modal::new("domain_editor".into()).show(ctx, |ui| {
            ui.heading("New Domain");
            ui.separator();
            egui::Grid::new("domain_editor_grid")
                .num_columns(3)
                .show(ui, |ui| {
                    ui.label("name");
                    ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("generated"));
                    ui.end_row();

                    ui.label("x");
                    ui.add(egui::TextEdit::singleline(&mut draft.x_min).desired_width(80.0));
                    ui.add(egui::TextEdit::singleline(&mut draft.x_max).desired_width(80.0));
                    ui.end_row();

                    ui.label("y");
                    ui.add(egui::TextEdit::singleline(&mut draft.y_min).desired_width(80.0));
                    ui.add(egui::TextEdit::singleline(&mut draft.y_max).desired_width(80.0));
                    ui.end_row();

                    ui.label("resolution");
                    ui.add(egui::TextEdit::singleline(&mut draft.resolution).desired_width(80.0))
                        .on_hover_text("samples per axis");
                    ui.end_row();
                });
            ui.separator();
            ui.horizontal(|ui| {
                submit = ui.button("Create").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

        if submit {
            if let Some(draft) = self.draft.take() {
                event_queue.queue_event(Box::new(SubmitDomain::new(draft)));
            }
        } else if cancel || modal.should_close() {
            self.draft = None;
        }
    }
}
