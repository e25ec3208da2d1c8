use egui::RichText;

use super::super::auto_color;
use crate::app::{
    events::{ClearPlot, EventQueue, GenerateDataset, PlotSelected, ToggleDataset},
    EguiApp,
};
use crate::session::{Dataset, PlotMode, Session};

impl super::DatasetPanel {
    pub fn render(
        &mut self,
        session: &Session,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) {
        ui.heading("Datasets");

        if ui
            .button("Generate Dataset")
            .on_hover_text("Sample the selected function on the selected domain (Ctrl+G)")
            .clicked()
        {
            event_queue.queue_event(Box::new(GenerateDataset));
        }

        ui.add(egui::TextEdit::singleline(&mut self.filter).hint_text("filter"));

        let plotted = session.figure.datasets();
        egui::ScrollArea::vertical()
            .id_salt("dataset_list")
            .max_height(220.0)
            .show(ui, |ui| {
                if session.datasets.is_empty() {
                    ui.weak("none generated yet");
                }
                for dataset in session.datasets.iter().filter(|ds| self.matches(ds)) {
                    let mut checked = session.selection.datasets.contains(&dataset.id);
                    let mut text = RichText::new(&dataset.label);
                    if plotted.contains(&dataset.id) {
                        text = text.color(auto_color(dataset.id.into()));
                    }
                    if ui
                        .checkbox(&mut checked, text)
                        .on_hover_ui(|ui| dataset_details(dataset, ui))
                        .changed()
                    {
                        event_queue.queue_event(Box::new(ToggleDataset::new(dataset.id)));
                    }
                }
            });

        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Plot Selected")
                .on_hover_text("Replace the plot with the selected datasets (Ctrl+P)")
                .clicked()
            {
                event_queue.queue_event(Box::new(PlotSelected::new(PlotMode::Replace)));
            }
            if ui
                .button("Add to Plot")
                .on_hover_text("Add the selected datasets to the plot")
                .clicked()
            {
                event_queue.queue_event(Box::new(PlotSelected::new(PlotMode::Append)));
            }
            if ui.button("Clear Plot").clicked() {
                event_queue.queue_event(Box::new(ClearPlot));
            }
        });
    }
}

fn dataset_details(dataset: &Dataset, ui: &mut egui::Ui) {
    ui.monospace(format!(
        "{} = {}",
        dataset.function.name, dataset.function.expression
    ));
    ui.label(dataset.domain.summary());
    if let Some((lo, hi)) = dataset.value_range() {
        ui.label(format!("values in [{lo:.4}, {hi:.4}]"));
    } else {
        ui.label("no finite values");
    }
}
