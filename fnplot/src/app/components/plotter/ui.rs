use egui::RichText;
use egui_plot::{Legend, Line, Plot, Polygon};

use super::logic::{colormap, heatmap_cells, normalize, slice_series, SliceAxis};
use crate::app::{
    config::Config,
    events::{EventQueue, SetPlotView, SetSlice},
    EguiApp,
};
use crate::session::{Dataset, PlotView, Session, SliceSelection};

impl super::Plotter {
    pub fn render(
        &mut self,
        session: &Session,
        config: &Config,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) {
        let figure = &session.figure;
        self.render_toolbar(figure.view, figure.slice, event_queue, ui);
        ui.separator();

        if figure.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Nothing plotted yet. Select datasets and press \"Plot Selected\" (Ctrl+P).");
            });
            return;
        }

        match figure.view {
            PlotView::SlicesAlongX => self.render_slices(session, SliceAxis::X, config, ui),
            PlotView::SlicesAlongY => self.render_slices(session, SliceAxis::Y, config, ui),
            PlotView::Heatmap => self.render_heatmaps(session, config, ui),
        }
    }

    fn render_toolbar(
        &self,
        view: PlotView,
        slice: SliceSelection,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) {
        ui.horizontal(|ui| {
            for option in PlotView::ALL {
                if ui
                    .selectable_label(view == option, option.to_string())
                    .clicked()
                    && view != option
                {
                    event_queue.queue_event(Box::new(SetPlotView::new(option)));
                }
            }

            if view == PlotView::Heatmap {
                return;
            }
            ui.separator();

            let mut all = slice == SliceSelection::All;
            if ui.checkbox(&mut all, "all slices").changed() {
                let slice = if all {
                    SliceSelection::All
                } else {
                    SliceSelection::default()
                };
                event_queue.queue_event(Box::new(SetSlice::new(slice)));
            }
            if let SliceSelection::At(mut position) = slice {
                let fixed = if view == PlotView::SlicesAlongX { "y" } else { "x" };
                let slider = egui::Slider::new(&mut position, 0.0..=1.0)
                    .text(format!("{fixed} position"));
                if ui.add(slider).changed() {
                    event_queue.queue_event(Box::new(SetSlice::new(SliceSelection::At(position))));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let [xmin, xmax, ymin, ymax] = self.get_current_plot_bounds();
                ui.weak(format!(
                    "showing [{xmin:.3}, {xmax:.3}] × [{ymin:.3}, {ymax:.3}]"
                ));
            });
        });
    }

    fn render_slices(
        &mut self,
        session: &Session,
        axis: SliceAxis,
        config: &Config,
        ui: &mut egui::Ui,
    ) {
        let x_label = match axis {
            SliceAxis::X => &config.x_label,
            SliceAxis::Y => &config.y_label,
        };

        let mut plot = Plot::new("slices")
            .legend(Legend::default())
            .x_axis_label(x_label.clone())
            .y_axis_label(config.z_label.clone());
        if std::mem::take(&mut self.reset_requested) {
            plot = plot.reset();
        }

        let response = plot.show(ui, |plot_ui| {
            for dataset in session.plotted() {
                for series in slice_series(dataset, axis, session.figure.slice) {
                    plot_ui.line(
                        Line::new(series.points)
                            .color(series.color)
                            .name(series.name),
                    );
                }
            }
            plot_ui.plot_bounds()
        });

        self.current_plot_bounds = {
            let [xmin, ymin] = response.inner.min();
            let [xmax, ymax] = response.inner.max();
            [xmin, xmax, ymin, ymax]
        };

        response.response.context_menu(|ui| {
            if ui.button("Reset view").clicked() {
                self.reset_requested = true;
                ui.close_menu();
            }
        });
    }

    fn render_heatmaps(&mut self, session: &Session, config: &Config, ui: &mut egui::Ui) {
        let datasets: Vec<&Dataset> = session.plotted().collect();
        let height = (ui.available_height() / datasets.len() as f32).max(250.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for dataset in datasets {
                let Some((lo, hi)) = dataset.value_range() else {
                    continue;
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&dataset.label).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format!("max {hi:.4}")).color(colormap(1.0)));
                        ui.label(RichText::new(format!("min {lo:.4}")).color(colormap(0.0)));
                    });
                });

                let cells = heatmap_cells(dataset, self.max_heatmap_cells);
                Plot::new(("heatmap", dataset.id))
                    .height(height - 30.0)
                    .x_axis_label(config.x_label.clone())
                    .y_axis_label(config.y_label.clone())
                    .show(ui, |plot_ui| {
                        for cell in cells {
                            plot_ui.polygon(
                                Polygon::new(cell.corners())
                                    .fill_color(colormap(normalize(cell.value, lo, hi)))
                                    .stroke(egui::Stroke::NONE),
                            );
                        }
                    });
                ui.add_space(8.0);
            }
        });
    }
}
