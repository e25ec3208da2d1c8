use app_core::report::{Level, Report, Reporter};

const HISTORY_LEN: usize = 50;

/// Shows the latest report at the bottom of the window. Errors additionally
/// open a modal dialog until dismissed.
#[derive(Debug, Default)]
pub struct StatusBar {
    current: Option<Report>,
    history: Vec<Report>,
    pending_error: Option<String>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.current {
                Some(report) => {
                    let text = egui::RichText::new(report.to_string());
                    let text = match report.level {
                        Level::Info => text,
                        Level::Warning => text.color(ui.visuals().warn_fg_color),
                        Level::Error => text.color(ui.visuals().error_fg_color),
                    };
                    ui.add(egui::Label::new(text).truncate())
                        .on_hover_ui(|ui| self.history_ui(ui));
                }
                None => {
                    ui.label("Ready");
                }
            };
        });
    }

    fn history_ui(&self, ui: &mut egui::Ui) {
        for report in self.history.iter().rev().take(10) {
            ui.label(report.to_string());
        }
    }

    pub fn render_error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.pending_error else {
            return;
        };
        let mut dismissed = false;
        let modal = egui::Modal::new("error_modal".into()).show(ctx, |ui| {
            ui.set_max_width(400.0);
            ui.heading("Error");
            ui.separator();
            ui.label(message);
            ui.separator();
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || modal.should_close() {
            self.pending_error = None;
        }
    }
}

impl Reporter for StatusBar {
    fn report(&mut self, report: Report) {
        match report.level {
            Level::Info => log::debug!("status: {}", report.text),
            Level::Warning => log::warn!("{}", report.text),
            Level::Error => {
                log::error!("{}", report.text);
                self.pending_error = Some(report.text.clone());
            }
        }
        if self.history.len() == HISTORY_LEN {
            self.history.remove(0);
        }
        self.history.push(report.clone());
        self.current = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_open_dialog() {
        let mut status = StatusBar::new();
        status.info("loaded 3 functions");
        assert!(status.pending_error.is_none());
        status.error("no domain selected");
        assert_eq!(status.pending_error.as_deref(), Some("no domain selected"));
        assert_eq!(status.current.as_ref().map(|r| r.level), Some(Level::Error));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut status = StatusBar::new();
        for i in 0..HISTORY_LEN + 5 {
            status.info(format!("message {i}"));
        }
        assert_eq!(status.history.len(), HISTORY_LEN);
        assert_eq!(status.history[0].text, "message 5");
    }

    #[test]
    fn test_failed_action_is_reported_once() {
        use crate::{controller::Controller, session::Session};

        let mut ctrl = Controller::new(Session::with_defaults(), StatusBar::new());
        assert!(ctrl.generate_dataset().is_err());
        let status = ctrl.reporter();
        let errors = status
            .history
            .iter()
            .filter(|report| report.level == Level::Error)
            .count();
        assert_eq!(errors, 1);
        assert!(status.pending_error.is_some());
    }
}
