use app_core::string_error::ErrorStringExt;
use std::{io::Read, path::PathBuf};

use crate::session::{PlotView, MAX_RESOLUTION};

const CONFIG_FILE_NAME: &str = ".fnplot";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Definitions merged into the registry at startup.
    pub definitions_path: Option<PathBuf>,
    pub default_resolution: usize,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub plot_view: PlotView,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions_path: None,
            default_resolution: 50,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            z_label: "z".to_string(),
            plot_view: PlotView::default(),
        }
    }
}

impl Config {
    pub fn from_config_file() -> Result<Self, String> {
        #[allow(deprecated)]
        let Some(home) = std::env::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        let config_raw = {
            let path = home.join(CONFIG_FILE_NAME);
            let mut file = std::fs::File::open(path).err_to_string("could not open config file")?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        Ok(Self::parse(&config_raw))
    }

    /// Read `key=value` lines. Unknown keys and bad values are skipped with
    /// a warning.
    pub fn parse(raw: &str) -> Self {
        let mut config = Self::default();
        for line in raw.lines().map(str::trim) {
            // Lines starting with "#" are considered comments.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("ignoring config line without '=': {line}");
                continue;
            };
            let val = val.trim();
            match key.trim() {
                "definitions_path" => {
                    config.definitions_path = (!val.is_empty()).then(|| PathBuf::from(val));
                }
                "default_resolution" => match val.parse::<usize>() {
                    Ok(res) if (1..=MAX_RESOLUTION).contains(&res) => {
                        config.default_resolution = res
                    }
                    _ => log::warn!(
                        "could not parse 'default_resolution' as number between 1 and {MAX_RESOLUTION}"
                    ),
                },
                "x_label" => config.x_label = val.to_string(),
                "y_label" => config.y_label = val.to_string(),
                "z_label" => config.z_label = val.to_string(),
                "plot_view" => match PlotView::from_key(val) {
                    Some(view) => config.plot_view = view,
                    None => log::warn!(
                        "unknown 'plot_view' {val:?}, expected slices_x, slices_y or heatmap"
                    ),
                },
                other => log::warn!("unknown config key '{other}'"),
            }
        }
        config
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preferences");
        ui.separator();

        egui::Grid::new("preferences_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("x label");
                ui.text_edit_singleline(&mut self.x_label);
                ui.end_row();

                ui.label("y label");
                ui.text_edit_singleline(&mut self.y_label);
                ui.end_row();

                ui.label("z label");
                ui.text_edit_singleline(&mut self.z_label);
                ui.end_row();

                ui.label("default resolution");
                ui.add(
                    egui::DragValue::new(&mut self.default_resolution)
                        .range(1..=MAX_RESOLUTION),
                );
                ui.end_row();

                ui.label("initial plot view");
                egui::ComboBox::from_id_salt("preferences_view")
                    .selected_text(self.plot_view.to_string())
                    .show_ui(ui, |ui| {
                        for view in PlotView::ALL {
                            ui.selectable_value(&mut self.plot_view, view, view.to_string());
                        }
                    });
                ui.end_row();

                ui.label("definitions file");
                let path = self
                    .definitions_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "none".to_string());
                ui.label(path);
                ui.end_row();
            });

        ui.separator();
        ui.label(format!(
            "Preferences are read from ~/{CONFIG_FILE_NAME} at startup; changes here last for this session."
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let _ = env_logger::builder().is_test(true).try_init();
        let raw = "\
# fnplot settings
definitions_path = /home/me/functions.json
default_resolution=120
z_label=amplitude
plot_view=heatmap
";
        let config = Config::parse(raw);
        assert_eq!(
            config.definitions_path,
            Some(PathBuf::from("/home/me/functions.json"))
        );
        assert_eq!(config.default_resolution, 120);
        assert_eq!(config.z_label, "amplitude");
        assert_eq!(config.x_label, "x");
        assert_eq!(config.plot_view, PlotView::Heatmap);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let _ = env_logger::builder().is_test(true).try_init();
        let raw = "default_resolution=lots\ndefault_resolution=0\nplot_view=surface\nnonsense\ncolor=red";
        assert_eq!(Config::parse(raw), Config::default());
    }
}
