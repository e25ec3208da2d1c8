mod logic;
mod ui;

pub use logic::auto_color;

/// Draws the figure of the session. Holds only view state that does not
/// belong to the session, like the plot bounds of the last frame.
pub struct Plotter {
    current_plot_bounds: [f64; 4],
    /// Cells per axis above which heatmaps are drawn downsampled.
    max_heatmap_cells: usize,
    reset_requested: bool,
}

impl Plotter {
    pub fn new() -> Self {
        Self {
            current_plot_bounds: [0.0, 0.0, 0.0, 0.0],
            max_heatmap_cells: 100,
            reset_requested: false,
        }
    }

    pub fn get_current_plot_bounds(&self) -> [f64; 4] {
        self.current_plot_bounds
    }
}
