use egui::Color32;

use crate::session::{AxisRange, Dataset, SliceSelection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SliceAxis {
    /// `z` over `x` at fixed `y`.
    X,
    /// `z` over `y` at fixed `x`.
    Y,
}

#[derive(Debug)]
pub(super) struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
}

/// One line per selected slice of `dataset`. When all slices are drawn they
/// share the dataset label, so the legend toggles them together.
pub(super) fn slice_series(
    dataset: &Dataset,
    axis: SliceAxis,
    slice: SliceSelection,
) -> Vec<Series> {
    let color = auto_color(dataset.id.into());
    let (along, across, across_name) = match axis {
        SliceAxis::X => (&dataset.xs, &dataset.ys, "y"),
        SliceAxis::Y => (&dataset.ys, &dataset.xs, "x"),
    };
    slice
        .indices(across.len())
        .into_iter()
        .filter_map(|k| {
            let values = match axis {
                SliceAxis::X => dataset.row(k)?.to_vec(),
                SliceAxis::Y => dataset.column(k)?,
            };
            let name = match slice {
                SliceSelection::All => dataset.label.clone(),
                SliceSelection::At(_) => {
                    format!("{} @ {across_name} = {:.4}", dataset.label, across[k])
                }
            };
            let points = along
                .iter()
                .zip(values)
                .map(|(pos, val)| [*pos, val])
                .collect();
            Some(Series {
                name,
                points,
                color,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct HeatmapCell {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub value: f64,
}

impl HeatmapCell {
    pub fn corners(&self) -> Vec<[f64; 2]> {
        let ([x0, x1], [y0, y1]) = (self.x, self.y);
        vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
    }
}

/// Every `n`-th index so that at most `max` remain.
fn strided(count: usize, max: usize) -> Vec<usize> {
    let stride = count.div_ceil(max.max(1)).max(1);
    (0..count).step_by(stride).collect()
}

/// Cell borders halfway between picked samples, the outermost ones on the
/// domain bounds.
fn cell_edges(samples: &[f64], picked: &[usize], range: AxisRange) -> Vec<f64> {
    let mut edges = Vec::with_capacity(picked.len() + 1);
    edges.push(range.min);
    for pair in picked.windows(2) {
        edges.push((samples[pair[0]] + samples[pair[1]]) / 2.0);
    }
    edges.push(range.max);
    edges
}

/// Tiles covering the domain of `dataset`, downsampled to at most
/// `max_cells` per axis.
pub(super) fn heatmap_cells(dataset: &Dataset, max_cells: usize) -> Vec<HeatmapCell> {
    let cols = strided(dataset.nx(), max_cells);
    let rows = strided(dataset.ny(), max_cells);
    let x_edges = cell_edges(&dataset.xs, &cols, dataset.domain.x);
    let y_edges = cell_edges(&dataset.ys, &rows, dataset.domain.y);

    let mut cells = Vec::with_capacity(cols.len() * rows.len());
    for (jj, j) in rows.iter().enumerate() {
        for (ii, i) in cols.iter().enumerate() {
            if let Some(value) = dataset.value(*i, *j) {
                cells.push(HeatmapCell {
                    x: [x_edges[ii], x_edges[ii + 1]],
                    y: [y_edges[jj], y_edges[jj + 1]],
                    value,
                });
            }
        }
    }
    cells
}

/// Position of `value` within `[lo, hi]`, 0.5 for a constant dataset.
pub(super) fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

// viridis, sampled at five points
const COLORMAP: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

pub(super) fn colormap(t: f64) -> Color32 {
    if !t.is_finite() {
        return Color32::GRAY;
    }
    let scaled = t.clamp(0.0, 1.0) * (COLORMAP.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(COLORMAP.len() - 2);
    let frac = scaled - lower as f64;
    let [r, g, b] = [0, 1, 2].map(|c| {
        let (a, b) = (COLORMAP[lower][c] as f64, COLORMAP[lower + 1][c] as f64);
        (a + (b - a) * frac).round() as u8
    });
    Color32::from_rgb(r, g, b)
}

pub fn auto_color(color_idx: i32) -> Color32 {
    // analog to egui_plot
    let golden_ratio = (5.0_f32.sqrt() - 1.0) / 2.0; // 0.61803398875
    let h = color_idx as f32 * golden_ratio;
    egui::epaint::Hsva::new(h, 0.85, 0.5, 1.0).into()
}
