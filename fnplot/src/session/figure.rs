use std::fmt;

use super::DatasetID;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotView {
    /// `z` against `x`, one line per selected row.
    #[default]
    SlicesAlongX,
    /// `z` against `y`, one line per selected column.
    SlicesAlongY,
    Heatmap,
}

impl PlotView {
    pub const ALL: [PlotView; 3] = [Self::SlicesAlongX, Self::SlicesAlongY, Self::Heatmap];

    pub fn next(&self) -> Self {
        match self {
            Self::SlicesAlongX => Self::SlicesAlongY,
            Self::SlicesAlongY => Self::Heatmap,
            Self::Heatmap => Self::SlicesAlongX,
        }
    }

    /// Name used in the config file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::SlicesAlongX => "slices_x",
            Self::SlicesAlongY => "slices_y",
            Self::Heatmap => "heatmap",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.key() == key)
    }
}

impl fmt::Display for PlotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SlicesAlongX => "Slices along x",
            Self::SlicesAlongY => "Slices along y",
            Self::Heatmap => "Heatmap",
        };
        write!(f, "{name}")
    }
}

/// Which rows (or columns) the slice views draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliceSelection {
    /// Relative position in `[0, 1]` along the other axis.
    At(f64),
    All,
}

impl Default for SliceSelection {
    fn default() -> Self {
        Self::At(0.5)
    }
}

impl SliceSelection {
    /// Indices out of `count` samples covered by this selection.
    pub fn indices(&self, count: usize) -> Vec<usize> {
        match *self {
            _ if count == 0 => Vec::new(),
            Self::All => (0..count).collect(),
            Self::At(position) => {
                let position = if position.is_finite() {
                    position.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                vec![(position * (count - 1) as f64).round() as usize]
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotMode {
    /// Plot only the selection.
    #[default]
    Replace,
    /// Add the selection to what is already plotted.
    Append,
}

/// Datasets currently drawn, referenced by id, and how to draw them.
#[derive(Clone, Debug, Default)]
pub struct Figure {
    datasets: Vec<DatasetID>,
    pub view: PlotView,
    pub slice: SliceSelection,
}

impl Figure {
    pub fn new(view: PlotView) -> Self {
        Self {
            view,
            ..Default::default()
        }
    }

    pub fn datasets(&self) -> &[DatasetID] {
        &self.datasets
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn plot(&mut self, ids: impl IntoIterator<Item = DatasetID>, mode: PlotMode) {
        if mode == PlotMode::Replace {
            self.datasets.clear();
        }
        for id in ids {
            if !self.datasets.contains(&id) {
                self.datasets.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.datasets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_indices() {
        assert_eq!(SliceSelection::At(0.0).indices(5), vec![0]);
        assert_eq!(SliceSelection::At(0.5).indices(5), vec![2]);
        assert_eq!(SliceSelection::At(1.0).indices(5), vec![4]);
        assert_eq!(SliceSelection::At(7.0).indices(5), vec![4]);
        assert_eq!(SliceSelection::At(0.5).indices(1), vec![0]);
        assert_eq!(SliceSelection::All.indices(3), vec![0, 1, 2]);
        assert!(SliceSelection::All.indices(0).is_empty());
    }

    #[test]
    fn test_view_keys() {
        for view in PlotView::ALL {
            assert_eq!(PlotView::from_key(view.key()), Some(view));
        }
        assert_eq!(PlotView::from_key("surface"), None);
        assert_eq!(PlotView::Heatmap.next(), PlotView::SlicesAlongX);
    }
}
