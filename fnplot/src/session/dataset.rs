use std::{collections::BTreeMap, fmt};

use super::{
    domain::Domain,
    evaluate::SampledGrid,
    functions::{format_parameters, FunctionDef},
};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DatasetID(usize);

impl fmt::Display for DatasetID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<DatasetID> for i32 {
    fn from(val: DatasetID) -> Self {
        i32::try_from(val.0).unwrap_or(i32::MAX)
    }
}

/// State of a function at the time a dataset was generated.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSnapshot {
    pub name: String,
    pub expression: String,
    pub parameters: BTreeMap<String, f64>,
}

impl From<&FunctionDef> for FunctionSnapshot {
    fn from(def: &FunctionDef) -> Self {
        Self {
            name: def.name.clone(),
            expression: def.expression.source().to_owned(),
            parameters: def.parameters.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub id: DatasetID,
    pub label: String,
    pub function: FunctionSnapshot,
    pub domain: Domain,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Row-major, `values[j * nx + i] = f(xs[i], ys[j])`.
    pub values: Vec<f64>,
}

impl Dataset {
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.nx() {
            return None;
        }
        self.values.get(j * self.nx() + i).copied()
    }

    /// Values along x at `ys[j]`.
    pub fn row(&self, j: usize) -> Option<&[f64]> {
        let nx = self.nx();
        self.values.get(j * nx..(j + 1) * nx)
    }

    /// Values along y at `xs[i]`.
    pub fn column(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.nx() {
            return None;
        }
        Some(self.values.iter().skip(i).step_by(self.nx()).copied().collect())
    }

    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &val| match acc {
            None => Some((val, val)),
            Some((lo, hi)) => Some((lo.min(val), hi.max(val))),
        })
    }
}

fn base_label(function: &FunctionSnapshot, domain: &Domain) -> String {
    format!(
        "{}({}) on {}",
        function.name,
        format_parameters(&function.parameters),
        domain.name
    )
}

/// Generated datasets in order of creation. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct DatasetStore {
    datasets: Vec<Dataset>,
    next_id: DatasetID,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        function: FunctionSnapshot,
        domain: Domain,
        grid: SampledGrid,
    ) -> DatasetID {
        let base = base_label(&function, &domain);
        let label = self.unique_label(base);
        let id = self.next_id;
        self.next_id = DatasetID(id.0 + 1);

        let SampledGrid { xs, ys, values } = grid;
        log::debug!("storing dataset {id:?} '{label}'");
        self.datasets.push(Dataset {
            id,
            label,
            function,
            domain,
            xs,
            ys,
            values,
        });
        id
    }

    fn unique_label(&self, base: String) -> String {
        let taken = |label: &str| self.datasets.iter().any(|ds| ds.label == label);
        if !taken(base.as_str()) {
            return base;
        }
        let mut n = 2;
        loop {
            let label = format!("{base} #{n}");
            if !taken(label.as_str()) {
                return label;
            }
            n += 1;
        }
    }

    pub fn get(&self, id: DatasetID) -> Option<&Dataset> {
        // ids are handed out in order, so they double as indices
        self.datasets.get(id.0).filter(|ds| ds.id == id)
    }

    pub fn contains(&self, id: DatasetID) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::domain::{AxisRange, DomainManager};

    fn snapshot(a: f64) -> FunctionSnapshot {
        FunctionSnapshot {
            name: "paraboloid".into(),
            expression: "a*x^2 + b*y".into(),
            parameters: [("a".to_string(), a), ("b".to_string(), 1.0)].into(),
        }
    }

    fn domain() -> Domain {
        let mut domains = DomainManager::new();
        let unit = AxisRange::new(-1.0, 1.0);
        let id = domains.create("unit", unit, unit, 2).unwrap();
        domains.get(id).unwrap().clone()
    }

    fn grid() -> SampledGrid {
        SampledGrid {
            xs: vec![-1.0, 1.0],
            ys: vec![-1.0, 1.0],
            values: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut store = DatasetStore::new();
        let first = store.push(snapshot(1.0), domain(), grid());
        let second = store.push(snapshot(2.0), domain(), grid());
        let third = store.push(snapshot(1.0), domain(), grid());
        let fourth = store.push(snapshot(1.0), domain(), grid());

        let label = |id| store.get(id).unwrap().label.clone();
        assert_eq!(label(first), "paraboloid(a=1, b=1) on unit");
        assert_eq!(label(second), "paraboloid(a=2, b=1) on unit");
        assert_eq!(label(third), "paraboloid(a=1, b=1) on unit #2");
        assert_eq!(label(fourth), "paraboloid(a=1, b=1) on unit #3");
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_grid_access() {
        let mut store = DatasetStore::new();
        let id = store.push(snapshot(1.0), domain(), grid());
        let ds = store.get(id).unwrap();
        assert_eq!(ds.value(1, 0), Some(2.0));
        assert_eq!(ds.value(0, 1), Some(3.0));
        assert_eq!(ds.value(2, 0), None);
        assert_eq!(ds.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(ds.row(2), None);
        assert_eq!(ds.column(1), Some(vec![2.0, 4.0]));
        assert_eq!(ds.value_range(), Some((1.0, 4.0)));
    }

    #[test]
    fn test_id_color_index_saturates() {
        assert_eq!(i32::from(DatasetID(7)), 7);
        assert_eq!(i32::from(DatasetID(usize::MAX)), i32::MAX);
    }
}
