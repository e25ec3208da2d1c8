use super::{
    domain::Domain,
    errors::{AppError, AppResult},
    functions::FunctionDef,
};
use expr_eval::{X, Y};

/// Function values on a domain's grid, row-major: `values[j * xs.len() + i]`
/// is `f(xs[i], ys[j])`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub values: Vec<f64>,
}

/// Evaluate `function` with its current parameters on every grid point of
/// `domain`. Stops at the first point that fails to evaluate.
pub fn sample_grid(function: &FunctionDef, domain: &Domain) -> AppResult<SampledGrid> {
    // slot layout: x, y, then parameters in name order
    let mut slots: Vec<&str> = vec![X, Y];
    slots.extend(function.parameters.keys().map(String::as_str));
    let bound = function
        .expression
        .bind(&slots)
        .map_err(|err| AppError::validation(&function.name, err.to_string()))?;

    let mut point = vec![0.0, 0.0];
    point.extend(function.parameters.values().copied());

    let xs = domain.xs();
    let ys = domain.ys();
    let mut values = Vec::with_capacity(xs.len() * ys.len());
    let mut stack = Vec::new();
    for &y in ys.iter() {
        point[1] = y;
        for &x in xs.iter() {
            point[0] = x;
            let val = bound
                .eval_with_stack(&point, &mut stack)
                .map_err(|source| AppError::Evaluation {
                    function: function.name.clone(),
                    x,
                    y,
                    source,
                })?;
            values.push(val);
        }
    }
    log::debug!(
        "sampled '{}' on '{}' ({} points)",
        function.name,
        domain.name,
        values.len()
    );
    Ok(SampledGrid { xs, ys, values })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::session::domain::{AxisRange, DomainManager};

    fn function(expression: &str, params: &[(&str, f64)]) -> FunctionDef {
        let params: BTreeMap<String, f64> =
            params.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect();
        FunctionDef::new("f", expression, params).unwrap()
    }

    fn domain(min: f64, max: f64, resolution: usize) -> Domain {
        let mut domains = DomainManager::new();
        let range = AxisRange::new(min, max);
        let id = domains.create("", range, range, resolution).unwrap();
        domains.get(id).unwrap().clone()
    }

    #[test]
    fn test_grid_is_row_major() {
        let f = function("10*y + x", &[]);
        let grid = sample_grid(&f, &domain(0.0, 2.0, 3)).unwrap();
        assert_eq!(grid.xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(grid.ys, vec![0.0, 1.0, 2.0]);
        assert_eq!(
            grid.values,
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0]
        );
    }

    #[test]
    fn test_value_count_matches_resolution() {
        let f = function("a*x^2 + b*y", &[("a", 1.0), ("b", 1.0)]);
        for resolution in [1, 2, 5, 17] {
            let grid = sample_grid(&f, &domain(-1.0, 1.0, resolution)).unwrap();
            assert_eq!(grid.values.len(), resolution * resolution);
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let f = function("A*sin(2*pi*x)*exp(-y/B)", &[("A", 1.5), ("B", 0.7)]);
        let dom = domain(-3.0, 3.0, 25);
        assert_eq!(sample_grid(&f, &dom).unwrap(), sample_grid(&f, &dom).unwrap());
    }

    #[test]
    fn test_failure_reports_point() {
        let f = function("1 / x", &[]);
        let err = sample_grid(&f, &domain(-1.0, 1.0, 3)).unwrap_err();
        match err {
            AppError::Evaluation { function, x, y, .. } => {
                assert_eq!(function, "f");
                assert_eq!((x, y), (0.0, -1.0));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
