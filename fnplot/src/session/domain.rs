use std::fmt;

use super::errors::{AppError, AppResult};

/// Upper bound for samples per axis, keeps generation within a frame or two.
pub const MAX_RESOLUTION: usize = 1000;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DomainID(usize);

impl fmt::Display for DomainID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `count` evenly spaced samples including both bounds. A single sample
    /// sits at `min`.
    pub fn samples(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = self.span() / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            self.max
                        } else {
                            self.min + i as f64 * step
                        }
                    })
                    .collect()
            }
        }
    }

    fn check(&self, axis: &str) -> AppResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(AppError::Range(format!(
                "{axis} bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(AppError::Range(format!(
                "{axis} minimum ({}) must be smaller than its maximum ({})",
                self.min, self.max
            )));
        }
        if !self.span().is_finite() {
            return Err(AppError::Range(format!(
                "{axis} range [{}, {}] is too wide to sample",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    pub id: DomainID,
    pub name: String,
    pub x: AxisRange,
    pub y: AxisRange,
    pub resolution: usize,
}

impl Domain {
    pub fn xs(&self) -> Vec<f64> {
        self.x.samples(self.resolution)
    }

    pub fn ys(&self) -> Vec<f64> {
        self.y.samples(self.resolution)
    }

    pub fn point_count(&self) -> usize {
        self.resolution * self.resolution
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: x {} y {}, {res}×{res} points",
            self.name,
            self.x,
            self.y,
            res = self.resolution
        )
    }
}

pub fn validate(x: &AxisRange, y: &AxisRange, resolution: usize) -> AppResult<()> {
    x.check("x")?;
    y.check("y")?;
    if !(1..=MAX_RESOLUTION).contains(&resolution) {
        return Err(AppError::Range(format!(
            "resolution must be between 1 and {MAX_RESOLUTION}, got {resolution}"
        )));
    }
    Ok(())
}

fn generated_name(x: &AxisRange, y: &AxisRange, resolution: usize) -> String {
    format!("x{x} y{y} @{resolution}")
}

#[derive(Debug, Default)]
pub struct DomainManager {
    domains: Vec<Domain>,
    next_id: DomainID,
}

impl DomainManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        let defaults = [
            (AxisRange::new(0.0, 10.0), AxisRange::new(0.0, 10.0), 50),
            (AxisRange::new(10.0, 20.0), AxisRange::new(0.0, 10.0), 50),
            (AxisRange::new(0.0, 20.0), AxisRange::new(0.0, 20.0), 200),
        ];
        for (x, y, resolution) in defaults {
            if let Err(err) = manager.create("", x, y, resolution) {
                log::error!("invalid default domain: {err}");
            }
        }
        manager
    }

    /// Validate and append a domain. An empty name is derived from the bounds.
    pub fn create(
        &mut self,
        name: &str,
        x: AxisRange,
        y: AxisRange,
        resolution: usize,
    ) -> AppResult<DomainID> {
        validate(&x, &y, resolution)?;
        let name = match name.trim() {
            "" => generated_name(&x, &y, resolution),
            name => name.to_owned(),
        };
        let id = self.next_id;
        self.next_id = DomainID(id.0 + 1);
        log::debug!("creating domain {id} '{name}'");
        self.domains.push(Domain {
            id,
            name,
            x,
            y,
            resolution,
        });
        Ok(id)
    }

    /// Domains in creation order.
    pub fn list(&self) -> &[Domain] {
        &self.domains
    }

    pub fn get(&self, id: DomainID) -> Option<&Domain> {
        self.domains.iter().find(|dom| dom.id == id)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Text contents of the "New Domain" dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainDraft {
    pub name: String,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
    pub resolution: String,
}

impl DomainDraft {
    pub fn new(resolution: usize) -> Self {
        Self {
            name: String::new(),
            x_min: "-1".into(),
            x_max: "1".into(),
            y_min: "-1".into(),
            y_max: "1".into(),
            resolution: resolution.to_string(),
        }
    }

    pub fn parse(&self) -> AppResult<(AxisRange, AxisRange, usize)> {
        let x = AxisRange::new(
            parse_number("x min", &self.x_min)?,
            parse_number("x max", &self.x_max)?,
        );
        let y = AxisRange::new(
            parse_number("y min", &self.y_min)?,
            parse_number("y max", &self.y_max)?,
        );
        let text = self.resolution.trim();
        let resolution = text.parse::<i64>().map_err(|_| AppError::InvalidNumber {
            field: "resolution",
            text: text.to_owned(),
        })?;
        let resolution = usize::try_from(resolution).map_err(|_| {
            AppError::Range(format!(
                "resolution must be between 1 and {MAX_RESOLUTION}, got {resolution}"
            ))
        })?;
        Ok((x, y, resolution))
    }
}

pub(crate) fn parse_number(field: &'static str, text: &str) -> AppResult<f64> {
    let text = text.trim();
    text.parse::<f64>().map_err(|_| AppError::InvalidNumber {
        field,
        text: text.to_owned(),
    })
}
