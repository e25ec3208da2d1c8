//! Named functions of `x` and `y`, loaded from JSON definition files.
//!
//! ```json
//! {
//!   "paraboloid": {
//!     "expression": "a*x^2 + b*y",
//!     "parameters": { "a": 1.0, "b": 1.0 },
//!     "description": "tilted paraboloid"
//!   },
//!   "ripple": { "expression": "sin(k*x) * cos(k*y)", "parameters": ["k"] }
//! }
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use expr_eval::{is_reserved, Expression, X, Y};
use serde::Deserialize;

use super::errors::{AppError, AppResult};

/// Value of parameters declared by name only.
pub const DEFAULT_PARAMETER_VALUE: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub expression: Expression,
    pub parameters: BTreeMap<String, f64>,
    pub description: String,
    pub parameter_descriptions: BTreeMap<String, String>,
}

impl FunctionDef {
    pub fn new(name: &str, expression: &str, parameters: BTreeMap<String, f64>) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation(name, "function name must not be empty"));
        }
        let expression = parse_expression(expression)?;
        validate(name, &expression, &parameters)?;
        Ok(Self {
            name: name.to_owned(),
            expression,
            parameters,
            description: String::new(),
            parameter_descriptions: BTreeMap::new(),
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn with_parameter_description(mut self, parameter: &str, description: &str) -> Self {
        self.parameter_descriptions
            .insert(parameter.to_owned(), description.to_owned());
        self
    }

    /// `a=1, b=2`
    pub fn parameter_summary(&self) -> String {
        format_parameters(&self.parameters)
    }
}

pub(crate) fn format_parameters(parameters: &BTreeMap<String, f64>) -> String {
    parameters
        .iter()
        .map(|(name, val)| format!("{name}={val}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_expression(src: &str) -> AppResult<Expression> {
    Expression::parse(src).map_err(|source| AppError::Parse {
        expression: src.trim().to_owned(),
        source,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|chr| chr.is_ascii_alphabetic() || chr == '_')
        && chars.all(|chr| chr.is_ascii_alphanumeric() || chr == '_')
}

fn validate(
    name: &str,
    expression: &Expression,
    parameters: &BTreeMap<String, f64>,
) -> AppResult<()> {
    for (param, val) in parameters.iter() {
        if !is_identifier(param) {
            return Err(AppError::validation(
                name,
                format!("'{param}' is not a valid parameter name"),
            ));
        }
        if is_reserved(param) {
            return Err(AppError::validation(
                name,
                format!("'{param}' is reserved and cannot be a parameter"),
            ));
        }
        if !val.is_finite() {
            return Err(AppError::validation(
                name,
                format!("parameter '{param}' must be finite, got {val}"),
            ));
        }
    }

    let symbols = expression.free_symbols();
    let undeclared: Vec<&str> = symbols
        .iter()
        .map(String::as_str)
        .filter(|sym| *sym != X && *sym != Y && !parameters.contains_key(*sym))
        .collect();
    if !undeclared.is_empty() {
        return Err(AppError::validation(
            name,
            format!("undeclared symbol(s) {}", undeclared.join(", ")),
        ));
    }

    for param in parameters.keys().filter(|param| !symbols.contains(*param)) {
        log::warn!("parameter '{param}' of function '{name}' is not used in its expression");
    }
    Ok(())
}

/// Text contents of the "Modify Function" dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDraft {
    pub name: String,
    pub expression: String,
    /// Parameter name and value text, in display order.
    pub parameters: Vec<(String, String)>,
}

impl From<&FunctionDef> for FunctionDraft {
    fn from(def: &FunctionDef) -> Self {
        Self {
            name: def.name.clone(),
            expression: def.expression.source().to_owned(),
            parameters: def
                .parameters
                .iter()
                .map(|(name, val)| (name.clone(), val.to_string()))
                .collect(),
        }
    }
}

impl FunctionDraft {
    pub fn parse_parameters(&self) -> AppResult<BTreeMap<String, f64>> {
        let mut parameters = BTreeMap::new();
        for (name, text) in self.parameters.iter() {
            let name = name.trim();
            let val = super::domain::parse_number("parameter value", text)?;
            if parameters.insert(name.to_owned(), val).is_some() {
                return Err(AppError::validation(
                    &self.name,
                    format!("parameter '{name}' is declared twice"),
                ));
            }
        }
        Ok(parameters)
    }

    /// Add a row for every symbol of the expression that is not declared
    /// yet. Returns the number of rows added.
    pub fn detect_parameters(&mut self) -> AppResult<usize> {
        let suggested = FunctionRegistry::suggest_parameters(&self.expression)?;
        let mut added = 0;
        for name in suggested {
            if !self.parameters.iter().any(|(param, _)| param.trim() == name) {
                self.parameters
                    .push((name, DEFAULT_PARAMETER_VALUE.to_string()));
                added += 1;
            }
        }
        Ok(added)
    }
}

// ---------------------------------------------------------------------------
// Definitions file
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionEntry {
    expression: String,
    #[serde(default)]
    parameters: ParameterSpec,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameter_descriptions: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParameterSpec {
    Values(BTreeMap<String, f64>),
    Names(Vec<String>),
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self::Values(BTreeMap::new())
    }
}

impl ParameterSpec {
    fn into_values(self) -> BTreeMap<String, f64> {
        match self {
            Self::Values(values) => values,
            Self::Names(names) => names
                .into_iter()
                .map(|name| (name, DEFAULT_PARAMETER_VALUE))
                .collect(),
        }
    }
}

impl DefinitionEntry {
    fn into_function(self, name: &str) -> AppResult<FunctionDef> {
        let mut def = FunctionDef::new(name, &self.expression, self.parameters.into_values())?
            .with_description(&self.description);
        for (param, desc) in self.parameter_descriptions {
            if !def.parameters.contains_key(&param) {
                log::warn!("description given for unknown parameter '{param}' of '{name}'");
            }
            def = def.with_parameter_description(&param, &desc);
        }
        Ok(def)
    }
}

/// Parse a complete definitions file. Fails on the first invalid entry.
pub fn parse_definitions(raw: &str) -> Result<Vec<FunctionDef>, String> {
    let entries: BTreeMap<String, DefinitionEntry> =
        serde_json::from_str(raw).map_err(|err| err.to_string())?;
    entries
        .into_iter()
        .map(|(name, entry)| {
            entry
                .into_function(&name)
                .map_err(|err| format!("entry '{name}': {err}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Keep existing functions, replace those with the same name.
    #[default]
    Merge,
    /// Drop every function not in the file.
    Replace,
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, FunctionDef>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin_functions() {
            registry.insert(def);
        }
        registry
    }

    /// Load definitions from `path`. The registry is left untouched if any
    /// entry fails to parse or validate.
    pub fn load_file(&mut self, path: &Path, mode: LoadMode) -> AppResult<usize> {
        log::debug!("loading function definitions from {path:?} ({mode:?})");
        let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(path.to_owned()),
            _ => AppError::Io {
                path: path.to_owned(),
                source,
            },
        })?;
        self.load_str(&raw, mode, path)
    }

    /// Same as [`Self::load_file`], with `origin` only used for error messages.
    pub fn load_str(&mut self, raw: &str, mode: LoadMode, origin: &Path) -> AppResult<usize> {
        let defs = parse_definitions(raw).map_err(|reason| AppError::FileFormat {
            path: PathBuf::from(origin),
            reason,
        })?;
        let count = defs.len();
        if mode == LoadMode::Replace {
            self.functions.clear();
        }
        for def in defs {
            self.insert(def);
        }
        log::info!("loaded {count} function(s) from {origin:?}");
        Ok(count)
    }

    pub fn insert(&mut self, def: FunctionDef) {
        if self.functions.contains_key(&def.name) {
            log::debug!("replacing function '{}'", def.name);
        }
        self.functions.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDef> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Replace expression and parameters of an existing function. On error
    /// the entry keeps its previous state.
    pub fn update(
        &mut self,
        name: &str,
        expression: &str,
        parameters: BTreeMap<String, f64>,
    ) -> AppResult<()> {
        let Some(def) = self.functions.get_mut(name) else {
            return Err(AppError::UnknownFunction(name.to_owned()));
        };
        let expression = parse_expression(expression)?;
        validate(name, &expression, &parameters)?;
        def.parameter_descriptions
            .retain(|param, _| parameters.contains_key(param));
        def.expression = expression;
        def.parameters = parameters;
        Ok(())
    }

    /// Symbols of `expression` that would have to be declared as parameters.
    pub fn suggest_parameters(expression: &str) -> AppResult<Vec<String>> {
        let expression = parse_expression(expression)?;
        Ok(expression
            .free_symbols()
            .iter()
            .filter(|sym| *sym != X && *sym != Y)
            .cloned()
            .collect())
    }
}

fn builtin_functions() -> Vec<FunctionDef> {
    let params = |pairs: &[(&str, f64)]| -> BTreeMap<String, f64> {
        pairs
            .iter()
            .map(|(name, val)| ((*name).to_owned(), *val))
            .collect()
    };
    let defs = [
        FunctionDef::new(
            "damped_oscillator",
            "A*sin(2*pi*x)*exp(-y/B)",
            params(&[("A", 1.0), ("B", 1.0)]),
        )
        .map(|def| {
            def.with_description("oscillation decaying along y")
                .with_parameter_description("A", "amplitude")
                .with_parameter_description("B", "decay length")
        }),
        FunctionDef::new(
            "unstable_oscillator",
            "A*sin(2*pi*x)*exp(y/B)",
            params(&[("A", 1.0), ("B", 1.0)]),
        )
        .map(|def| {
            def.with_description("oscillation growing along y")
                .with_parameter_description("A", "amplitude")
                .with_parameter_description("B", "growth length")
        }),
        FunctionDef::new(
            "paraboloid",
            "a*x^2 + b*y",
            params(&[("a", 1.0), ("b", 1.0)]),
        )
        .map(|def| {
            def.with_description("parabola along x, tilted along y")
                .with_parameter_description("a", "curvature")
                .with_parameter_description("b", "slope")
        }),
    ];
    defs.into_iter()
        .filter_map(|def| match def {
            Ok(def) => Some(def),
            Err(err) => {
                log::error!("invalid builtin function: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect()
    }

    const DEFINITIONS: &str = r#"{
        "paraboloid": {
            "expression": "a*x^2 + b*y",
            "parameters": { "a": 1.0, "b": 2 },
            "description": "tilted paraboloid",
            "parameter_descriptions": { "a": "curvature" }
        },
        "ripple": { "expression": "sin(k*x) * cos(k*y)", "parameters": ["k"] },
        "plane": { "expression": "x + y" }
    }"#;

    #[test]
    fn test_load_well_formed_file() {
        init();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEFINITIONS.as_bytes()).unwrap();

        let mut registry = FunctionRegistry::new();
        let count = registry.load_file(file.path(), LoadMode::Merge).unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["paraboloid", "plane", "ripple"]
        );

        let paraboloid = registry.get("paraboloid").unwrap();
        assert_eq!(paraboloid.parameters, params(&[("a", 1.0), ("b", 2.0)]));
        assert_eq!(paraboloid.description, "tilted paraboloid");
        assert_eq!(paraboloid.parameter_descriptions["a"], "curvature");

        let ripple = registry.get("ripple").unwrap();
        assert_eq!(ripple.parameters, params(&[("k", DEFAULT_PARAMETER_VALUE)]));
        assert!(registry.get("plane").unwrap().parameters.is_empty());
    }

    #[test]
    fn test_malformed_file_leaves_registry_unchanged() {
        init();
        let mut registry = FunctionRegistry::with_builtins();
        let before: Vec<String> = registry.names().map(str::to_owned).collect();

        let broken = [
            "{ not json",
            r#"{ "f": { "expression": "x +" } }"#,
            r#"{ "f": { "expression": "k*x" } }"#,
            r#"{ "f": { "expression": "x", "paramters": [] } }"#,
            r#"{ "ok": { "expression": "x" }, "bad": { "expression": "y", "parameters": ["x"] } }"#,
        ];
        for raw in broken {
            let err = registry
                .load_str(raw, LoadMode::Replace, Path::new("broken.json"))
                .unwrap_err();
            assert!(matches!(err, AppError::FileFormat { .. }), "{raw}: {err}");
            let after: Vec<String> = registry.names().map(str::to_owned).collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_missing_file() {
        let mut registry = FunctionRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let err = registry
            .load_file(&dir.path().join("missing.json"), LoadMode::Merge)
            .unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }

    #[test]
    fn test_merge_and_replace() {
        init();
        let origin = Path::new("defs.json");
        let mut registry = FunctionRegistry::with_builtins();
        let builtins = registry.len();

        registry
            .load_str(
                r#"{ "paraboloid": { "expression": "c*x^2", "parameters": { "c": 3 } } }"#,
                LoadMode::Merge,
                origin,
            )
            .unwrap();
        assert_eq!(registry.len(), builtins);
        assert_eq!(registry.get("paraboloid").unwrap().expression.source(), "c*x^2");

        registry
            .load_str(r#"{ "plane": { "expression": "x + y" } }"#, LoadMode::Replace, origin)
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["plane"]);
    }

    #[test]
    fn test_validation() {
        init();
        let err = FunctionDef::new("f", "a*x + k", params(&[("a", 1.0)])).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("undeclared symbol(s) k"));

        let err = FunctionDef::new("f", "x", params(&[("pi", 1.0)])).unwrap_err();
        assert!(err.to_string().contains("reserved"));

        let err = FunctionDef::new("f", "a*x", params(&[("a", f64::NAN)])).unwrap_err();
        assert!(err.to_string().contains("finite"));

        let err = FunctionDef::new("f", "x", params(&[("2a", 1.0)])).unwrap_err();
        assert!(err.to_string().contains("not a valid parameter name"));

        let err = FunctionDef::new("f", "x *", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));

        // unused parameters are only a warning
        assert!(FunctionDef::new("f", "x", params(&[("a", 1.0)])).is_ok());
    }

    #[test]
    fn test_update_keeps_entry_on_error() {
        init();
        let mut registry = FunctionRegistry::with_builtins();
        registry
            .update("paraboloid", "a*x^2 + b*y", params(&[("a", 2.0), ("b", 1.0)]))
            .unwrap();
        assert_eq!(registry.get("paraboloid").unwrap().parameters["a"], 2.0);

        let err = registry
            .update("paraboloid", "a*x^2 + q", params(&[("a", 5.0)]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        let def = registry.get("paraboloid").unwrap();
        assert_eq!(def.parameters, params(&[("a", 2.0), ("b", 1.0)]));
        assert_eq!(def.expression.source(), "a*x^2 + b*y");

        assert!(matches!(
            registry.update("nope", "x", BTreeMap::new()),
            Err(AppError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_suggest_parameters() {
        let suggested = FunctionRegistry::suggest_parameters("amp*sin(k*x) + y*pi").unwrap();
        assert_eq!(suggested, vec!["amp".to_string(), "k".to_string()]);
    }

    #[test]
    fn test_function_draft() {
        init();
        let registry = FunctionRegistry::with_builtins();
        let mut draft = FunctionDraft::from(registry.get("paraboloid").unwrap());
        assert_eq!(
            draft.parameters,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "1".to_string())]
        );

        draft.expression = "a*x^2 + b*y + c".into();
        assert_eq!(draft.detect_parameters().unwrap(), 1);
        assert_eq!(draft.detect_parameters().unwrap(), 0);
        draft.parameters[2].1 = "0.5".into();
        assert_eq!(
            draft.parse_parameters().unwrap(),
            params(&[("a", 1.0), ("b", 1.0), ("c", 0.5)])
        );

        draft.parameters[0].1 = "big".into();
        assert!(matches!(
            draft.parse_parameters(),
            Err(AppError::InvalidNumber { .. })
        ));
        draft.parameters[0] = ("b".into(), "2".into());
        assert!(matches!(
            draft.parse_parameters(),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_builtins_are_valid() {
        init();
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["damped_oscillator", "paraboloid", "unstable_oscillator"]
        );
        assert_eq!(
            registry.get("paraboloid").unwrap().parameter_summary(),
            "a=1, b=1"
        );
    }

    #[test]
    fn test_bundled_definitions() {
        init();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/functions.json");
        let mut registry = FunctionRegistry::new();
        assert_eq!(registry.load_file(&path, LoadMode::Replace).unwrap(), 4);
        let wave = registry.get("standing_wave").unwrap();
        assert_eq!(wave.parameter_summary(), "A=1, k=1, w=1");
        assert_eq!(
            registry.get("gaussian").unwrap().parameter_descriptions["s"],
            "width"
        );
    }
}
