#![warn(clippy::all, rust_2018_idioms)]

//! Arithmetic expressions over named variables.
//!
//! An [`Expression`] is parsed once into a postfix program. Binding it to an
//! ordered list of symbol names yields a [`BoundExpression`] that evaluates
//! against plain slices, which is what grid sampling uses in its inner loop.

mod eval;
pub mod lex;
mod parse;
pub mod stdlib;

use core::fmt;
use std::collections::BTreeSet;

pub use eval::EvalError;
pub use parse::{ParseError, ParseErrorKind};
pub use stdlib::{is_reserved, Builtin, X, Y};

use eval::Instr;

#[derive(Clone, Debug)]
pub struct Expression {
    source: String,
    program: Vec<Instr<String>>,
    symbols: BTreeSet<String>,
}

impl Expression {
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let parsed = parse::parse(src)?;
        Ok(Self {
            source: src.trim().to_owned(),
            program: parsed.program,
            symbols: parsed.symbols,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifiers that are neither constants nor function names.
    pub fn free_symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    /// Resolve every symbol to its index in `slots`.
    pub fn bind(&self, slots: &[&str]) -> Result<BoundExpression, EvalError> {
        let program = self
            .program
            .iter()
            .map(|instr| {
                Ok(match instr {
                    Instr::Var(name) => {
                        let slot = slots.iter().position(|s| s == name).ok_or_else(|| {
                            EvalError::Unbound {
                                name: name.clone(),
                            }
                        })?;
                        Instr::Var(slot)
                    }
                    Instr::Push(val) => Instr::Push(*val),
                    Instr::Neg => Instr::Neg,
                    Instr::Binary(op) => Instr::Binary(*op),
                    Instr::Call(fun) => Instr::Call(*fun),
                })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        Ok(BoundExpression {
            program,
            slots: slots.len(),
        })
    }

    /// One-off evaluation with named values.
    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
        let lookup = |name: &String| {
            bindings
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, val)| *val)
                .ok_or_else(|| EvalError::Unbound { name: name.clone() })
        };
        eval::eval(&self.program, lookup, &mut Vec::new())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program
    }
}

#[derive(Clone, Debug)]
pub struct BoundExpression {
    program: Vec<Instr<usize>>,
    slots: usize,
}

impl BoundExpression {
    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn eval(&self, values: &[f64]) -> Result<f64, EvalError> {
        self.eval_with_stack(values, &mut Vec::new())
    }

    /// Same as [`Self::eval`], reusing `stack` between calls.
    pub fn eval_with_stack(&self, values: &[f64], stack: &mut Vec<f64>) -> Result<f64, EvalError> {
        let lookup = |slot: &usize| {
            values.get(*slot).copied().ok_or(EvalError::MissingValue {
                slot: *slot,
                provided: values.len(),
            })
        };
        eval::eval(&self.program, lookup, stack)
    }
}
