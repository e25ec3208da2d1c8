use core::fmt;

use crate::{lex::OperatorTyp, stdlib::Builtin};

/// A single postfix instruction. `V` is the symbol representation: names
/// right after parsing, slot indices once bound.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Instr<V> {
    Push(f64),
    Var(V),
    Neg,
    Binary(OperatorTyp),
    Call(Builtin),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EvalError {
    DivisionByZero,
    Domain {
        function: &'static str,
        arg: f64,
    },
    NonFinite {
        operation: &'static str,
    },
    Unbound {
        name: String,
    },
    MissingValue {
        slot: usize,
        provided: usize,
    },
    StackMismatch {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Domain { function, arg } => {
                write!(f, "argument {arg} is outside the domain of '{function}'")
            }
            Self::NonFinite { operation } => {
                write!(f, "'{operation}' produced a non-finite result")
            }
            Self::Unbound { name } => write!(f, "symbol '{name}' has no value"),
            Self::MissingValue { slot, provided } => write!(
                f,
                "value for slot {slot} requested, but only {provided} value{s} provided",
                s = if *provided == 1 { "" } else { "s" }
            ),
            Self::StackMismatch { expected, found } => write!(
                f,
                "expected {expected} value{s} on the stack but found {found}",
                s = if *expected == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for EvalError {}

fn pop(stack: &mut Vec<f64>, expected: usize) -> Result<f64, EvalError> {
    let found = stack.len();
    stack
        .pop()
        .ok_or(EvalError::StackMismatch { expected, found })
}

fn finite(val: f64, operation: &'static str) -> Result<f64, EvalError> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(EvalError::NonFinite { operation })
    }
}

pub(crate) fn power(base: f64, exp: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let val = base.powf(exp);
    if val.is_nan() {
        return Err(EvalError::Domain {
            function: "^",
            arg: base,
        });
    }
    Ok(val)
}

fn binary(op: OperatorTyp, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match op {
        OperatorTyp::Add => Ok(lhs + rhs),
        OperatorTyp::Sub => Ok(lhs - rhs),
        OperatorTyp::Mul => Ok(lhs * rhs),
        OperatorTyp::Div => {
            if rhs == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
        OperatorTyp::Exp => power(lhs, rhs),
    }
}

/// Run a postfix program. `lookup` resolves variables to values.
pub(crate) fn eval<V, F>(
    prog: &[Instr<V>],
    lookup: F,
    stack: &mut Vec<f64>,
) -> Result<f64, EvalError>
where
    F: Fn(&V) -> Result<f64, EvalError>,
{
    stack.clear();

    for instr in prog {
        let val = match instr {
            Instr::Push(val) => *val,
            Instr::Var(var) => lookup(var)?,
            Instr::Neg => -pop(stack, 1)?,
            Instr::Binary(op) => {
                let rhs = pop(stack, 2)?;
                let lhs = pop(stack, 2)?;
                finite(binary(*op, lhs, rhs)?, op.symbol())?
            }
            Instr::Call(fun) => {
                let arity = fun.arity();
                if stack.len() < arity {
                    return Err(EvalError::StackMismatch {
                        expected: arity,
                        found: stack.len(),
                    });
                }
                // at most two arguments, popped in reverse
                let mut args = [0.0; 2];
                for slot in args[..arity].iter_mut().rev() {
                    *slot = pop(stack, arity)?;
                }
                finite(fun.apply(&args[..arity])?, fun.name())?
            }
        };
        stack.push(val);
    }

    if stack.len() != 1 {
        return Err(EvalError::StackMismatch {
            expected: 1,
            found: stack.len(),
        });
    }
    finite(pop(stack, 1)?, "result")
}
