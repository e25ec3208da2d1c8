use core::f64::consts;

use crate::eval::{power, EvalError};

/// First independent variable.
pub const X: &str = "x";
/// Second independent variable.
pub const Y: &str = "y";

pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(consts::PI),
        "tau" => Some(consts::TAU),
        "e" => Some(consts::E),
        _ => None,
    }
}

/// Names that cannot be used as parameters.
pub fn is_reserved(name: &str) -> bool {
    name == X || name == Y || constant(name).is_some() || Builtin::from_name(name).is_some()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Log2,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
    Log,
    Min,
    Max,
    Atan2,
    Pow,
    Hypot,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        use Builtin as B;
        let fun = match name {
            "sin" => B::Sin,
            "cos" => B::Cos,
            "tan" => B::Tan,
            "asin" | "arcsin" => B::Asin,
            "acos" | "arccos" => B::Acos,
            "atan" | "arctan" => B::Atan,
            "sinh" => B::Sinh,
            "cosh" => B::Cosh,
            "tanh" => B::Tanh,
            "exp" => B::Exp,
            "ln" => B::Ln,
            "log10" => B::Log10,
            "log2" => B::Log2,
            "sqrt" => B::Sqrt,
            "abs" => B::Abs,
            "floor" => B::Floor,
            "ceil" => B::Ceil,
            "round" => B::Round,
            "sign" => B::Sign,
            "log" => B::Log,
            "min" => B::Min,
            "max" => B::Max,
            "atan2" => B::Atan2,
            "pow" => B::Pow,
            "hypot" => B::Hypot,
            _ => return None,
        };
        Some(fun)
    }

    pub const fn name(&self) -> &'static str {
        use Builtin as B;
        match self {
            B::Sin => "sin",
            B::Cos => "cos",
            B::Tan => "tan",
            B::Asin => "asin",
            B::Acos => "acos",
            B::Atan => "atan",
            B::Sinh => "sinh",
            B::Cosh => "cosh",
            B::Tanh => "tanh",
            B::Exp => "exp",
            B::Ln => "ln",
            B::Log10 => "log10",
            B::Log2 => "log2",
            B::Sqrt => "sqrt",
            B::Abs => "abs",
            B::Floor => "floor",
            B::Ceil => "ceil",
            B::Round => "round",
            B::Sign => "sign",
            B::Log => "log",
            B::Min => "min",
            B::Max => "max",
            B::Atan2 => "atan2",
            B::Pow => "pow",
            B::Hypot => "hypot",
        }
    }

    pub const fn arity(&self) -> usize {
        use Builtin as B;
        match self {
            B::Log | B::Min | B::Max | B::Atan2 | B::Pow | B::Hypot => 2,
            _ => 1,
        }
    }

    pub fn apply(&self, args: &[f64]) -> Result<f64, EvalError> {
        use Builtin as B;

        let arg = |idx: usize| {
            args.get(idx).copied().ok_or(EvalError::StackMismatch {
                expected: self.arity(),
                found: args.len(),
            })
        };
        let domain = |arg: f64| EvalError::Domain {
            function: self.name(),
            arg,
        };

        let x = arg(0)?;
        let val = match self {
            B::Sin => x.sin(),
            B::Cos => x.cos(),
            B::Tan => x.tan(),
            B::Asin | B::Acos if !(-1.0..=1.0).contains(&x) => return Err(domain(x)),
            B::Asin => x.asin(),
            B::Acos => x.acos(),
            B::Atan => x.atan(),
            B::Sinh => x.sinh(),
            B::Cosh => x.cosh(),
            B::Tanh => x.tanh(),
            B::Exp => x.exp(),
            B::Ln | B::Log10 | B::Log2 | B::Log if x <= 0.0 => return Err(domain(x)),
            B::Ln => x.ln(),
            B::Log10 => x.log10(),
            B::Log2 => x.log2(),
            B::Log => {
                let base = arg(1)?;
                if base <= 0.0 || base == 1.0 {
                    return Err(domain(base));
                }
                x.log(base)
            }
            B::Sqrt if x < 0.0 => return Err(domain(x)),
            B::Sqrt => x.sqrt(),
            B::Abs => x.abs(),
            B::Floor => x.floor(),
            B::Ceil => x.ceil(),
            B::Round => x.round(),
            B::Sign => {
                if x == 0.0 {
                    0.0
                } else {
                    x.signum()
                }
            }
            B::Min => x.min(arg(1)?),
            B::Max => x.max(arg(1)?),
            B::Atan2 => x.atan2(arg(1)?),
            B::Pow => power(x, arg(1)?)?,
            B::Hypot => x.hypot(arg(1)?),
        };
        Ok(val)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_same_builtin() {
        assert_eq!(Builtin::from_name("arcsin"), Some(Builtin::Asin));
        assert_eq!(Builtin::from_name("asin"), Some(Builtin::Asin));
        assert_eq!(Builtin::from_name("banana"), None);
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(
            Builtin::Ln.apply(&[0.0]),
            Err(EvalError::Domain { function: "ln", .. })
        ));
        assert!(matches!(
            Builtin::Sqrt.apply(&[-1.0]),
            Err(EvalError::Domain { function: "sqrt", .. })
        ));
        assert!(matches!(
            Builtin::Acos.apply(&[1.5]),
            Err(EvalError::Domain { function: "acos", .. })
        ));
        assert!(matches!(
            Builtin::Log.apply(&[8.0, 1.0]),
            Err(EvalError::Domain { function: "log", .. })
        ));
    }

    #[test]
    fn test_two_argument_builtins() {
        assert_eq!(Builtin::Log.apply(&[8.0, 2.0]).unwrap().round(), 3.0);
        assert_eq!(Builtin::Max.apply(&[-1.0, 2.0]), Ok(2.0));
        assert_eq!(Builtin::Hypot.apply(&[3.0, 4.0]), Ok(5.0));
        assert_eq!(
            Builtin::Min.apply(&[1.0]),
            Err(EvalError::StackMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved("x"));
        assert!(is_reserved("y"));
        assert!(is_reserved("pi"));
        assert!(is_reserved("sin"));
        assert!(!is_reserved("a"));
        assert!(!is_reserved("amplitude"));
    }
}
