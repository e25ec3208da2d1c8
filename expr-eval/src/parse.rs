// Shunting yard algorithm by Dijkstra (see https://en.wikipedia.org/wiki/Shunting_yard_algorithm),
// extended with unary minus and argument counting for function calls.

use core::{fmt, ops::Range};
use std::collections::BTreeSet;

use crate::{
    eval::Instr,
    lex::{Associativity, LexErr, LexErrTyp, Lexer, OperatorTyp, Tok, TokTyp},
    stdlib::{self, Builtin},
};

/// Binds tighter than `*` and looser than `^`, so `-x^2` is `-(x^2)`.
const NEG_PRECEDENCE: u8 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lex(LexErrTyp),
    Empty,
    UnexpectedToken,
    MissingOperand,
    ParenMismatch,
    MisplacedComma,
    UnknownFunction(String),
    BareFunction(String),
    WrongArity {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "{err}"),
            Self::Empty => write!(f, "empty expression"),
            Self::UnexpectedToken => write!(f, "expected an operator"),
            Self::MissingOperand => write!(f, "missing operand"),
            Self::ParenMismatch => write!(f, "mismatched parentheses"),
            Self::MisplacedComma => write!(f, "comma outside of a function call"),
            Self::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            Self::BareFunction(name) => {
                write!(f, "function '{name}' must be called with parentheses")
            }
            Self::WrongArity {
                name,
                expected,
                found,
            } => write!(
                f,
                "function '{name}' takes {expected} argument{s}, but {found} were given",
                s = if *expected == 1 { "" } else { "s" }
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
}

impl ParseError {
    fn new(kind: ParseErrorKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.kind, self.span.start + 1)
    }
}

impl std::error::Error for ParseError {}

impl From<LexErr> for ParseError {
    fn from(err: LexErr) -> Self {
        Self::new(ParseErrorKind::Lex(err.typ), err.span)
    }
}

#[derive(Debug)]
enum ShuntOp {
    Binary(OperatorTyp, Range<usize>),
    Neg(Range<usize>),
    OpenParen {
        span: Range<usize>,
        call: Option<Builtin>,
        commas: usize,
    },
}

impl ShuntOp {
    /// Precedence for popping; parentheses never pop.
    fn precedence(&self) -> Option<u8> {
        match self {
            Self::Binary(op, _) => Some(op.precedence()),
            Self::Neg(_) => Some(NEG_PRECEDENCE),
            Self::OpenParen { .. } => None,
        }
    }

    fn into_output(self) -> Option<Instr<String>> {
        match self {
            Self::Binary(op, _) => Some(Instr::Binary(op)),
            Self::Neg(_) => Some(Instr::Neg),
            Self::OpenParen { .. } => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Parsed {
    pub program: Vec<Instr<String>>,
    pub symbols: BTreeSet<String>,
}

pub(crate) fn parse(src: &str) -> Result<Parsed, ParseError> {
    let toks = Lexer::new(src).collect::<Result<Vec<Tok>, LexErr>>()?;
    if toks.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, 0..src.len()));
    }

    let mut out: Vec<Instr<String>> = Vec::new(); // output
    let mut ops: Vec<ShuntOp> = Vec::new(); // operator stack
    let mut symbols = BTreeSet::new();
    // call target, always directly followed by its opening parenthesis
    let mut pending_call: Option<Builtin> = None;
    let mut expect_operand = true;

    for (idx, tok) in toks.iter().enumerate() {
        let span = tok.span.clone();
        match &tok.typ {
            TokTyp::Number(num) => {
                if !expect_operand {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedToken, span));
                }
                out.push(Instr::Push(*num));
                expect_operand = false;
            }

            TokTyp::Ident => {
                if !expect_operand {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedToken, span));
                }
                let name = &src[span.clone()];
                let is_call = toks
                    .get(idx + 1)
                    .is_some_and(|next| next.typ == TokTyp::OpenParen);

                if is_call {
                    let Some(fun) = Builtin::from_name(name) else {
                        return Err(ParseError::new(
                            ParseErrorKind::UnknownFunction(name.to_owned()),
                            span,
                        ));
                    };
                    pending_call = Some(fun);
                    // the opening parenthesis follows and keeps `expect_operand`
                } else if Builtin::from_name(name).is_some() {
                    return Err(ParseError::new(
                        ParseErrorKind::BareFunction(name.to_owned()),
                        span,
                    ));
                } else if let Some(val) = stdlib::constant(name) {
                    out.push(Instr::Push(val));
                    expect_operand = false;
                } else {
                    symbols.insert(name.to_owned());
                    out.push(Instr::Var(name.to_owned()));
                    expect_operand = false;
                }
            }

            TokTyp::Op(o1) => {
                if expect_operand {
                    match o1 {
                        OperatorTyp::Sub => ops.push(ShuntOp::Neg(span)),
                        // unary plus is a no-op
                        OperatorTyp::Add => (),
                        _ => {
                            return Err(ParseError::new(ParseErrorKind::MissingOperand, span));
                        }
                    }
                    continue;
                }

                while let Some(p2) = ops.last().and_then(ShuntOp::precedence) {
                    let p1 = o1.precedence();
                    if p2 > p1 || (p2 == p1 && o1.associativity() == Associativity::Left) {
                        if let Some(instr) = ops.pop().and_then(ShuntOp::into_output) {
                            out.push(instr);
                        }
                    } else {
                        break;
                    }
                }
                ops.push(ShuntOp::Binary(*o1, span));
                expect_operand = true;
            }

            TokTyp::OpenParen => {
                if !expect_operand {
                    // implicit multiplication like `2(x)` is not supported
                    return Err(ParseError::new(ParseErrorKind::UnexpectedToken, span));
                }
                ops.push(ShuntOp::OpenParen {
                    span,
                    call: pending_call.take(),
                    commas: 0,
                });
            }

            TokTyp::Comma => {
                if expect_operand {
                    return Err(ParseError::new(ParseErrorKind::MissingOperand, span));
                }
                pop_until_paren(&mut ops, &mut out);
                match ops.last_mut() {
                    Some(ShuntOp::OpenParen {
                        call: Some(_),
                        commas,
                        ..
                    }) => *commas += 1,
                    _ => return Err(ParseError::new(ParseErrorKind::MisplacedComma, span)),
                }
                expect_operand = true;
            }

            TokTyp::CloseParen => {
                if expect_operand {
                    return Err(ParseError::new(ParseErrorKind::MissingOperand, span));
                }
                pop_until_paren(&mut ops, &mut out);
                let Some(ShuntOp::OpenParen { call, commas, .. }) = ops.pop() else {
                    return Err(ParseError::new(ParseErrorKind::ParenMismatch, span));
                };
                if let Some(fun) = call {
                    let found = commas + 1;
                    if found != fun.arity() {
                        return Err(ParseError::new(
                            ParseErrorKind::WrongArity {
                                name: fun.name(),
                                expected: fun.arity(),
                                found,
                            },
                            span,
                        ));
                    }
                    out.push(Instr::Call(fun));
                }
                expect_operand = false;
            }
        }
    }

    if expect_operand {
        let end = src.len();
        return Err(ParseError::new(
            ParseErrorKind::MissingOperand,
            end.saturating_sub(1)..end,
        ));
    }

    while let Some(op) = ops.pop() {
        if let ShuntOp::OpenParen { span, .. } = op {
            return Err(ParseError::new(ParseErrorKind::ParenMismatch, span));
        }
        if let Some(instr) = op.into_output() {
            out.push(instr);
        }
    }

    log::trace!("parsed '{src}' into {} instructions", out.len());
    Ok(Parsed {
        program: out,
        symbols,
    })
}

fn pop_until_paren(ops: &mut Vec<ShuntOp>, out: &mut Vec<Instr<String>>) {
    while let Some(ShuntOp::Binary(..) | ShuntOp::Neg(_)) = ops.last() {
        if let Some(instr) = ops.pop().and_then(ShuntOp::into_output) {
            out.push(instr);
        }
    }
}
