use core::{fmt, iter::Peekable, ops::Range, str::CharIndices};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorTyp {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorTyp {
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            // unary minus sits at 3, see `parse::NEG_PRECEDENCE`
            Self::Exp => 4,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Exp => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokTyp {
    Number(f64),
    Ident,
    Op(OperatorTyp),
    Comma,
    OpenParen,
    CloseParen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tok {
    pub typ: TokTyp,
    pub span: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrTyp {
    InvalidChar(char),
    InvalidNumber(String),
}

impl fmt::Display for LexErrTyp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar(chr) => write!(f, "invalid character '{chr}'"),
            Self::InvalidNumber(text) => write!(f, "invalid number '{text}'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexErr {
    pub typ: LexErrTyp,
    pub span: Range<usize>,
}

#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src str,
    cur: Peekable<CharIndices<'src>>,
    has_errored: bool, // tells iter to yield None after error
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            cur: src.char_indices().peekable(),
            has_errored: false,
        }
    }

    fn trim_whitespace(&mut self) {
        while self.cur.next_if(|(_, chr)| chr.is_whitespace()).is_some() {}
    }

    fn consume_unambiguous(&mut self) -> Option<Tok> {
        let (idx, chr) = self.cur.peek().copied()?;
        let typ = match chr {
            '+' => TokTyp::Op(OperatorTyp::Add),
            '-' => TokTyp::Op(OperatorTyp::Sub),
            '*' => TokTyp::Op(OperatorTyp::Mul),
            '/' => TokTyp::Op(OperatorTyp::Div),
            '^' => TokTyp::Op(OperatorTyp::Exp),
            ',' => TokTyp::Comma,
            '(' => TokTyp::OpenParen,
            ')' => TokTyp::CloseParen,
            _ => return None,
        };
        self.cur.next();
        Some(Tok {
            typ,
            span: idx..idx + chr.len_utf8(),
        })
    }

    /// Consume characters while `predicate` holds and return the end index.
    fn consume_while<P>(&mut self, start: usize, predicate: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let mut end = start;
        while let Some((idx, chr)) = self.cur.next_if(|(_, chr)| predicate(*chr)) {
            end = idx + chr.len_utf8();
        }
        end
    }

    fn consume_ident(&mut self, start: usize) -> Tok {
        let end = self.consume_while(start, |chr| chr.is_ascii_alphanumeric() || chr == '_');
        Tok {
            typ: TokTyp::Ident,
            span: start..end,
        }
    }

    fn consume_number(&mut self, start: usize) -> Result<Tok, LexErr> {
        let mut end = self.consume_while(start, |chr| chr.is_ascii_digit() || chr == '.');

        // An exponent is only taken if digits follow, so `2e` stays `2` and `e`.
        let mut lookahead = self.cur.clone();
        if let Some((_, 'e' | 'E')) = lookahead.next() {
            lookahead.next_if(|(_, chr)| *chr == '+' || *chr == '-');
            if lookahead.peek().is_some_and(|(_, chr)| chr.is_ascii_digit()) {
                self.cur = lookahead;
                end = self.consume_while(end, |chr| chr.is_ascii_digit());
            }
        }

        let text = &self.src[start..end];
        match text.parse::<f64>() {
            Ok(val) if val.is_finite() => Ok(Tok {
                typ: TokTyp::Number(val),
                span: start..end,
            }),
            _ => Err(LexErr {
                typ: LexErrTyp::InvalidNumber(text.to_owned()),
                span: start..end,
            }),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Tok, LexErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_errored {
            return None;
        }

        self.trim_whitespace();

        let (next_idx, next_chr) = self.cur.peek().copied()?;
        let ret = if let Some(tok) = self.consume_unambiguous() {
            Ok(tok)
        } else if next_chr.is_ascii_alphabetic() || next_chr == '_' {
            Ok(self.consume_ident(next_idx))
        } else if next_chr.is_ascii_digit() || next_chr == '.' {
            self.consume_number(next_idx)
        } else {
            Err(LexErr {
                typ: LexErrTyp::InvalidChar(next_chr),
                span: next_idx..next_idx + next_chr.len_utf8(),
            })
        };
        if ret.is_err() {
            self.has_errored = true;
        }
        Some(ret)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn types(src: &str) -> Vec<TokTyp> {
        Lexer::new(src).map(|tok| tok.unwrap().typ).collect()
    }

    #[test]
    fn test_lex_expression() {
        let toks = types("a*x^2 + b*y");
        assert_eq!(
            toks,
            vec![
                TokTyp::Ident,
                TokTyp::Op(OperatorTyp::Mul),
                TokTyp::Ident,
                TokTyp::Op(OperatorTyp::Exp),
                TokTyp::Number(2.0),
                TokTyp::Op(OperatorTyp::Add),
                TokTyp::Ident,
                TokTyp::Op(OperatorTyp::Mul),
                TokTyp::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_ident_spans() {
        let src = "amp_1 * sin(x)";
        let spans: Vec<_> = Lexer::new(src)
            .map(|tok| tok.unwrap())
            .filter(|tok| tok.typ == TokTyp::Ident)
            .map(|tok| &src[tok.span])
            .collect();
        assert_eq!(spans, vec!["amp_1", "sin", "x"]);
    }

    #[test]
    fn test_lex_scientific_numbers() {
        assert_eq!(types("2e-3"), vec![TokTyp::Number(2e-3)]);
        assert_eq!(types("1.5E2"), vec![TokTyp::Number(150.0)]);
        assert_eq!(types(".5"), vec![TokTyp::Number(0.5)]);
        // no digits after the `e`, so it is an identifier
        assert_eq!(types("2e"), vec![TokTyp::Number(2.0), TokTyp::Ident]);
    }

    #[test]
    fn test_lex_invalid_number() {
        let mut lexer = Lexer::new("1.2.3 + x");
        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.typ, LexErrTyp::InvalidNumber("1.2.3".into()));
        assert_eq!(err.span, 0..5);
        // stops after the first error
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lex_invalid_char() {
        let err = Lexer::new("x $ y")
            .find_map(|tok| tok.err())
            .expect("expected a lexer error");
        assert_eq!(err.typ, LexErrTyp::InvalidChar('$'));
        assert_eq!(err.span, 2..3);
    }
}
