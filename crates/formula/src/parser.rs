// Formula parser - converts formula text into an AST
// Supports: numbers (with exponent), cell refs (A1), basic math (+, -, *, /),
// unary sign, parentheses. Canonical printing lives here too.

use cellgrid_core::Position;

use crate::ParseError;

/// Expression AST for the arithmetic formula language.
#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64),
    /// Cell reference. The position may be invalid (e.g. `A0` or an
    /// out-of-range column); evaluation turns those into `#REF!`.
    CellRef(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parse formula text (without the leading `=`) into an AST.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty formula"));
    }
    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != tokens.len() {
        return Err(ParseError::new("unexpected token after expression"));
    }
    Ok(expr)
}

#[derive(Debug, Clone)]
enum Token {
    Number(f64),
    CellRef(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            'A'..='Z' | 'a'..='z' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match try_parse_cell_ref(&ident) {
                    Some(pos) => tokens.push(Token::CellRef(pos)),
                    None => {
                        return Err(ParseError::new(format!(
                            "invalid cell reference: {ident}"
                        )))
                    }
                }
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Optional exponent: only consumed when a digit follows,
                // so `1e` stays an error and `2e3` parses as 2000.
                if matches!(chars.peek(), Some(&'e') | Some(&'E')) {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some(&'+') | Some(&'-')) {
                        lookahead.next();
                    }
                    if lookahead.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                        num_str.push(chars.next().unwrap());
                        if matches!(chars.peek(), Some(&'+') | Some(&'-')) {
                            num_str.push(chars.next().unwrap());
                        }
                        while let Some(&d) = chars.peek() {
                            if d.is_ascii_digit() {
                                num_str.push(d);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid number: {num_str}")))?;
                tokens.push(Token::Number(num));
            }
            _ => return Err(ParseError::new(format!("unexpected character: {c}"))),
        }
    }

    Ok(tokens)
}

/// Lex an identifier as a cell reference: uppercase letters followed by
/// digits, nothing else. The resulting position may still be invalid
/// (row zero, or coordinates past the sheet bounds); those are kept and
/// surface as `#REF!` at evaluation time.
fn try_parse_cell_ref(ident: &str) -> Option<Position> {
    let split = ident.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = ident.split_at(split);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }
    if !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Position::from_a1(ident))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// term := unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// unary := ('+' | '-') unary | primary
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Minus) => Some(UnaryOp::Minus),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    /// primary := NUMBER | CELL | '(' expr ')'
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = match self.peek() {
            Some(tok) => tok.clone(),
            None => return Err(ParseError::new("unexpected end of formula")),
        };
        self.pos += 1;
        match tok {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::CellRef(pos) => Ok(Expr::CellRef(pos)),
            Token::LParen => {
                let expr = self.parse_expr()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(expr)
                    }
                    _ => Err(ParseError::new("expected ')'")),
                }
            }
            _ => Err(ParseError::new("unexpected token")),
        }
    }
}

// =============================================================================
// Canonical printing
// =============================================================================

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::CellRef(_) => 4,
            Expr::Unary { .. } => 3,
            Expr::Binary { op: BinaryOp::Mul | BinaryOp::Div, .. } => 2,
            Expr::Binary { op: BinaryOp::Add | BinaryOp::Sub, .. } => 1,
        }
    }

    /// Write the canonical text form: no whitespace, parentheses only where
    /// removing them would change the parse.
    pub fn write_canonical(&self, out: &mut String) {
        match self {
            Expr::Number(n) => out.push_str(&cellgrid_core::Value::format_number(*n)),
            Expr::CellRef(pos) => {
                if pos.is_valid() {
                    out.push_str(&pos.to_a1());
                } else {
                    out.push_str("#REF!");
                }
            }
            Expr::Unary { op, operand } => {
                out.push(match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                });
                write_child(operand, operand.precedence() < self.precedence(), out);
            }
            Expr::Binary { op, left, right } => {
                write_child(left, left.precedence() < self.precedence(), out);
                out.push(match op {
                    BinaryOp::Add => '+',
                    BinaryOp::Sub => '-',
                    BinaryOp::Mul => '*',
                    BinaryOp::Div => '/',
                });
                // Right side of '-' and '/' needs parens at equal precedence:
                // 1-(2+3) and 1/(2*3) are not 1-2+3 and 1/2*3.
                let needs_parens = right.precedence() < self.precedence()
                    || (right.precedence() == self.precedence()
                        && matches!(op, BinaryOp::Sub | BinaryOp::Div));
                write_child(right, needs_parens, out);
            }
        }
    }
}

fn write_child(child: &Expr, parens: bool, out: &mut String) {
    if parens {
        out.push('(');
    }
    child.write_canonical(out);
    if parens {
        out.push(')');
    }
}
