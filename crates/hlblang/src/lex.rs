use crate::ast::ObjType;
use crate::error::Pos;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub pos: Pos,
    pub end: Pos,
    pub kind: TokKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    KwWith,
    KwAs,
    KwVariadic,
    Type(ObjType),
    Numeric { value: i64, base: u32 },
    Decimal(i64),
    Str(String),
    Bool(bool),
    Ident(String),
    Newline,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    Comment(String),
    Bad(String),
    Eof,
}

/// Tokenize a source buffer. Lexing is total: malformed input becomes Bad
/// tokens carrying an ERROR_LEX message, for the parser to report in place.
pub fn lex(src: &[u8]) -> Vec<Token> {
    let mut lx = Lexer::new(src);
    let mut toks = Vec::new();
    loop {
        let t = lx.next_token();
        let done = t.kind == TokKind::Eof;
        toks.push(t);
        if done {
            break;
        }
    }
    toks
}

struct Lexer<'a> {
    s: &'a [u8],
    i: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(s: &'a [u8]) -> Self {
        Lexer { s, i: 0, line: 1, col: 1 }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.i, self.line, self.col)
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.i).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.get(self.i + n).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn token(&self, pos: Pos, kind: TokKind) -> Token {
        Token { pos, end: self.pos(), kind }
    }

    fn is_ident_start(b: u8) -> bool {
        matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'_')
    }

    fn is_ident_cont(b: u8) -> bool {
        Self::is_ident_start(b) || b.is_ascii_digit()
    }

    fn next_token(&mut self) -> Token {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.bump();
        }

        let pos = self.pos();
        match self.peek() {
            None => self.token(pos, TokKind::Eof),
            Some(b'\n') => {
                self.bump();
                self.token(pos, TokKind::Newline)
            }
            Some(b'#') => {
                self.bump();
                let start = self.i;
                while self.peek().map_or(false, |b| b != b'\n') {
                    self.bump();
                }
                let text = String::from_utf8_lossy(&self.s[start..self.i]).into_owned();
                // the terminating newline belongs to the comment token
                self.bump();
                self.token(pos, TokKind::Comment(text))
            }
            Some(b'{') => {
                self.bump();
                self.token(pos, TokKind::LBrace)
            }
            Some(b'}') => {
                self.bump();
                self.token(pos, TokKind::RBrace)
            }
            Some(b'(') => {
                self.bump();
                self.token(pos, TokKind::LParen)
            }
            Some(b')') => {
                self.bump();
                self.token(pos, TokKind::RParen)
            }
            Some(b',') => {
                self.bump();
                self.token(pos, TokKind::Comma)
            }
            Some(b';') => {
                self.bump();
                self.token(pos, TokKind::Semicolon)
            }
            Some(b'.') => {
                self.bump();
                self.token(pos, TokKind::Dot)
            }
            Some(b'"') => self.lex_string(pos),
            Some(b'\'') => self.lex_raw_string(pos),
            Some(b'<') => {
                if self.peek_at(1) == Some(b'<') {
                    self.lex_heredoc(pos)
                } else {
                    self.bad_to_eol(pos, "ERROR_LEX unexpected character '<'")
                }
            }
            Some(b) if b.is_ascii_digit() => self.lex_number(pos),
            Some(b) if Self::is_ident_start(b) => self.lex_word(pos),
            Some(b) => self.bad_to_eol(pos, &format!("ERROR_LEX unexpected character {:?}", b as char)),
        }
    }

    fn bad_to_eol(&mut self, pos: Pos, msg: &str) -> Token {
        while self.peek().map_or(false, |b| b != b'\n') {
            self.bump();
        }
        self.token(pos, TokKind::Bad(msg.to_string()))
    }

    fn lex_string(&mut self, pos: Pos) -> Token {
        self.bump(); // opening quote
        let mut out = Vec::new();
        loop {
            match self.bump() {
                None => return self.token(pos, TokKind::Bad("ERROR_LEX unterminated string".into())),
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b'\\') => out.push(b'\\'),
                    Some(b'"') => out.push(b'"'),
                    Some(e) => {
                        return self.bad_to_eol(
                            pos,
                            &format!("ERROR_LEX unsupported escape \\{}", e as char),
                        )
                    }
                    None => return self.token(pos, TokKind::Bad("ERROR_LEX unterminated string".into())),
                },
                Some(b) => out.push(b),
            }
        }
        let value = String::from_utf8_lossy(&out).into_owned();
        self.token(pos, TokKind::Str(value))
    }

    fn lex_raw_string(&mut self, pos: Pos) -> Token {
        self.bump(); // opening quote
        let start = self.i;
        loop {
            match self.peek() {
                None => return self.token(pos, TokKind::Bad("ERROR_LEX unterminated string".into())),
                Some(b'\'') => {
                    let value = String::from_utf8_lossy(&self.s[start..self.i]).into_owned();
                    self.bump();
                    return self.token(pos, TokKind::Str(value));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    // <<EOM, <<~EOM (strip all leading whitespace), <<-EOM (strip common
    // leading tabs). The body runs from the next line to a line holding the
    // marker; the newline after the closing marker is left for the parser.
    fn lex_heredoc(&mut self, pos: Pos) -> Token {
        self.bump();
        self.bump(); // <<
        let strip = match self.peek() {
            Some(b'~') => {
                self.bump();
                Strip::All
            }
            Some(b'-') => {
                self.bump();
                Strip::Tabs
            }
            _ => Strip::None,
        };

        let mstart = self.i;
        while self.peek().map_or(false, |b| Self::is_ident_cont(b)) {
            self.bump();
        }
        if self.i == mstart {
            return self.bad_to_eol(pos, "ERROR_LEX heredoc marker expected");
        }
        let marker = self.s[mstart..self.i].to_vec();

        // skip the remainder of the opener line
        while self.peek().map_or(false, |b| b != b'\n') {
            self.bump();
        }
        if self.bump().is_none() {
            return self.token(pos, TokKind::Bad("ERROR_LEX unterminated heredoc".into()));
        }

        let mut lines: Vec<Vec<u8>> = Vec::new();
        loop {
            let start = self.i;
            while self.peek().map_or(false, |b| b != b'\n') {
                self.bump();
            }
            let line = &self.s[start..self.i];
            let trimmed: &[u8] = {
                let mut l = line;
                while l.first().map_or(false, |b| *b == b' ' || *b == b'\t') {
                    l = &l[1..];
                }
                while l.last().map_or(false, |b| *b == b'\r') {
                    l = &l[..l.len() - 1];
                }
                l
            };
            if trimmed == marker.as_slice() {
                break;
            }
            if self.peek().is_none() {
                return self.token(pos, TokKind::Bad("ERROR_LEX unterminated heredoc".into()));
            }
            lines.push(line.to_vec());
            self.bump(); // newline
        }

        let value = strip.apply(lines);
        self.token(pos, TokKind::Str(value))
    }

    fn lex_number(&mut self, pos: Pos) -> Token {
        let first = self.peek().unwrap();
        if first == b'0' {
            match self.peek_at(1) {
                Some(b'b') | Some(b'B') => return self.lex_radix(pos, 2),
                Some(b'o') | Some(b'O') => return self.lex_radix(pos, 8),
                Some(b'x') | Some(b'X') => return self.lex_radix(pos, 16),
                _ => {
                    self.bump();
                    return self.token(pos, TokKind::Decimal(0));
                }
            }
        }
        let start = self.i;
        while self.peek().map_or(false, |b| b.is_ascii_digit()) {
            self.bump();
        }
        let text = std::str::from_utf8(&self.s[start..self.i]).unwrap();
        match text.parse::<i64>() {
            Ok(v) => self.token(pos, TokKind::Decimal(v)),
            Err(_) => self.token(pos, TokKind::Bad(format!("ERROR_LEX integer out of range {}", text))),
        }
    }

    fn lex_radix(&mut self, pos: Pos, base: u32) -> Token {
        self.bump();
        self.bump(); // 0x / 0o / 0b
        let start = self.i;
        while self.peek().map_or(false, |b| b.is_ascii_hexdigit()) {
            self.bump();
        }
        let text = std::str::from_utf8(&self.s[start..self.i]).unwrap();
        match i64::from_str_radix(text, base) {
            Ok(value) => self.token(pos, TokKind::Numeric { value, base }),
            Err(_) => self.token(pos, TokKind::Bad(format!("ERROR_LEX malformed base-{} literal", base))),
        }
    }

    fn lex_word(&mut self, pos: Pos) -> Token {
        let start = self.i;
        while self.peek().map_or(false, Self::is_ident_cont) {
            self.bump();
        }
        let word = std::str::from_utf8(&self.s[start..self.i]).unwrap().to_string();

        match word.as_str() {
            "with" => return self.token(pos, TokKind::KwWith),
            "as" => return self.token(pos, TokKind::KwAs),
            "variadic" => return self.token(pos, TokKind::KwVariadic),
            "true" => return self.token(pos, TokKind::Bool(true)),
            "false" => return self.token(pos, TokKind::Bool(false)),
            _ => {}
        }

        let is_base_type = matches!(word.as_str(), "string" | "int" | "bool" | "fs" | "option");
        if is_base_type {
            if self.peek() == Some(b':') && self.peek_at(1) == Some(b':') {
                self.bump();
                self.bump();
                let sub_start = self.i;
                while self.peek().map_or(false, |b| b.is_ascii_lowercase()) {
                    self.bump();
                }
                let sub = std::str::from_utf8(&self.s[sub_start..self.i]).unwrap();
                let full = format!("{}::{}", word, sub);
                return match ObjType::parse(&full) {
                    Some(obj) => self.token(pos, TokKind::Type(obj)),
                    None => self.token(pos, TokKind::Bad(format!("ERROR_LEX unknown type {}", full))),
                };
            }
            let obj = ObjType::parse(&word).unwrap();
            return self.token(pos, TokKind::Type(obj));
        }

        self.token(pos, TokKind::Ident(word))
    }
}

enum Strip {
    None,
    All,
    Tabs,
}

impl Strip {
    fn apply(self, lines: Vec<Vec<u8>>) -> String {
        let lines: Vec<Vec<u8>> = match self {
            Strip::None => lines,
            Strip::All => lines
                .into_iter()
                .map(|mut l| {
                    let n = l.iter().take_while(|b| **b == b' ' || **b == b'\t').count();
                    l.drain(..n);
                    l
                })
                .collect(),
            Strip::Tabs => {
                let common = lines
                    .iter()
                    .filter(|l| !l.is_empty())
                    .map(|l| l.iter().take_while(|b| **b == b'\t').count())
                    .min()
                    .unwrap_or(0);
                lines
                    .into_iter()
                    .map(|mut l| {
                        let n = common.min(l.iter().take_while(|b| **b == b'\t').count());
                        l.drain(..n);
                        l
                    })
                    .collect()
            }
        };
        let joined = lines.join(&b'\n');
        String::from_utf8_lossy(&joined).into_owned()
    }
}
