use anyhow::Result;

use crate::ast::*;
use crate::error::{Diagnostic, Pos};
use crate::lex::{lex, TokKind, Token};

/// A parse result: the file plus any recovered syntax errors. Declarations
/// that failed to parse are present as BadDecl nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub file: File,
    pub errors: Vec<Diagnostic>,
}

pub fn parse_file(src: &[u8], filename: &str) -> Result<Parsed> {
    let toks = lex(src);
    let mut p = Parser {
        src,
        filename,
        toks,
        i: 0,
        last_end: Pos::new(0, 1, 1),
        errors: Vec::new(),
    };

    let mut decls = Vec::new();
    loop {
        match p.kind().clone() {
            TokKind::Eof => break,
            TokKind::Newline => {
                let t = p.next();
                decls.push(Decl::Newline(Newline { pos: t.pos, end: t.end }));
            }
            TokKind::Comment(_) => {
                decls.push(Decl::Doc(p.comment_group()));
            }
            TokKind::Bad(msg) => {
                let t = p.next();
                p.error(t.pos, &msg);
                decls.push(Decl::Bad(p.bad_decl(t.pos)));
            }
            TokKind::Ident(name) if name == "import" => match p.import_decl() {
                Ok(d) => decls.push(Decl::Import(d)),
                Err(e) => decls.push(p.recover_decl(e)),
            },
            TokKind::Ident(name) if name == "export" => match p.export_decl() {
                Ok(d) => decls.push(Decl::Export(d)),
                Err(e) => decls.push(p.recover_decl(e)),
            },
            TokKind::Type(_) => match p.func_decl() {
                Ok(d) => decls.push(Decl::Func(d)),
                Err(e) => decls.push(p.recover_decl(e)),
            },
            _ => {
                let t = p.next();
                let e = PErr::new(t.pos, "ERROR_PARSE expected declaration");
                decls.push(p.recover_decl(e));
            }
        }
    }

    attach_decl_docs(&mut decls);

    let pos = Pos::new(0, 1, 1);
    let end = if p.toks.len() > 1 {
        p.toks[p.toks.len() - 1].pos
    } else {
        pos
    };
    let file = File {
        name: filename.to_string(),
        pos,
        end,
        decls,
    };
    Ok(Parsed { file, errors: p.errors })
}

// Comment groups whose last line immediately precedes a declaration become
// that declaration's doc.
fn attach_decl_docs(decls: &mut Vec<Decl>) {
    let mut i = 0;
    while i + 1 < decls.len() {
        let attach = matches!(
            (&decls[i], &decls[i + 1]),
            (Decl::Doc(_), Decl::Func(_)) | (Decl::Doc(_), Decl::Import(_))
        );
        if attach {
            if let Decl::Doc(group) = decls.remove(i) {
                match &mut decls[i] {
                    Decl::Func(f) => f.doc = Some(group),
                    Decl::Import(im) => im.doc = Some(group),
                    _ => unreachable!(),
                }
            }
        } else {
            i += 1;
        }
    }
}

struct PErr {
    pos: Pos,
    msg: String,
}

impl PErr {
    fn new(pos: Pos, msg: impl Into<String>) -> Self {
        PErr { pos, msg: msg.into() }
    }
}

type PResult<T> = std::result::Result<T, PErr>;

struct Parser<'a> {
    src: &'a [u8],
    filename: &'a str,
    toks: Vec<Token>,
    i: usize,
    last_end: Pos,
    errors: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.toks[self.i]
    }

    fn kind(&self) -> &TokKind {
        &self.toks[self.i].kind
    }

    fn next(&mut self) -> Token {
        let t = self.toks[self.i].clone();
        if t.kind != TokKind::Eof {
            self.i += 1;
        }
        self.last_end = t.end;
        t
    }

    fn error(&mut self, pos: Pos, msg: &str) {
        self.errors.push(Diagnostic::new(self.filename, pos, pos, msg));
    }

    // Resynchronize at the next declaration-starting token after a newline.
    fn recover_decl(&mut self, e: PErr) -> Decl {
        self.error(e.pos, &e.msg);
        let start = e.pos;
        loop {
            match self.kind() {
                TokKind::Eof => break,
                TokKind::Newline | TokKind::Comment(_) => {
                    self.next();
                    match self.kind() {
                        TokKind::Type(_) => break,
                        TokKind::Ident(n) if n == "import" || n == "export" => break,
                        _ => {}
                    }
                }
                _ => {
                    self.next();
                }
            }
        }
        Decl::Bad(self.bad_decl(start))
    }

    fn bad_decl(&self, start: Pos) -> BadDecl {
        let end = self.last_end;
        let lo = start.offset.min(self.src.len());
        let hi = end.offset.min(self.src.len()).max(lo);
        BadDecl {
            pos: start,
            end,
            source: String::from_utf8_lossy(&self.src[lo..hi]).into_owned(),
        }
    }

    fn comment_group(&mut self) -> CommentGroup {
        let pos = self.peek().pos;
        let mut list = Vec::new();
        while let TokKind::Comment(text) = self.kind().clone() {
            let t = self.next();
            list.push(Comment { pos: t.pos, end: t.end, text });
        }
        let end = list.last().map(|c| c.end).unwrap_or(pos);
        CommentGroup { pos, end, list }
    }

    fn ident(&mut self) -> PResult<Ident> {
        match self.kind().clone() {
            TokKind::Ident(name) => {
                let t = self.next();
                Ok(Ident { pos: t.pos, end: t.end, qualifier: None, name })
            }
            _ => Err(PErr::new(self.peek().pos, "ERROR_PARSE expected identifier")),
        }
    }

    // Ident or alias.name; the dotted form is reserved for import references.
    fn dotted_ident(&mut self) -> PResult<Ident> {
        let first = self.ident()?;
        if *self.kind() == TokKind::Dot {
            self.next();
            let second = self.ident()?;
            return Ok(Ident {
                pos: first.pos,
                end: second.end,
                qualifier: Some(first.name),
                name: second.name,
            });
        }
        Ok(first)
    }

    fn type_tok(&mut self) -> PResult<Type> {
        match self.kind().clone() {
            TokKind::Type(obj) => {
                let t = self.next();
                Ok(Type { pos: t.pos, end: t.end, obj })
            }
            _ => Err(PErr::new(self.peek().pos, "ERROR_PARSE expected type")),
        }
    }

    fn keyword(&mut self, name: &str) -> PResult<Token> {
        match self.kind() {
            TokKind::Ident(n) if n == name => Ok(self.next()),
            _ => Err(PErr::new(
                self.peek().pos,
                format!("ERROR_PARSE expected {:?}", name),
            )),
        }
    }

    fn import_decl(&mut self) -> PResult<ImportDecl> {
        let kw = self.keyword("import")?;
        let name = self.ident()?;
        self.keyword("from")?;
        let from = self.func_lit()?;
        Ok(ImportDecl {
            pos: kw.pos,
            end: from.end,
            doc: None,
            name,
            from,
        })
    }

    fn export_decl(&mut self) -> PResult<ExportDecl> {
        let kw = self.keyword("export")?;
        let name = self.ident()?;
        Ok(ExportDecl { pos: kw.pos, end: name.end, name })
    }

    fn func_decl(&mut self) -> PResult<FuncDecl> {
        let ret = self.type_tok()?;

        let mut method = None;
        if *self.kind() == TokKind::LParen {
            // a parenthesized type before the name is a method receiver
            if let TokKind::Type(_) = self.toks[self.i + 1].kind {
                self.next(); // (
                let t = self.type_tok()?;
                if *self.kind() != TokKind::RParen {
                    return Err(PErr::new(self.peek().pos, "ERROR_PARSE expected )"));
                }
                self.next();
                method = Some(t);
            }
        }

        let name = self.ident()?;
        let params = self.field_list()?;
        let mut body = None;
        let mut end = self.last_end;
        if *self.kind() == TokKind::LBrace {
            let b = self.block_stmt()?;
            end = b.end;
            body = Some(b);
        }

        Ok(FuncDecl {
            pos: ret.pos,
            end,
            doc: None,
            ret,
            method,
            name,
            params,
            body,
        })
    }

    fn skip_newlines(&mut self) {
        while *self.kind() == TokKind::Newline {
            self.next();
        }
    }

    fn field_list(&mut self) -> PResult<Vec<Field>> {
        if *self.kind() != TokKind::LParen {
            return Err(PErr::new(self.peek().pos, "ERROR_PARSE expected ("));
        }
        self.next();
        self.skip_newlines();

        let mut fields = Vec::new();
        if *self.kind() != TokKind::RParen {
            loop {
                fields.push(self.field()?);
                self.skip_newlines();
                if *self.kind() == TokKind::Comma {
                    self.next();
                    self.skip_newlines();
                    if *self.kind() == TokKind::RParen {
                        break;
                    }
                    continue;
                }
                break;
            }
        }

        if *self.kind() != TokKind::RParen {
            return Err(PErr::new(self.peek().pos, "ERROR_PARSE expected )"));
        }
        self.next();
        Ok(fields)
    }

    fn field(&mut self) -> PResult<Field> {
        let mut variadic = false;
        let pos = self.peek().pos;
        if *self.kind() == TokKind::KwVariadic {
            self.next();
            variadic = true;
        }
        let typ = self.type_tok()?;
        let name = self.ident()?;
        Ok(Field { pos, end: name.end, variadic, typ, name })
    }

    fn block_stmt(&mut self) -> PResult<BlockStmt> {
        let open = self.next(); // {
        debug_assert_eq!(open.kind, TokKind::LBrace);

        let mut list = Vec::new();
        loop {
            match self.kind().clone() {
                TokKind::RBrace => {
                    let close = self.next();
                    attach_stmt_docs(&mut list);
                    return Ok(BlockStmt { pos: open.pos, end: close.end, list });
                }
                TokKind::Eof => {
                    return Err(PErr::new(self.peek().pos, "ERROR_PARSE unterminated block"))
                }
                TokKind::Newline => {
                    let t = self.next();
                    list.push(Stmt::Newline(Newline { pos: t.pos, end: t.end }));
                }
                TokKind::Comment(_) => {
                    list.push(Stmt::Doc(self.comment_group()));
                }
                TokKind::Ident(_) => {
                    list.push(Stmt::Call(self.call_stmt()?));
                }
                TokKind::Bad(msg) => {
                    let t = self.next();
                    return Err(PErr::new(t.pos, msg));
                }
                _ => {
                    return Err(PErr::new(self.peek().pos, "ERROR_PARSE expected call statement"))
                }
            }
        }
    }

    fn call_stmt(&mut self) -> PResult<CallStmt> {
        let func = self.dotted_ident()?;

        let mut args = Vec::new();
        loop {
            match self.kind() {
                TokKind::Ident(_)
                | TokKind::Str(_)
                | TokKind::Decimal(_)
                | TokKind::Numeric { .. }
                | TokKind::Bool(_)
                | TokKind::Type(_) => args.push(self.expr()?),
                _ => break,
            }
        }

        let mut with = None;
        if *self.kind() == TokKind::KwWith {
            let kw = self.next();
            let expr = match self.kind() {
                TokKind::Ident(_) => WithExpr::Ident(self.ident()?),
                TokKind::Type(_) => WithExpr::FuncLit(self.func_lit()?),
                _ => {
                    return Err(PErr::new(
                        self.peek().pos,
                        "ERROR_PARSE expected option identifier or literal after with",
                    ))
                }
            };
            let end = match &expr {
                WithExpr::Ident(i) => i.end,
                WithExpr::FuncLit(f) => f.end,
            };
            with = Some(WithOpt { pos: kw.pos, end, expr });
        }

        let mut alias = None;
        if *self.kind() == TokKind::KwAs {
            let kw = self.next();
            let name = self.ident()?;
            alias = Some(AliasDecl { pos: kw.pos, end: name.end, name });
        }

        let terminator = match self.kind().clone() {
            TokKind::Semicolon => {
                let t = self.next();
                StmtEnd::Semicolon(t.pos)
            }
            TokKind::Newline => {
                let t = self.next();
                StmtEnd::Newline(Newline { pos: t.pos, end: t.end })
            }
            TokKind::Comment(text) => {
                let t = self.next();
                StmtEnd::Comment(Comment { pos: t.pos, end: t.end, text })
            }
            _ => {
                return Err(PErr::new(
                    self.peek().pos,
                    "ERROR_PARSE expected statement terminator",
                ))
            }
        };

        let end = self.last_end;
        Ok(CallStmt {
            pos: func.pos,
            end,
            doc: None,
            func,
            args,
            with,
            alias,
            terminator,
        })
    }

    fn expr(&mut self) -> PResult<Expr> {
        match self.kind().clone() {
            TokKind::Ident(_) => Ok(Expr::Ident(self.dotted_ident()?)),
            TokKind::Str(value) => {
                let t = self.next();
                Ok(Expr::Lit(BasicLit::Str(StrLit { pos: t.pos, end: t.end, value })))
            }
            TokKind::Decimal(value) => {
                let t = self.next();
                Ok(Expr::Lit(BasicLit::Decimal(DecimalLit { pos: t.pos, end: t.end, value })))
            }
            TokKind::Numeric { value, base } => {
                let t = self.next();
                Ok(Expr::Lit(BasicLit::Numeric(NumericLit {
                    pos: t.pos,
                    end: t.end,
                    value,
                    base,
                })))
            }
            TokKind::Bool(value) => {
                let t = self.next();
                Ok(Expr::Lit(BasicLit::Bool(BoolLit { pos: t.pos, end: t.end, value })))
            }
            TokKind::Type(_) => Ok(Expr::Func(self.func_lit()?)),
            _ => Err(PErr::new(self.peek().pos, "ERROR_PARSE expected expression")),
        }
    }

    fn func_lit(&mut self) -> PResult<FuncLit> {
        let typ = self.type_tok()?;
        if *self.kind() != TokKind::LBrace {
            return Err(PErr::new(self.peek().pos, "ERROR_PARSE expected block"));
        }
        let body = self.block_stmt()?;
        Ok(FuncLit { pos: typ.pos, end: body.end, typ, body })
    }
}

fn attach_stmt_docs(list: &mut Vec<Stmt>) {
    let mut i = 0;
    while i + 1 < list.len() {
        let attach = matches!((&list[i], &list[i + 1]), (Stmt::Doc(_), Stmt::Call(_)));
        if attach {
            if let Stmt::Doc(group) = list.remove(i) {
                if let Stmt::Call(c) = &mut list[i] {
                    c.doc = Some(group);
                }
            }
        } else {
            i += 1;
        }
    }
}
