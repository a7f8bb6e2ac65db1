use crate::error::Pos;

/// Object type of a declaration, parameter, literal, or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjType {
    Str,
    Int,
    Bool,
    Fs,
    Option,
    OptionImage,
    OptionHttp,
    OptionGit,
    OptionLocal,
    OptionGenerate,
    OptionRun,
    OptionSsh,
    OptionSecret,
    OptionMount,
    OptionMkdir,
    OptionMkfile,
    OptionRm,
    OptionCopy,
}

impl ObjType {
    pub fn parse(s: &str) -> Option<ObjType> {
        Some(match s {
            "string" => ObjType::Str,
            "int" => ObjType::Int,
            "bool" => ObjType::Bool,
            "fs" => ObjType::Fs,
            "option" => ObjType::Option,
            "option::image" => ObjType::OptionImage,
            "option::http" => ObjType::OptionHttp,
            "option::git" => ObjType::OptionGit,
            "option::local" => ObjType::OptionLocal,
            "option::generate" => ObjType::OptionGenerate,
            "option::run" => ObjType::OptionRun,
            "option::ssh" => ObjType::OptionSsh,
            "option::secret" => ObjType::OptionSecret,
            "option::mount" => ObjType::OptionMount,
            "option::mkdir" => ObjType::OptionMkdir,
            "option::mkfile" => ObjType::OptionMkfile,
            "option::rm" => ObjType::OptionRm,
            "option::copy" => ObjType::OptionCopy,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjType::Str => "string",
            ObjType::Int => "int",
            ObjType::Bool => "bool",
            ObjType::Fs => "fs",
            ObjType::Option => "option",
            ObjType::OptionImage => "option::image",
            ObjType::OptionHttp => "option::http",
            ObjType::OptionGit => "option::git",
            ObjType::OptionLocal => "option::local",
            ObjType::OptionGenerate => "option::generate",
            ObjType::OptionRun => "option::run",
            ObjType::OptionSsh => "option::ssh",
            ObjType::OptionSecret => "option::secret",
            ObjType::OptionMount => "option::mount",
            ObjType::OptionMkdir => "option::mkdir",
            ObjType::OptionMkfile => "option::mkfile",
            ObjType::OptionRm => "option::rm",
            ObjType::OptionCopy => "option::copy",
        }
    }

    /// The principal type: every option sub-kind collapses to option.
    pub fn principal(self) -> ObjType {
        if self.is_option() {
            ObjType::Option
        } else {
            self
        }
    }

    pub fn is_option(self) -> bool {
        !matches!(self, ObjType::Str | ObjType::Int | ObjType::Bool | ObjType::Fs)
    }

    /// The sub-kind name for an option type, if any.
    pub fn option_kind(self) -> Option<&'static str> {
        Some(match self {
            ObjType::OptionImage => "image",
            ObjType::OptionHttp => "http",
            ObjType::OptionGit => "git",
            ObjType::OptionLocal => "local",
            ObjType::OptionGenerate => "generate",
            ObjType::OptionRun => "run",
            ObjType::OptionSsh => "ssh",
            ObjType::OptionSecret => "secret",
            ObjType::OptionMount => "mount",
            ObjType::OptionMkdir => "mkdir",
            ObjType::OptionMkfile => "mkfile",
            ObjType::OptionRm => "rm",
            ObjType::OptionCopy => "copy",
            _ => return None,
        })
    }

    /// Principal-type equality: option::run matches option, fs matches fs.
    pub fn equals(self, other: ObjType) -> bool {
        self.principal() == other.principal()
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub name: String,
    pub pos: Pos,
    pub end: Pos,
    pub decls: Vec<Decl>,
}

impl File {
    /// Iterate over function declarations.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Import(i) => Some(i),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = &ExportDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Export(e) => Some(e),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Bad(BadDecl),
    Import(ImportDecl),
    Export(ExportDecl),
    Func(FuncDecl),
    Newline(Newline),
    Doc(CommentGroup),
}

impl Decl {
    pub fn pos(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.pos,
            Decl::Import(d) => d.pos,
            Decl::Export(d) => d.pos,
            Decl::Func(d) => d.pos,
            Decl::Newline(n) => n.pos,
            Decl::Doc(g) => g.pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.end,
            Decl::Import(d) => d.end,
            Decl::Export(d) => d.end,
            Decl::Func(d) => d.end,
            Decl::Newline(n) => n.end,
            Decl::Doc(g) => g.end,
        }
    }
}

/// A declaration that failed to parse; spans to the recovery point.
#[derive(Debug, Clone, PartialEq)]
pub struct BadDecl {
    pub pos: Pos,
    pub end: Pos,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub pos: Pos,
    pub end: Pos,
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    pub from: FuncLit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDecl {
    pub pos: Pos,
    pub end: Pos,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub pos: Pos,
    pub end: Pos,
    pub doc: Option<CommentGroup>,
    pub ret: Type,
    pub method: Option<Type>,
    pub name: Ident,
    pub params: Vec<Field>,
    pub body: Option<BlockStmt>,
}

/// A parameter declaration in a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub pos: Pos,
    pub end: Pos,
    pub variadic: bool,
    pub typ: Type,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub pos: Pos,
    pub end: Pos,
    pub obj: ObjType,
}

/// An identifier, optionally qualified by an import alias (alias.name).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub pos: Pos,
    pub end: Pos,
    pub qualifier: Option<String>,
    pub name: String,
}

impl Ident {
    pub fn display_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub pos: Pos,
    pub end: Pos,
    pub list: Vec<Stmt>,
}

impl BlockStmt {
    /// The call statements of the block, skipping trivia.
    pub fn calls(&self) -> Vec<&CallStmt> {
        self.list
            .iter()
            .filter_map(|s| match s {
                Stmt::Call(c) => Some(c),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Call(CallStmt),
    Newline(Newline),
    Doc(CommentGroup),
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Call(c) => c.pos,
            Stmt::Newline(n) => n.pos,
            Stmt::Doc(g) => g.pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Stmt::Call(c) => c.end,
            Stmt::Newline(n) => n.end,
            Stmt::Doc(g) => g.end,
        }
    }
}

/// A function name, arguments, optional with clause, optional alias, and a
/// terminator. The start offset is unique within a file and doubles as the
/// statement's identity for alias back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub pos: Pos,
    pub end: Pos,
    pub doc: Option<CommentGroup>,
    pub func: Ident,
    pub args: Vec<Expr>,
    pub with: Option<WithOpt>,
    pub alias: Option<AliasDecl>,
    pub terminator: StmtEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtEnd {
    Semicolon(Pos),
    Newline(Newline),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithOpt {
    pub pos: Pos,
    pub end: Pos,
    pub expr: WithExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WithExpr {
    Ident(Ident),
    FuncLit(FuncLit),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    pub pos: Pos,
    pub end: Pos,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Lit(BasicLit),
    Func(FuncLit),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Ident(i) => i.pos,
            Expr::Lit(l) => l.pos(),
            Expr::Func(f) => f.pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Expr::Ident(i) => i.end,
            Expr::Lit(l) => l.end(),
            Expr::Func(f) => f.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BasicLit {
    Str(StrLit),
    Decimal(DecimalLit),
    Numeric(NumericLit),
    Bool(BoolLit),
}

impl BasicLit {
    pub fn pos(&self) -> Pos {
        match self {
            BasicLit::Str(l) => l.pos,
            BasicLit::Decimal(l) => l.pos,
            BasicLit::Numeric(l) => l.pos,
            BasicLit::Bool(l) => l.pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            BasicLit::Str(l) => l.end,
            BasicLit::Decimal(l) => l.end,
            BasicLit::Numeric(l) => l.end,
            BasicLit::Bool(l) => l.end,
        }
    }

    pub fn obj_type(&self) -> ObjType {
        match self {
            BasicLit::Str(_) => ObjType::Str,
            BasicLit::Decimal(_) | BasicLit::Numeric(_) => ObjType::Int,
            BasicLit::Bool(_) => ObjType::Bool,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub pos: Pos,
    pub end: Pos,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecimalLit {
    pub pos: Pos,
    pub end: Pos,
    pub value: i64,
}

/// A number literal with a non-decimal base (2, 8, or 16). The base is kept
/// for formatting; comparison is by numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericLit {
    pub pos: Pos,
    pub end: Pos,
    pub value: i64,
    pub base: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLit {
    pub pos: Pos,
    pub end: Pos,
    pub value: bool,
}

/// A typed block literal: a braced statement list that evaluates to a value
/// of its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub pos: Pos,
    pub end: Pos,
    pub typ: Type,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentGroup {
    pub pos: Pos,
    pub end: Pos,
    pub list: Vec<Comment>,
}

/// A single # comment; text excludes the marker and the trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub pos: Pos,
    pub end: Pos,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Newline {
    pub pos: Pos,
    pub end: Pos,
}
