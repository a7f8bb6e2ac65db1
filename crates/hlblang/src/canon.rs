//! Unparser: prints a CST back to canonical formatted source. One blank line
//! between declarations, one statement per line, tab indentation, comments
//! preserved in place. Formatting is idempotent after one pass.

use crate::ast::*;

pub fn print_file(file: &File) -> String {
    let mut out = String::new();
    let mut first = true;
    for decl in &file.decls {
        if matches!(decl, Decl::Newline(_)) {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;
        match decl {
            Decl::Bad(b) => {
                out.push_str(&b.source);
                if !b.source.ends_with('\n') {
                    out.push('\n');
                }
            }
            Decl::Import(im) => print_import(&mut out, im),
            Decl::Export(e) => {
                out.push_str("export ");
                out.push_str(&e.name.name);
                out.push('\n');
            }
            Decl::Func(f) => print_func(&mut out, f),
            Decl::Doc(g) => print_comment_group(&mut out, g, 0),
            Decl::Newline(_) => unreachable!(),
        }
    }
    out
}

fn print_import(out: &mut String, im: &ImportDecl) {
    if let Some(doc) = &im.doc {
        print_comment_group(out, doc, 0);
    }
    out.push_str("import ");
    out.push_str(&im.name.name);
    out.push_str(" from ");
    out.push_str(im.from.typ.obj.as_str());
    out.push(' ');
    print_block(out, &im.from.body, 1);
    out.push('\n');
}

fn print_func(out: &mut String, f: &FuncDecl) {
    if let Some(doc) = &f.doc {
        print_comment_group(out, doc, 0);
    }
    out.push_str(f.ret.obj.as_str());
    out.push(' ');
    if let Some(method) = &f.method {
        out.push('(');
        out.push_str(method.obj.as_str());
        out.push_str(") ");
    }
    out.push_str(&f.name.name);
    out.push('(');
    for (i, param) in f.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if param.variadic {
            out.push_str("variadic ");
        }
        out.push_str(param.typ.obj.as_str());
        out.push(' ');
        out.push_str(&param.name.name);
    }
    out.push(')');
    if let Some(body) = &f.body {
        out.push(' ');
        print_block(out, body, 1);
    }
    out.push('\n');
}

fn push_tabs(out: &mut String, n: usize) {
    for _ in 0..n {
        out.push('\t');
    }
}

fn print_comment_group(out: &mut String, g: &CommentGroup, indent: usize) {
    for c in &g.list {
        push_tabs(out, indent);
        out.push('#');
        out.push_str(&c.text);
        out.push('\n');
    }
}

// indent is the level of the block's statements; the closing brace sits one
// level out.
fn print_block(out: &mut String, block: &BlockStmt, indent: usize) {
    let substantive = block
        .list
        .iter()
        .any(|s| matches!(s, Stmt::Call(_) | Stmt::Doc(_)));
    if !substantive {
        out.push_str("{}");
        return;
    }

    out.push_str("{\n");
    let mut emitted = false;
    let mut pending_blank = false;
    for stmt in &block.list {
        match stmt {
            Stmt::Newline(_) => {
                if emitted {
                    pending_blank = true;
                }
            }
            Stmt::Doc(g) => {
                if pending_blank {
                    out.push('\n');
                    pending_blank = false;
                }
                print_comment_group(out, g, indent);
                emitted = true;
            }
            Stmt::Call(call) => {
                if pending_blank {
                    out.push('\n');
                    pending_blank = false;
                }
                print_call(out, call, indent);
                emitted = true;
            }
        }
    }
    push_tabs(out, indent - 1);
    out.push('}');
}

fn print_call(out: &mut String, call: &CallStmt, indent: usize) {
    if let Some(doc) = &call.doc {
        print_comment_group(out, doc, indent);
    }
    push_tabs(out, indent);
    out.push_str(&call.func.display_name());
    for a in &call.args {
        out.push(' ');
        print_expr(out, a, indent);
    }
    if let Some(with) = &call.with {
        out.push_str(" with ");
        match &with.expr {
            WithExpr::Ident(id) => out.push_str(&id.display_name()),
            WithExpr::FuncLit(lit) => {
                out.push_str(lit.typ.obj.as_str());
                out.push(' ');
                print_block(out, &lit.body, indent + 1);
            }
        }
    }
    if let Some(alias) = &call.alias {
        out.push_str(" as ");
        out.push_str(&alias.name.name);
    }
    if let StmtEnd::Comment(c) = &call.terminator {
        out.push_str(" #");
        out.push_str(&c.text);
    }
    out.push('\n');
}

fn print_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::Ident(id) => out.push_str(&id.display_name()),
        Expr::Lit(lit) => print_lit(out, lit),
        Expr::Func(lit) => {
            out.push_str(lit.typ.obj.as_str());
            out.push(' ');
            print_block(out, &lit.body, indent + 1);
        }
    }
}

fn print_lit(out: &mut String, lit: &BasicLit) {
    match lit {
        BasicLit::Str(l) => quote_string(out, &l.value),
        BasicLit::Decimal(l) => out.push_str(&l.value.to_string()),
        BasicLit::Numeric(l) => {
            let s = match l.base {
                2 => format!("0b{:b}", l.value),
                8 => format!("0o{:o}", l.value),
                _ => format!("0x{:x}", l.value),
            };
            out.push_str(&s);
        }
        BasicLit::Bool(l) => out.push_str(if l.value { "true" } else { "false" }),
    }
}

fn quote_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
