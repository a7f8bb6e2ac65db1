use std::collections::BTreeMap;

use crate::ast::*;
use crate::error::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Decl,
    Field,
    Expr,
}

/// A binding target. Alias entries carry back-references to the enclosing
/// function and the aliased call statement; the call's start offset is its
/// identity.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Func(&'a FuncDecl),
    Import(&'a ImportDecl),
    Alias {
        decl: &'a AliasDecl,
        func: &'a FuncDecl,
        call: &'a CallStmt,
        typ: ObjType,
    },
    Param(&'a Field),
}

#[derive(Debug, Clone, Copy)]
pub struct Obj<'a> {
    pub kind: ObjKind,
    pub node: NodeRef<'a>,
}

/// A lexical scope: name to object, with a parent link. Lookup walks the
/// parent chain; the first hit wins.
pub struct Scope<'a, 'p> {
    objects: BTreeMap<String, Obj<'a>>,
    parent: Option<&'p Scope<'a, 'p>>,
}

impl<'a, 'p> Scope<'a, 'p> {
    pub fn new() -> Self {
        Scope { objects: BTreeMap::new(), parent: None }
    }

    pub fn child(parent: &'p Scope<'a, 'p>) -> Self {
        Scope { objects: BTreeMap::new(), parent: Some(parent) }
    }

    /// Insert a binding; returns false when the name is already bound in
    /// this scope.
    pub fn insert(&mut self, name: String, obj: Obj<'a>) -> bool {
        use std::collections::btree_map::Entry;
        match self.objects.entry(name) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(obj);
                true
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Obj<'a>> {
        match self.objects.get(name) {
            Some(obj) => Some(*obj),
            None => self.parent.and_then(|p| p.lookup(name)),
        }
    }
}

impl<'a, 'p> Default for Scope<'a, 'p> {
    fn default() -> Self {
        Scope::new()
    }
}

/// Collect the file scope: every top-level function, import alias, and every
/// `as` alias found anywhere inside function bodies. Duplicate names are
/// reported.
pub fn file_scope<'a>(file: &'a File) -> (Scope<'a, 'a>, Vec<Diagnostic>) {
    let mut scope = Scope::new();
    let mut diags = Vec::new();

    let report_dup = |name: &Ident, diags: &mut Vec<Diagnostic>| {
        diags.push(Diagnostic::new(
            &file.name,
            name.pos,
            name.end,
            format!("ERROR_NAME duplicate declaration {}", name.name),
        ));
    };

    for decl in &file.decls {
        match decl {
            Decl::Func(f) => {
                let obj = Obj { kind: ObjKind::Decl, node: NodeRef::Func(f) };
                if !scope.insert(f.name.name.clone(), obj) {
                    report_dup(&f.name, &mut diags);
                }
                if let Some(body) = &f.body {
                    collect_aliases(file, f, f.ret.obj, body, &mut scope, &mut diags);
                }
            }
            Decl::Import(im) => {
                let obj = Obj { kind: ObjKind::Decl, node: NodeRef::Import(im) };
                if !scope.insert(im.name.name.clone(), obj) {
                    report_dup(&im.name, &mut diags);
                }
            }
            _ => {}
        }
    }

    (scope, diags)
}

fn collect_aliases<'a>(
    file: &'a File,
    func: &'a FuncDecl,
    typ: ObjType,
    block: &'a BlockStmt,
    scope: &mut Scope<'a, 'a>,
    diags: &mut Vec<Diagnostic>,
) {
    for call in block.calls() {
        if let Some(alias) = &call.alias {
            let alias_typ = if call.func.name == "mount" { ObjType::Fs } else { typ };
            let obj = Obj {
                kind: ObjKind::Decl,
                node: NodeRef::Alias { decl: alias, func, call, typ: alias_typ },
            };
            if !scope.insert(alias.name.name.clone(), obj) {
                diags.push(Diagnostic::new(
                    &file.name,
                    alias.name.pos,
                    alias.name.end,
                    format!("ERROR_NAME duplicate declaration {}", alias.name.name),
                ));
            }
        }
        for arg in &call.args {
            if let Expr::Func(lit) = arg {
                collect_aliases(file, func, lit.typ.obj, &lit.body, scope, diags);
            }
        }
        if let Some(with) = &call.with {
            if let WithExpr::FuncLit(lit) = &with.expr {
                collect_aliases(file, func, lit.typ.obj, &lit.body, scope, diags);
            }
        }
    }
}
