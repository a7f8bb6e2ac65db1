use std::collections::BTreeSet;

use crate::ast::*;
use crate::builtin::{self, BuiltinSig, ParamMode};
use crate::error::{Diagnostic, Pos};
use crate::scope::{file_scope, NodeRef, Obj, ObjKind, Scope};

/// Check a parsed file: bind every identifier, validate call signatures and
/// block shapes. All errors are accumulated; an empty result means the file
/// is well typed.
pub fn check_file(file: &File) -> Vec<Diagnostic> {
    let (scope, diags) = file_scope(file);
    let mut cx = Ctx { filename: &file.name, diags };

    for export in file.exports() {
        match scope.lookup(&export.name.name) {
            Some(Obj { node: NodeRef::Func(_), .. }) => {}
            Some(_) => cx.error(
                export.name.pos,
                export.name.end,
                format!("ERROR_NAME export {} is not a function", export.name.name),
            ),
            None => cx.error(
                export.name.pos,
                export.name.end,
                format!("ERROR_NAME undefined export {}", export.name.name),
            ),
        }
    }

    for import in file.imports() {
        if import.from.typ.obj != ObjType::Fs {
            cx.error(
                import.from.pos,
                import.from.end,
                "ERROR_TYPE import source must be an fs block".to_string(),
            );
            continue;
        }
        check_block(&mut cx, &scope, ObjType::Fs, ObjType::Fs, &import.from.body, false);
    }

    for func in file.funcs() {
        if func.ret.obj == ObjType::Option {
            cx.error(
                func.ret.pos,
                func.ret.end,
                "ERROR_TYPE option declaration requires a kind".to_string(),
            );
        }

        let mut fscope = Scope::child(&scope);
        let mut seen = BTreeSet::new();
        for param in &func.params {
            if param.variadic {
                cx.error(
                    param.pos,
                    param.end,
                    "ERROR_TYPE variadic parameters are reserved for builtins".to_string(),
                );
            }
            if !seen.insert(param.name.name.clone()) {
                cx.error(
                    param.name.pos,
                    param.name.end,
                    format!("ERROR_NAME duplicate parameter {}", param.name.name),
                );
                continue;
            }
            fscope.insert(
                param.name.name.clone(),
                Obj { kind: ObjKind::Field, node: NodeRef::Param(param) },
            );
        }

        if let Some(body) = &func.body {
            let typ = func.ret.obj;
            check_block(&mut cx, &fscope, typ.principal(), typ, body, false);
        }
    }

    cx.diags
}

struct Ctx<'a> {
    filename: &'a str,
    diags: Vec<Diagnostic>,
}

impl<'a> Ctx<'a> {
    fn error(&mut self, pos: Pos, end: Pos, msg: String) {
        self.diags.push(Diagnostic::new(self.filename, pos, end, msg));
    }
}

// typ is the block's principal type; for option blocks kind carries the
// exact sub-kind. allow_mount_alias is set inside an inline run with block,
// the only place a mount may carry an alias.
fn check_block<'a>(
    cx: &mut Ctx<'_>,
    scope: &Scope<'a, '_>,
    typ: ObjType,
    kind: ObjType,
    block: &'a BlockStmt,
    allow_mount_alias: bool,
) {
    if typ == ObjType::Option {
        check_option_block(cx, scope, kind, block, allow_mount_alias);
        return;
    }

    let calls = block.calls();
    let mut effective = Vec::new();
    for call in calls {
        if call.func.qualifier.is_none() && builtin::is_debug(&call.func.name) {
            if let Some(sig) = builtin::lookup(typ, &call.func.name) {
                check_call_sig(cx, scope, sig, call, false);
            }
            continue;
        }
        effective.push(call);
    }

    if effective.is_empty() {
        cx.error(
            block.pos,
            block.end,
            format!("ERROR_TYPE {} block requires a source statement", typ.as_str()),
        );
        return;
    }

    for call in effective.iter().copied() {
        if let Some(alias) = &call.alias {
            if typ != ObjType::Fs {
                cx.error(
                    alias.pos,
                    alias.end,
                    "ERROR_TYPE alias requires an fs statement".to_string(),
                );
            }
        }
    }

    check_source_call(cx, scope, typ, effective[0]);

    for call in effective[1..].iter().copied() {
        match typ {
            ObjType::Fs => check_chain_call(cx, scope, call),
            ObjType::Str => cx.error(
                call.pos,
                call.end,
                "ERROR_TYPE string blocks do not chain".to_string(),
            ),
            _ => cx.error(
                call.pos,
                call.end,
                format!("ERROR_TYPE {} blocks do not chain", typ.as_str()),
            ),
        }
    }
}

fn check_source_call<'a>(cx: &mut Ctx<'_>, scope: &Scope<'a, '_>, typ: ObjType, call: &'a CallStmt) {
    if call.func.qualifier.is_some() {
        check_qualified(cx, scope, call);
        return;
    }

    if let Some(sig) = builtin::lookup(typ, &call.func.name) {
        if !sig.source {
            cx.error(
                call.func.pos,
                call.func.end,
                format!("ERROR_TYPE {} is not a source operation", call.func.name),
            );
        }
        check_call_sig(cx, scope, sig, call, false);
        return;
    }

    match scope.lookup(&call.func.name) {
        Some(Obj { node: NodeRef::Func(fd), .. }) => {
            if fd.ret.obj != typ {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!(
                        "ERROR_TYPE {} returns {}, expected {}",
                        call.func.name,
                        fd.ret.obj.as_str(),
                        typ.as_str()
                    ),
                );
            }
            check_user_call(cx, scope, fd, call);
        }
        Some(Obj { node: NodeRef::Alias { typ: at, .. }, .. }) => {
            if at != typ {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!("ERROR_TYPE {} is {}, expected {}", call.func.name, at.as_str(), typ.as_str()),
                );
            }
            no_with(cx, call);
        }
        Some(Obj { node: NodeRef::Param(field), .. }) => {
            if field.typ.obj != typ {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!(
                        "ERROR_TYPE {} is {}, expected {}",
                        call.func.name,
                        field.typ.obj.as_str(),
                        typ.as_str()
                    ),
                );
            }
            if !call.args.is_empty() {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!("ERROR_TYPE {} takes no arguments", call.func.name),
                );
            }
            no_with(cx, call);
        }
        Some(Obj { node: NodeRef::Import(_), .. }) => cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_TYPE {} is an import, not a value", call.func.name),
        ),
        None => cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_NAME undefined identifier {}", call.func.name),
        ),
    }
}

fn check_chain_call<'a>(cx: &mut Ctx<'_>, scope: &Scope<'a, '_>, call: &'a CallStmt) {
    if call.func.qualifier.is_some() {
        cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_TYPE chain statement {} must be a builtin", call.func.display_name()),
        );
        return;
    }
    match builtin::lookup(ObjType::Fs, &call.func.name) {
        Some(sig) => {
            if sig.source {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!("ERROR_TYPE {} is a source operation in chain position", call.func.name),
                );
            }
            check_call_sig(cx, scope, sig, call, false);
        }
        None => {
            if scope.lookup(&call.func.name).is_some() || call.func.qualifier.is_some() {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!("ERROR_TYPE chain statement {} must be a builtin", call.func.name),
                );
            } else {
                cx.error(
                    call.func.pos,
                    call.func.end,
                    format!("ERROR_NAME undefined identifier {}", call.func.name),
                );
            }
        }
    }
}

fn check_option_block<'a>(
    cx: &mut Ctx<'_>,
    scope: &Scope<'a, '_>,
    kind: ObjType,
    block: &'a BlockStmt,
    allow_mount_alias: bool,
) {
    for call in block.calls() {
        if let Some(alias) = &call.alias {
            let ok = allow_mount_alias && call.func.qualifier.is_none() && call.func.name == "mount";
            if !ok {
                cx.error(
                    alias.pos,
                    alias.end,
                    "ERROR_TYPE alias is only allowed on mounts in an inline run option block"
                        .to_string(),
                );
            }
        }

        if call.func.qualifier.is_some() {
            check_qualified(cx, scope, call);
            continue;
        }

        if let Some(sig) = builtin::lookup(kind, &call.func.name) {
            check_call_sig(cx, scope, sig, call, false);
            continue;
        }

        match scope.lookup(&call.func.name) {
            Some(Obj { node: NodeRef::Func(fd), .. }) => {
                if fd.ret.obj != kind {
                    cx.error(
                        call.func.pos,
                        call.func.end,
                        format!(
                            "ERROR_TYPE {} returns {}, expected {}",
                            call.func.name,
                            fd.ret.obj.as_str(),
                            kind.as_str()
                        ),
                    );
                }
                check_user_call(cx, scope, fd, call);
            }
            Some(Obj { node: NodeRef::Param(field), .. }) => {
                if field.typ.obj != kind {
                    cx.error(
                        call.func.pos,
                        call.func.end,
                        format!(
                            "ERROR_TYPE {} is {}, expected {}",
                            call.func.name,
                            field.typ.obj.as_str(),
                            kind.as_str()
                        ),
                    );
                }
                no_with(cx, call);
            }
            Some(_) => cx.error(
                call.func.pos,
                call.func.end,
                format!("ERROR_TYPE {} is not an option", call.func.name),
            ),
            None => cx.error(
                call.func.pos,
                call.func.end,
                format!("ERROR_NAME undefined identifier {}", call.func.name),
            ),
        }
    }
}

fn check_qualified<'a>(cx: &mut Ctx<'_>, scope: &Scope<'a, '_>, call: &'a CallStmt) {
    let qualifier = call.func.qualifier.as_ref().unwrap();
    match scope.lookup(qualifier) {
        Some(Obj { node: NodeRef::Import(_), .. }) => {
            // the callee's signature lives in the imported file and is
            // validated against the resolver-provided file at evaluation
        }
        Some(_) => cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_TYPE {} is not an import", qualifier),
        ),
        None => cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_NAME undefined import {}", qualifier),
        ),
    }
}

fn check_user_call<'a>(cx: &mut Ctx<'_>, scope: &Scope<'a, '_>, fd: &FuncDecl, call: &'a CallStmt) {
    no_with(cx, call);
    if call.args.len() != fd.params.len() {
        cx.error(
            call.func.pos,
            call.func.end,
            format!(
                "ERROR_TYPE wrong number of arguments to {}: expected {}, found {}",
                call.func.name,
                fd.params.len(),
                call.args.len()
            ),
        );
    }
    for (param, arg) in fd.params.iter().zip(&call.args) {
        check_arg(cx, scope, param.typ.obj, arg, false);
    }
}

fn no_with(cx: &mut Ctx<'_>, call: &CallStmt) {
    if let Some(with) = &call.with {
        cx.error(
            with.pos,
            with.end,
            format!("ERROR_TYPE {} does not take options", call.func.name),
        );
    }
}

fn check_call_sig<'a>(
    cx: &mut Ctx<'_>,
    scope: &Scope<'a, '_>,
    sig: &BuiltinSig,
    call: &'a CallStmt,
    _in_option: bool,
) {
    if !sig.arity_ok(call.args.len()) {
        cx.error(
            call.func.pos,
            call.func.end,
            format!("ERROR_TYPE wrong number of arguments to {}", call.func.name),
        );
    }

    // format's variadic tail accepts ints alongside strings
    let lenient = sig.ret == ObjType::Str
        && call.func.name == "format"
        && sig.params.last().map_or(false, |p| p.mode == ParamMode::Variadic);

    for (i, arg) in call.args.iter().enumerate() {
        let Some(param) = sig.param_at(i) else { continue };
        let lenient_here = lenient && i >= 1;
        check_arg(cx, scope, param.typ, arg, lenient_here);
    }

    match (&call.with, sig.option_kind) {
        (None, _) => {}
        (Some(with), None) => cx.error(
            with.pos,
            with.end,
            format!("ERROR_TYPE {} does not take options", call.func.name),
        ),
        (Some(with), Some(kind)) => match &with.expr {
            WithExpr::Ident(id) => match ident_obj_type(scope, id) {
                IdentType::Known(t) if t == kind => {}
                IdentType::Known(t) => cx.error(
                    id.pos,
                    id.end,
                    format!("ERROR_TYPE expected {} options, found {}", kind.as_str(), t.as_str()),
                ),
                IdentType::Qualified => {}
                IdentType::Undefined => cx.error(
                    id.pos,
                    id.end,
                    format!("ERROR_NAME undefined identifier {}", id.name),
                ),
            },
            WithExpr::FuncLit(lit) => {
                if lit.typ.obj != ObjType::Option && lit.typ.obj != kind {
                    cx.error(
                        lit.typ.pos,
                        lit.typ.end,
                        format!(
                            "ERROR_TYPE expected {} options, found {}",
                            kind.as_str(),
                            lit.typ.obj.as_str()
                        ),
                    );
                }
                let allow_mount_alias = kind == ObjType::OptionRun;
                check_block(cx, scope, ObjType::Option, kind, &lit.body, allow_mount_alias);
            }
        },
    }
}

fn check_arg<'a>(cx: &mut Ctx<'_>, scope: &Scope<'a, '_>, want: ObjType, arg: &'a Expr, lenient_str_int: bool) {
    match arg {
        Expr::Ident(id) => match ident_obj_type(scope, id) {
            IdentType::Known(t) => {
                let ok = t == want || (lenient_str_int && want == ObjType::Str && t == ObjType::Int);
                if !ok {
                    cx.error(
                        id.pos,
                        id.end,
                        format!("ERROR_TYPE expected {} argument, found {}", want.as_str(), t.as_str()),
                    );
                }
            }
            IdentType::Qualified => {}
            IdentType::Undefined => {
                // a bare identifier may name a nullary source builtin of the
                // wanted type, e.g. mount scratch "/m"
                let builtin_ok = builtin::lookup(want, &id.name)
                    .map_or(false, |sig| sig.source && sig.arity_ok(0));
                if !builtin_ok {
                    cx.error(
                        id.pos,
                        id.end,
                        format!("ERROR_NAME undefined identifier {}", id.display_name()),
                    );
                }
            }
        },
        Expr::Lit(lit) => {
            let t = lit.obj_type();
            let ok = t == want || (lenient_str_int && want == ObjType::Str && t == ObjType::Int);
            if !ok {
                cx.error(
                    lit.pos(),
                    lit.end(),
                    format!("ERROR_TYPE expected {} argument, found {}", want.as_str(), t.as_str()),
                );
            }
        }
        Expr::Func(lit) => {
            let lt = lit.typ.obj;
            if want.is_option() {
                if lt != ObjType::Option && lt != want {
                    cx.error(
                        lit.typ.pos,
                        lit.typ.end,
                        format!("ERROR_TYPE expected {} argument, found {}", want.as_str(), lt.as_str()),
                    );
                }
                check_block(cx, scope, ObjType::Option, want, &lit.body, false);
            } else {
                if lt != want {
                    cx.error(
                        lit.typ.pos,
                        lit.typ.end,
                        format!("ERROR_TYPE expected {} argument, found {}", want.as_str(), lt.as_str()),
                    );
                }
                check_block(cx, scope, lt.principal(), lt, &lit.body, false);
            }
        }
    }
}

enum IdentType {
    Known(ObjType),
    Qualified,
    Undefined,
}

fn ident_obj_type<'a>(scope: &Scope<'a, '_>, id: &Ident) -> IdentType {
    if let Some(qualifier) = &id.qualifier {
        return match scope.lookup(qualifier) {
            Some(Obj { node: NodeRef::Import(_), .. }) => IdentType::Qualified,
            _ => IdentType::Undefined,
        };
    }
    match scope.lookup(&id.name) {
        Some(Obj { node: NodeRef::Func(fd), .. }) => IdentType::Known(fd.ret.obj),
        Some(Obj { node: NodeRef::Param(field), .. }) => IdentType::Known(field.typ.obj),
        Some(Obj { node: NodeRef::Alias { typ, .. }, .. }) => IdentType::Known(typ),
        Some(Obj { node: NodeRef::Import(_), .. }) => IdentType::Undefined,
        None => IdentType::Undefined,
    }
}
