//! The code generator: walks a checked file from a target function and emits
//! build-graph IR.

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use llbcore::{
    ident, rfc3339, shlex, CacheSharing, CopyInfo, CopyOpt, ExecOpt, FileAction, FrontendOpt,
    GitOpt, HttpOpt, ImageOpt, LocalOpt, MkdirOpt, MkfileOpt, MountOpt, NetMode, OptItem,
    RmOpt, SecretOpt, SecurityMode, SshOpt, State, Value,
};

use crate::ast::*;
use crate::builtin;
use crate::scope::{file_scope, NodeRef, Obj, Scope};

/// Hook invoked before each statement with the resolution scope, the node,
/// and the current value.
pub trait Debugger {
    fn stop(&mut self, scope: &Scope<'_, '_>, node: DebugNode<'_>, value: Option<&Value>)
        -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub enum DebugNode<'a> {
    File(&'a File),
    Call(&'a CallStmt),
}

pub struct NoopDebugger;

impl Debugger for NoopDebugger {
    fn stop(
        &mut self,
        _scope: &Scope<'_, '_>,
        _node: DebugNode<'_>,
        _value: Option<&Value>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Resolves an import alias to its parsed file. The evaluated source state of
/// the import declaration is handed along for resolvers that key on it.
pub trait ImportResolver {
    fn resolve(&self, alias: &str, source: &State) -> Result<File>;
}

pub struct GenOptions {
    pub debugger: Option<Box<dyn Debugger>>,
    pub resolver: Option<Box<dyn ImportResolver>>,
    pub max_depth: usize,
    /// When false (the default), generate attaches IgnoreCache to frontends.
    pub frontend_caching: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            debugger: None,
            resolver: None,
            max_depth: 1024,
            frontend_caching: false,
        }
    }
}

/// Side data accumulated during generation: synthesized local-source ids
/// mapped to host paths.
#[derive(Debug, Clone, Default)]
pub struct GenInfo {
    pub locals: BTreeMap<String, String>,
}

/// Generate the build graph for a named fs target.
pub fn generate(file: &File, target: &str, opts: GenOptions) -> Result<(State, GenInfo)> {
    let mut sess = Session {
        debugger: opts.debugger,
        resolver: opts.resolver,
        max_depth: opts.max_depth,
        frontend_caching: opts.frontend_caching,
        info: GenInfo::default(),
        local_seq: 0,
        depth: 0,
        imports: BTreeMap::new(),
    };
    let ctx = FileCtx::new(file);

    sess.debug(&ctx.scope, DebugNode::File(file), None)?;
    resolve_imports(&mut sess, &ctx)?;

    let obj = ctx
        .scope
        .lookup(target)
        .ok_or_else(|| anyhow!("ERROR_TARGET unknown target {:?}", target))?;

    let mut noop = |_: &CallStmt, _: &Value| {};
    let value = match obj.node {
        NodeRef::Func(fd) => {
            if fd.ret.obj != ObjType::Fs {
                bail!("ERROR_TARGET {} is not an fs function", target);
            }
            eval_func_call(&mut sess, &ctx, fd, vec![], &mut noop)?
        }
        node @ NodeRef::Alias { typ, .. } => {
            if typ != ObjType::Fs {
                bail!("ERROR_TARGET {} is not an fs alias", target);
            }
            eval_alias(&mut sess, &ctx, node, vec![])?
        }
        _ => bail!("ERROR_TARGET {} is not an fs function", target),
    };

    match value {
        Value::Fs(st) => Ok((st, sess.info)),
        other => bail!("ERROR_TARGET {} produced {}", target, other.type_name()),
    }
}

struct Session {
    debugger: Option<Box<dyn Debugger>>,
    resolver: Option<Box<dyn ImportResolver>>,
    max_depth: usize,
    frontend_caching: bool,
    info: GenInfo,
    local_seq: u64,
    depth: usize,
    imports: BTreeMap<String, Rc<File>>,
}

impl Session {
    fn debug(
        &mut self,
        scope: &Scope<'_, '_>,
        node: DebugNode<'_>,
        value: Option<&Value>,
    ) -> Result<()> {
        match self.debugger.as_mut() {
            Some(d) => d.stop(scope, node, value),
            None => Ok(()),
        }
    }
}

struct FileCtx<'f> {
    file: &'f File,
    scope: Scope<'f, 'f>,
}

impl<'f> FileCtx<'f> {
    fn new(file: &'f File) -> Self {
        let (scope, _) = file_scope(file);
        FileCtx { file, scope }
    }
}

#[derive(Default)]
struct Frame {
    bindings: Vec<(String, Value)>,
}

impl Frame {
    fn get(&self, name: &str) -> Option<Value> {
        for (k, v) in self.bindings.iter().rev() {
            if k == name {
                return Some(v.clone());
            }
        }
        None
    }

    fn set(&mut self, name: String, v: Value) {
        self.bindings.push((name, v));
    }
}

type AliasCb<'c> = dyn FnMut(&CallStmt, &Value) + 'c;

fn resolve_imports(sess: &mut Session, ctx: &FileCtx<'_>) -> Result<()> {
    if sess.resolver.is_none() {
        // unresolved imports only fail if a qualified call reaches them
        return Ok(());
    }
    for im in ctx.file.imports() {
        let frame = Frame::default();
        let mut noop = |_: &CallStmt, _: &Value| {};
        let v = eval_block(sess, ctx, ObjType::Fs, &im.from.body, &frame, &mut noop)?;
        let st = match v {
            Value::Fs(st) => st,
            other => bail!("ERROR_IMPORT import {} source is {}", im.name.name, other.type_name()),
        };
        let resolved = match &sess.resolver {
            Some(r) => r
                .resolve(&im.name.name, &st)
                .map_err(|e| anyhow!("ERROR_IMPORT {}: {}", im.name.name, e))?,
            None => unreachable!(),
        };
        sess.imports.insert(im.name.name.clone(), Rc::new(resolved));
    }
    Ok(())
}

fn eval_func_call(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    fd: &FuncDecl,
    args: Vec<Value>,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    if sess.depth >= sess.max_depth {
        bail!("ERROR_EVAL_DEPTH recursion limit exceeded");
    }
    if args.len() != fd.params.len() {
        bail!("ERROR_EVAL wrong arity for {}", fd.name.name);
    }
    let body = fd
        .body
        .as_ref()
        .ok_or_else(|| anyhow!("ERROR_EVAL {} has no body", fd.name.name))?;

    let mut frame = Frame::default();
    for (param, value) in fd.params.iter().zip(args) {
        frame.set(param.name.name.clone(), value);
    }

    sess.depth += 1;
    let result = if fd.ret.obj.is_option() {
        eval_option_block(sess, ctx, fd.ret.obj, body, &frame, ac).map(Value::Opts)
    } else {
        eval_block(sess, ctx, fd.ret.obj, body, &frame, ac)
    };
    sess.depth -= 1;
    result
}

// The block protocol: the accumulator starts at the identity for the block
// type, the first effective statement replaces it, every later statement
// transforms it. Debug calls are skipped after invoking the hook.
fn eval_block(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    typ: ObjType,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    let calls = block.calls();
    let mut v = match typ {
        ObjType::Fs => Value::Fs(State::scratch()),
        ObjType::Str => Value::Str(String::new()),
        _ => bail!("ERROR_EVAL cannot evaluate {} block", typ.as_str()),
    };

    let mut index = None;
    for (i, call) in calls.iter().copied().enumerate() {
        if builtin::is_debug(stmt_name(call)) {
            sess.debug(&ctx.scope, DebugNode::Call(call), Some(&v))?;
            continue;
        }
        index = Some(i);
        break;
    }
    let Some(index) = index else { return Ok(v) };

    let source = calls[index];
    sess.debug(&ctx.scope, DebugNode::Call(source), Some(&v))?;
    v = eval_source_stmt(sess, ctx, typ, source, frame, &mut *ac)?;
    if source.alias.is_some() {
        ac(source, &v);
    }

    for call in calls[index + 1..].iter().copied() {
        sess.debug(&ctx.scope, DebugNode::Call(call), Some(&v))?;
        if builtin::is_debug(stmt_name(call)) {
            continue;
        }
        v = eval_chain_stmt(sess, ctx, typ, call, v, frame, &mut *ac)?;
        if call.alias.is_some() {
            ac(call, &v);
        }
    }

    Ok(v)
}

fn eval_source_stmt(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    typ: ObjType,
    call: &CallStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    if let Some(qualifier) = &call.func.qualifier {
        return eval_import_call(sess, ctx, qualifier, &call.func.name, &call.args, frame, ac);
    }

    if let Some(sig) = builtin::lookup(typ, &call.func.name) {
        if sig.source {
            return match typ {
                ObjType::Fs => eval_fs_source(sess, ctx, call, frame, ac),
                ObjType::Str => eval_str_source(sess, ctx, call, frame, ac),
                _ => bail!("ERROR_EVAL {} block cannot have sources", typ.as_str()),
            };
        }
    }

    if let Some(v) = frame.get(&call.func.name) {
        return Ok(v);
    }
    match ctx.scope.lookup(&call.func.name) {
        Some(Obj { node: NodeRef::Func(fd), .. }) => {
            let vals = eval_args(sess, ctx, &fd.params, &call.args, frame, &mut *ac)?;
            let mut noop = |_: &CallStmt, _: &Value| {};
            eval_func_call(sess, ctx, fd, vals, &mut noop)
        }
        Some(Obj { node: node @ NodeRef::Alias { .. }, .. }) => {
            let NodeRef::Alias { func, .. } = node else { unreachable!() };
            let vals = eval_args(sess, ctx, &func.params, &call.args, frame, &mut *ac)?;
            eval_alias(sess, ctx, node, vals)
        }
        _ => bail!("ERROR_EVAL unbound identifier {}", call.func.name),
    }
}

// Builtin dispatch is by bare name; qualified calls always refer to imports.
fn stmt_name(call: &CallStmt) -> &str {
    if call.func.qualifier.is_some() {
        ""
    } else {
        call.func.name.as_str()
    }
}

fn arg<'e>(call: &'e CallStmt, i: usize) -> Result<&'e Expr> {
    call.args
        .get(i)
        .ok_or_else(|| anyhow!("ERROR_EVAL missing argument {} to {}", i, call.func.name))
}

fn eval_fs_source(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    call: &CallStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    match call.func.name.as_str() {
        "scratch" => Ok(Value::Fs(State::scratch())),
        "image" => {
            let reference = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionImage, frame, ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Image(o) => Some(o),
                _ => None,
            })?;
            Ok(Value::Fs(State::image(reference, opts)))
        }
        "http" => {
            let url = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionHttp, frame, ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Http(o) => Some(o),
                _ => None,
            })?;
            Ok(Value::Fs(State::http(url, opts)))
        }
        "git" => {
            let remote = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let reference = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionGit, frame, ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Git(o) => Some(o),
                _ => None,
            })?;
            Ok(Value::Fs(State::git(remote, reference, opts)))
        }
        "local" => {
            let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionLocal, frame, ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Local(o) => Some(o),
                _ => None,
            })?;
            let id = ident::source_id("local", &path, sess.local_seq);
            sess.local_seq += 1;
            sess.info.locals.insert(id.clone(), path);
            Ok(Value::Fs(State::local(id, opts)))
        }
        "generate" => {
            let input = eval_fs_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionGenerate, frame, ac)?;
            let mut opts = Vec::new();
            if !sess.frontend_caching {
                opts.push(FrontendOpt::IgnoreCache);
            }
            opts.extend(extract(items, |it| match it {
                OptItem::Frontend(o) => Some(o),
                _ => None,
            })?);
            Ok(Value::Fs(State::frontend(input, opts)))
        }
        name => bail!("ERROR_EVAL unknown fs source {}", name),
    }
}

fn eval_str_source(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    call: &CallStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    match call.func.name.as_str() {
        "value" => {
            let s = eval_string_expr(sess, ctx, arg(call, 0)?, frame, ac)?;
            Ok(Value::Str(s))
        }
        "format" => {
            let fmt = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let mut fmt_args = Vec::new();
            for a in &call.args[1..] {
                let v = eval_expr(sess, ctx, ObjType::Str, a, frame, &mut *ac)?;
                match v {
                    Value::Str(_) | Value::Int(_) => fmt_args.push(v),
                    other => bail!(
                        "ERROR_EVAL format argument must be string or int, found {}",
                        other.type_name()
                    ),
                }
            }
            Ok(Value::Str(sprintf(&fmt, &fmt_args)?))
        }
        name => bail!("ERROR_EVAL unknown string source {}", name),
    }
}

// printf-style expansion over evaluated arguments; %s, %d, and %% only.
fn sprintf(fmt: &str, args: &[Value]) -> Result<String> {
    let mut out = String::new();
    let mut chars = fmt.chars();
    let mut next = 0usize;
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('s') => {
                let v = args
                    .get(next)
                    .ok_or_else(|| anyhow!("ERROR_EVAL missing argument for %s"))?;
                next += 1;
                match v {
                    Value::Str(s) => out.push_str(s),
                    other => bail!("ERROR_EVAL %s requires a string, found {}", other.type_name()),
                }
            }
            Some('d') => {
                let v = args
                    .get(next)
                    .ok_or_else(|| anyhow!("ERROR_EVAL missing argument for %d"))?;
                next += 1;
                match v {
                    Value::Int(i) => out.push_str(&i.to_string()),
                    other => bail!("ERROR_EVAL %d requires an int, found {}", other.type_name()),
                }
            }
            Some(v) => bail!("ERROR_EVAL unsupported format verb %{}", v),
            None => bail!("ERROR_EVAL trailing % in format string"),
        }
    }
    if next != args.len() {
        bail!("ERROR_EVAL too many arguments for format string");
    }
    Ok(out)
}

fn eval_chain_stmt(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    typ: ObjType,
    call: &CallStmt,
    v: Value,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    if typ != ObjType::Fs {
        bail!("ERROR_EVAL {} blocks do not chain", typ.as_str());
    }
    if call.func.qualifier.is_some() {
        bail!(
            "ERROR_EVAL chain statement {} must be a builtin",
            call.func.display_name()
        );
    }
    let st = match v {
        Value::Fs(st) => st,
        other => bail!("ERROR_EVAL chain statement over {}", other.type_name()),
    };

    let st = match call.func.name.as_str() {
        "run" => {
            let command = if call.args.len() == 1 {
                let s = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let parts = shlex::split(&s)?;
                if parts.len() == 1 {
                    s
                } else {
                    shlex::join(&["/bin/sh".to_string(), "-c".to_string(), s])
                }
            } else {
                let mut words = Vec::with_capacity(call.args.len());
                for a in &call.args {
                    words.push(eval_string_expr(sess, ctx, a, frame, &mut *ac)?);
                }
                shlex::join(&words)
            };

            let items = with_items(sess, ctx, call, ObjType::OptionRun, frame, &mut *ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Exec(o) => Some(o),
                _ => None,
            })?;

            // aliased mounts in an inline option block capture the mount's
            // post-exec filesystem
            let mut aliased: Vec<(String, &CallStmt)> = Vec::new();
            if let Some(with) = &call.with {
                if let WithExpr::FuncLit(lit) = &with.expr {
                    for stmt in lit.body.calls() {
                        if stmt_name(stmt) != "mount" || stmt.alias.is_none() {
                            continue;
                        }
                        let target = eval_string_expr(sess, ctx, arg(stmt, 1)?, frame, &mut *ac)?;
                        aliased.push((target, stmt));
                    }
                }
            }

            let exec = st.run(command, opts);
            for (target, stmt) in aliased {
                let mount = Value::Fs(exec.get_mount(target));
                ac(stmt, &mount);
            }
            exec.root()
        }
        "env" => {
            let key = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let value = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
            st.add_env(key, value)
        }
        "dir" => {
            let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            st.dir(path)
        }
        "user" => {
            let name = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            st.user(name)
        }
        "entrypoint" => {
            let mut args = Vec::with_capacity(call.args.len());
            for a in &call.args {
                args.push(eval_string_expr(sess, ctx, a, frame, &mut *ac)?);
            }
            st.args(args)
        }
        "mkdir" => {
            let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let mode = eval_int_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)? as u32;
            let items = with_items(sess, ctx, call, ObjType::OptionMkdir, frame, &mut *ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Mkdir(o) => Some(o),
                _ => None,
            })?;
            st.file(FileAction::Mkdir { path, mode, opts })
        }
        "mkfile" => {
            let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let mode = eval_int_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)? as u32;
            let content = eval_string_expr(sess, ctx, arg(call, 2)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionMkfile, frame, &mut *ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Mkfile(o) => Some(o),
                _ => None,
            })?;
            st.file(FileAction::Mkfile { path, mode, content, opts })
        }
        "rm" => {
            let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionRm, frame, &mut *ac)?;
            let opts = extract(items, |it| match it {
                OptItem::Rm(o) => Some(o),
                _ => None,
            })?;
            st.file(FileAction::Rm { path, opts })
        }
        "copy" => {
            let input = eval_fs_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
            let src = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
            let dest = eval_string_expr(sess, ctx, arg(call, 2)?, frame, &mut *ac)?;
            let items = with_items(sess, ctx, call, ObjType::OptionCopy, frame, &mut *ac)?;
            let copy_opts = extract(items, |it| match it {
                OptItem::Copy(o) => Some(o),
                _ => None,
            })?;
            let (info, opts) = CopyInfo::split(copy_opts);
            st.file(FileAction::Copy { input, src, dest, info, opts })
        }
        name => bail!("ERROR_EVAL unknown chain statement {}", name),
    };

    Ok(Value::Fs(st))
}

fn with_items(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    call: &CallStmt,
    kind: ObjType,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let Some(with) = &call.with else { return Ok(Vec::new()) };
    match &with.expr {
        WithExpr::Ident(id) => match eval_ident_value(sess, ctx, id, frame, ac)? {
            Value::Opts(items) => Ok(items),
            other => bail!(
                "ERROR_TYPE expected {} options, found {}",
                kind.as_str(),
                other.type_name()
            ),
        },
        WithExpr::FuncLit(lit) => eval_option_block(sess, ctx, kind, &lit.body, frame, ac),
    }
}

fn extract<T>(items: Vec<OptItem>, f: impl Fn(OptItem) -> Option<T>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|it| {
            let kind = it.kind();
            f(it).ok_or_else(|| anyhow!("ERROR_TYPE mismatched {} option", kind))
        })
        .collect()
}

fn eval_option_block(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    kind: ObjType,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    match kind {
        ObjType::OptionImage => image_options(sess, ctx, block, frame, ac),
        ObjType::OptionHttp => http_options(sess, ctx, block, frame, ac),
        ObjType::OptionGit => git_options(sess, ctx, block, frame, ac),
        ObjType::OptionLocal => local_options(sess, ctx, block, frame, ac),
        ObjType::OptionGenerate => generate_options(sess, ctx, block, frame, ac),
        ObjType::OptionRun => exec_options(sess, ctx, block, frame, ac),
        ObjType::OptionSsh => ssh_options(sess, ctx, block, frame, ac),
        ObjType::OptionSecret => secret_options(sess, ctx, block, frame, ac),
        ObjType::OptionMount => mount_options(sess, ctx, block, frame, ac),
        ObjType::OptionMkdir => mkdir_options(sess, ctx, block, frame, ac),
        ObjType::OptionMkfile => mkfile_options(sess, ctx, block, frame, ac),
        ObjType::OptionRm => rm_options(sess, ctx, block, frame, ac),
        ObjType::OptionCopy => copy_options(sess, ctx, block, frame, ac),
        other => bail!("ERROR_EVAL {} does not take options", other.as_str()),
    }
}

// A statement in an option block that is not a builtin of the block's kind
// references a user-declared options value; its items are spliced in.
fn splice_option(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    kind: ObjType,
    call: &CallStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    if let Some(qualifier) = &call.func.qualifier {
        let v = eval_import_call(sess, ctx, qualifier, &call.func.name, &call.args, frame, ac)?;
        return match v {
            Value::Opts(items) => Ok(items),
            other => bail!(
                "ERROR_TYPE expected {} options, found {}",
                kind.as_str(),
                other.type_name()
            ),
        };
    }
    if let Some(v) = frame.get(&call.func.name) {
        return match v {
            Value::Opts(items) => Ok(items),
            other => bail!(
                "ERROR_TYPE expected {} options, found {}",
                kind.as_str(),
                other.type_name()
            ),
        };
    }
    match ctx.scope.lookup(&call.func.name) {
        Some(Obj { node: NodeRef::Func(fd), .. }) => {
            let vals = eval_args(sess, ctx, &fd.params, &call.args, frame, &mut *ac)?;
            let mut noop = |_: &CallStmt, _: &Value| {};
            match eval_func_call(sess, ctx, fd, vals, &mut noop)? {
                Value::Opts(items) => Ok(items),
                other => bail!(
                    "ERROR_TYPE expected {} options, found {}",
                    kind.as_str(),
                    other.type_name()
                ),
            }
        }
        _ => bail!("ERROR_EVAL unbound identifier {}", call.func.name),
    }
}

fn image_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "resolve" => {
                if maybe_bool(sess, ctx, call, frame, &mut *ac)? {
                    opts.push(OptItem::Image(ImageOpt::Resolve));
                }
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionImage, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn http_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "checksum" => {
                let digest = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Http(HttpOpt::Checksum(digest)));
            }
            "chmod" => {
                let mode = eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32;
                opts.push(OptItem::Http(HttpOpt::Chmod(mode)));
            }
            "filename" => {
                let name = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Http(HttpOpt::Filename(name)));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionHttp, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn git_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "keepGitDir" => {
                if maybe_bool(sess, ctx, call, frame, &mut *ac)? {
                    opts.push(OptItem::Git(GitOpt::KeepGitDir));
                }
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionGit, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn local_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        let name = stmt_name(call);
        match name {
            "includePatterns" | "excludePatterns" | "followPaths" => {
                let mut patterns = Vec::with_capacity(call.args.len());
                for a in &call.args {
                    patterns.push(eval_string_expr(sess, ctx, a, frame, &mut *ac)?);
                }
                let opt = match name {
                    "includePatterns" => LocalOpt::IncludePatterns(patterns),
                    "excludePatterns" => LocalOpt::ExcludePatterns(patterns),
                    _ => LocalOpt::FollowPaths(patterns),
                };
                opts.push(OptItem::Local(opt));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionLocal, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn generate_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "frontendInput" => {
                let key = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let input = eval_fs_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                opts.push(OptItem::Frontend(FrontendOpt::Input { key, input }));
            }
            "frontendOpt" => {
                let key = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let value = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                opts.push(OptItem::Frontend(FrontendOpt::Opt { key, value }));
            }
            _ => {
                opts.extend(splice_option(sess, ctx, ObjType::OptionGenerate, call, frame, &mut *ac)?)
            }
        }
    }
    Ok(opts)
}

fn exec_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "readonlyRootfs" => {
                if maybe_bool(sess, ctx, call, frame, &mut *ac)? {
                    opts.push(OptItem::Exec(ExecOpt::ReadonlyRootfs));
                }
            }
            "env" => {
                let key = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let value = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::Env { key, value }));
            }
            "dir" => {
                let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::Dir(path)));
            }
            "user" => {
                let name = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::User(name)));
            }
            "network" => {
                let mode = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::Network(NetMode::parse(&mode)?)));
            }
            "security" => {
                let mode = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::Security(SecurityMode::parse(&mode)?)));
            }
            "host" => {
                let host = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let address = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                opts.push(OptItem::Exec(ExecOpt::Host { host, address }));
            }
            "ssh" => {
                let items = with_items(sess, ctx, call, ObjType::OptionSsh, frame, &mut *ac)?;
                let ssh = extract(items, |it| match it {
                    OptItem::Ssh(o) => Some(o),
                    _ => None,
                })?;
                opts.push(OptItem::Exec(ExecOpt::Ssh(ssh)));
            }
            "secret" => {
                let target = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let items = with_items(sess, ctx, call, ObjType::OptionSecret, frame, &mut *ac)?;
                let secret = extract(items, |it| match it {
                    OptItem::Secret(o) => Some(o),
                    _ => None,
                })?;
                opts.push(OptItem::Exec(ExecOpt::Secret { target, opts: secret }));
            }
            "mount" => {
                let input = eval_fs_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let target = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                let items = with_items(sess, ctx, call, ObjType::OptionMount, frame, &mut *ac)?;
                let mount = extract(items, |it| match it {
                    OptItem::Mount(o) => Some(o),
                    _ => None,
                })?;
                opts.push(OptItem::Exec(ExecOpt::Mount { input, target, opts: mount }));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionRun, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn ssh_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    let mut target = None;
    let mut uid = None;
    let mut gid = None;
    let mut mode = None;
    for call in block.calls() {
        match stmt_name(call) {
            "target" => target = Some(eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?),
            "id" => {
                let id = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Ssh(SshOpt::Id(id)));
            }
            "uid" => uid = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            "gid" => gid = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            "mode" => mode = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionSsh, call, frame, &mut *ac)?),
        }
    }
    if target.is_some() || uid.is_some() || gid.is_some() || mode.is_some() {
        opts.push(OptItem::Ssh(SshOpt::Socket {
            target: target.unwrap_or_default(),
            uid: uid.unwrap_or(0),
            gid: gid.unwrap_or(0),
            mode: mode.unwrap_or(0),
        }));
    }
    Ok(opts)
}

fn secret_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    let mut uid = None;
    let mut gid = None;
    let mut mode = None;
    for call in block.calls() {
        match stmt_name(call) {
            "id" => {
                let id = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Secret(SecretOpt::Id(id)));
            }
            "uid" => uid = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            "gid" => gid = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            "mode" => mode = Some(eval_int_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)? as u32),
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionSecret, call, frame, &mut *ac)?),
        }
    }
    if uid.is_some() || gid.is_some() || mode.is_some() {
        opts.push(OptItem::Secret(SecretOpt::File {
            uid: uid.unwrap_or(0),
            gid: gid.unwrap_or(0),
            mode: mode.unwrap_or(0),
        }));
    }
    Ok(opts)
}

fn mount_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "readonly" => {
                if maybe_bool(sess, ctx, call, frame, &mut *ac)? {
                    opts.push(OptItem::Mount(MountOpt::Readonly));
                }
            }
            "tmpfs" => {
                if maybe_bool(sess, ctx, call, frame, &mut *ac)? {
                    opts.push(OptItem::Mount(MountOpt::Tmpfs));
                }
            }
            "sourcePath" => {
                let path = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Mount(MountOpt::SourcePath(path)));
            }
            "cache" => {
                let id = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                let mode = eval_string_expr(sess, ctx, arg(call, 1)?, frame, &mut *ac)?;
                let sharing = CacheSharing::parse(&mode)?;
                opts.push(OptItem::Mount(MountOpt::Cache { id, sharing }));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionMount, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn mkdir_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "createParents" => {
                let v = maybe_bool(sess, ctx, call, frame, &mut *ac)?;
                opts.push(OptItem::Mkdir(MkdirOpt::CreateParents(v)));
            }
            "chown" => {
                let owner = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Mkdir(MkdirOpt::Chown(owner)));
            }
            "createdTime" => {
                let t = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Mkdir(MkdirOpt::CreatedTime(rfc3339::parse(&t)?)));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionMkdir, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn mkfile_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "chown" => {
                let owner = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Mkfile(MkfileOpt::Chown(owner)));
            }
            "createdTime" => {
                let t = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Mkfile(MkfileOpt::CreatedTime(rfc3339::parse(&t)?)));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionMkfile, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn rm_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        match stmt_name(call) {
            "allowNotFound" => {
                let v = maybe_bool(sess, ctx, call, frame, &mut *ac)?;
                opts.push(OptItem::Rm(RmOpt::AllowNotFound(v)));
            }
            "allowWildcard" => {
                let v = maybe_bool(sess, ctx, call, frame, &mut *ac)?;
                opts.push(OptItem::Rm(RmOpt::AllowWildcard(v)));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionRm, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn copy_options(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    block: &BlockStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<OptItem>> {
    let mut opts = Vec::new();
    for call in block.calls() {
        let name = stmt_name(call);
        match name {
            "followSymlinks" | "contentsOnly" | "unpack" | "createDestPath" | "allowWildcards"
            | "allowEmptyWildcard" => {
                let v = maybe_bool(sess, ctx, call, frame, &mut *ac)?;
                let opt = match name {
                    "followSymlinks" => CopyOpt::FollowSymlinks(v),
                    "contentsOnly" => CopyOpt::ContentsOnly(v),
                    "unpack" => CopyOpt::Unpack(v),
                    "createDestPath" => CopyOpt::CreateDestPath(v),
                    "allowWildcards" => CopyOpt::AllowWildcards(v),
                    _ => CopyOpt::AllowEmptyWildcard(v),
                };
                opts.push(OptItem::Copy(opt));
            }
            "chown" => {
                let owner = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Copy(CopyOpt::Chown(owner)));
            }
            "createdTime" => {
                let t = eval_string_expr(sess, ctx, arg(call, 0)?, frame, &mut *ac)?;
                opts.push(OptItem::Copy(CopyOpt::CreatedTime(rfc3339::parse(&t)?)));
            }
            _ => opts.extend(splice_option(sess, ctx, ObjType::OptionCopy, call, frame, &mut *ac)?),
        }
    }
    Ok(opts)
}

fn eval_expr(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    want: ObjType,
    expr: &Expr,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    match expr {
        Expr::Ident(id) => {
            // a bare identifier may name a nullary source builtin, e.g.
            // mount scratch "/m"
            if id.qualifier.is_none()
                && want == ObjType::Fs
                && id.name == "scratch"
                && frame.get(&id.name).is_none()
                && ctx.scope.lookup(&id.name).is_none()
            {
                return Ok(Value::Fs(State::scratch()));
            }
            eval_ident_value(sess, ctx, id, frame, ac)
        }
        Expr::Lit(lit) => Ok(match lit {
            BasicLit::Str(l) => Value::Str(l.value.clone()),
            BasicLit::Decimal(l) => Value::Int(l.value),
            BasicLit::Numeric(l) => Value::Int(l.value),
            BasicLit::Bool(l) => Value::Bool(l.value),
        }),
        Expr::Func(lit) => {
            let typ = lit.typ.obj;
            if typ.is_option() {
                let kind = if typ == ObjType::Option { want } else { typ };
                if kind == ObjType::Option || !kind.is_option() {
                    bail!("ERROR_EVAL option literal without a kind");
                }
                eval_option_block(sess, ctx, kind, &lit.body, frame, ac).map(Value::Opts)
            } else {
                eval_block(sess, ctx, typ, &lit.body, frame, ac)
            }
        }
    }
}

fn eval_ident_value(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    id: &Ident,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    if let Some(qualifier) = &id.qualifier {
        return eval_import_call(sess, ctx, qualifier, &id.name, &[], frame, ac);
    }
    if let Some(v) = frame.get(&id.name) {
        return Ok(v);
    }
    match ctx.scope.lookup(&id.name) {
        Some(Obj { node: NodeRef::Func(fd), .. }) => {
            let mut noop = |_: &CallStmt, _: &Value| {};
            eval_func_call(sess, ctx, fd, Vec::new(), &mut noop)
        }
        Some(Obj { node: node @ NodeRef::Alias { .. }, .. }) => eval_alias(sess, ctx, node, Vec::new()),
        _ => Err(anyhow!("ERROR_EVAL unbound identifier {}", id.display_name())),
    }
}

// Referencing an alias re-evaluates its enclosing function with a callback
// that captures the value produced at the aliased statement. Statements are
// identified by their unique start offset.
fn eval_alias(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    node: NodeRef<'_>,
    args: Vec<Value>,
) -> Result<Value> {
    let NodeRef::Alias { decl, func, call, .. } = node else {
        bail!("ERROR_EVAL not an alias");
    };
    let key = call.pos.offset;
    let mut captured: Option<Value> = None;
    {
        let mut cb = |c: &CallStmt, v: &Value| {
            if c.pos.offset == key && captured.is_none() {
                captured = Some(v.clone());
            }
        };
        eval_func_call(sess, ctx, func, args, &mut cb)?;
    }
    captured.ok_or_else(|| anyhow!("ERROR_EVAL alias {} was not evaluated", decl.name.name))
}

fn eval_import_call(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    alias: &str,
    name: &str,
    args: &[Expr],
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Value> {
    let module = sess
        .imports
        .get(alias)
        .cloned()
        .ok_or_else(|| anyhow!("ERROR_IMPORT unresolved import {}", alias))?;
    if !module.exports().any(|e| e.name.name == name) {
        bail!("ERROR_IMPORT {} does not export {}", alias, name);
    }
    let fd = module
        .funcs()
        .find(|f| f.name.name == name)
        .ok_or_else(|| anyhow!("ERROR_IMPORT {} does not define {}", alias, name))?;

    let vals = eval_args(sess, ctx, &fd.params, args, frame, ac)?;
    let ictx = FileCtx::new(&module);
    let mut noop = |_: &CallStmt, _: &Value| {};
    eval_func_call(sess, &ictx, fd, vals, &mut noop)
}

fn eval_args(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    params: &[Field],
    args: &[Expr],
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<Vec<Value>> {
    if params.len() != args.len() {
        bail!("ERROR_EVAL wrong number of arguments");
    }
    let mut vals = Vec::with_capacity(args.len());
    for (param, a) in params.iter().zip(args) {
        vals.push(eval_expr(sess, ctx, param.typ.obj, a, frame, &mut *ac)?);
    }
    Ok(vals)
}

fn eval_string_expr(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    expr: &Expr,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<String> {
    match eval_expr(sess, ctx, ObjType::Str, expr, frame, ac)? {
        Value::Str(s) => Ok(s),
        other => bail!("ERROR_TYPE expected string, found {}", other.type_name()),
    }
}

fn eval_int_expr(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    expr: &Expr,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<i64> {
    match eval_expr(sess, ctx, ObjType::Int, expr, frame, ac)? {
        Value::Int(i) => Ok(i),
        other => bail!("ERROR_TYPE expected int, found {}", other.type_name()),
    }
}

fn eval_bool_expr(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    expr: &Expr,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<bool> {
    match eval_expr(sess, ctx, ObjType::Bool, expr, frame, ac)? {
        Value::Bool(b) => Ok(b),
        other => bail!("ERROR_TYPE expected bool, found {}", other.type_name()),
    }
}

fn eval_fs_expr(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    expr: &Expr,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<State> {
    match eval_expr(sess, ctx, ObjType::Fs, expr, frame, ac)? {
        Value::Fs(st) => Ok(st),
        other => bail!("ERROR_TYPE expected fs, found {}", other.type_name()),
    }
}

// A bool option argument may be omitted; omission means true.
fn maybe_bool(
    sess: &mut Session,
    ctx: &FileCtx<'_>,
    call: &CallStmt,
    frame: &Frame,
    ac: &mut AliasCb<'_>,
) -> Result<bool> {
    match call.args.first() {
        None => Ok(true),
        Some(e) => eval_bool_expr(sess, ctx, e, frame, ac),
    }
}
