//! The builtin registry: one data-driven table describing every built-in
//! callable, shared by the type checker and the evaluator.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::ast::ObjType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    Required,
    // a trailing bool that may be omitted; omission means true
    OptionalBool,
    Variadic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub typ: ObjType,
    pub mode: ParamMode,
}

#[derive(Debug, Clone)]
pub struct BuiltinSig {
    pub params: Vec<Param>,
    pub ret: ObjType,
    pub option_kind: Option<ObjType>,
    pub source: bool,
}

impl BuiltinSig {
    /// Whether n arguments satisfy the parameter list.
    pub fn arity_ok(&self, n: usize) -> bool {
        let required = self
            .params
            .iter()
            .filter(|p| p.mode == ParamMode::Required)
            .count();
        let open_ended = self
            .params
            .iter()
            .any(|p| matches!(p.mode, ParamMode::Variadic));
        let optional = self
            .params
            .iter()
            .filter(|p| p.mode == ParamMode::OptionalBool)
            .count();
        if open_ended {
            n >= required
        } else {
            n >= required && n <= required + optional
        }
    }

    /// The parameter governing argument position i.
    pub fn param_at(&self, i: usize) -> Option<&Param> {
        if i < self.params.len() {
            return self.params.get(i);
        }
        match self.params.last() {
            Some(p) if p.mode == ParamMode::Variadic => Some(p),
            _ => None,
        }
    }
}

/// Debug-family builtins: evaluated as a hook invocation and skipped.
pub const DEBUGS: &[&str] = &["breakpoint"];

pub fn is_debug(name: &str) -> bool {
    DEBUGS.contains(&name)
}

type Table = BTreeMap<ObjType, BTreeMap<&'static str, BuiltinSig>>;

fn p(typ: ObjType) -> Param {
    Param { typ, mode: ParamMode::Required }
}

fn ob() -> Param {
    Param { typ: ObjType::Bool, mode: ParamMode::OptionalBool }
}

fn var(typ: ObjType) -> Param {
    Param { typ, mode: ParamMode::Variadic }
}

fn ins(
    m: &mut Table,
    recv: ObjType,
    name: &'static str,
    params: Vec<Param>,
    ret: ObjType,
    option_kind: Option<ObjType>,
    source: bool,
) {
    let sig = BuiltinSig { params, ret, option_kind, source };
    m.entry(recv).or_default().insert(name, sig);
}

fn build() -> Table {
    use ObjType::*;
    let mut m: Table = BTreeMap::new();

    // fs source builtins
    ins(&mut m, Fs, "scratch", vec![], Fs, None, true);
    ins(&mut m, Fs, "image", vec![p(Str)], Fs, Some(OptionImage), true);
    ins(&mut m, Fs, "http", vec![p(Str)], Fs, Some(OptionHttp), true);
    ins(&mut m, Fs, "git", vec![p(Str), p(Str)], Fs, Some(OptionGit), true);
    ins(&mut m, Fs, "local", vec![p(Str)], Fs, Some(OptionLocal), true);
    ins(&mut m, Fs, "generate", vec![p(Fs)], Fs, Some(OptionGenerate), true);

    // fs chain builtins
    ins(&mut m, Fs, "run", vec![var(Str)], Fs, Some(OptionRun), false);
    ins(&mut m, Fs, "env", vec![p(Str), p(Str)], Fs, None, false);
    ins(&mut m, Fs, "dir", vec![p(Str)], Fs, None, false);
    ins(&mut m, Fs, "user", vec![p(Str)], Fs, None, false);
    ins(&mut m, Fs, "entrypoint", vec![var(Str)], Fs, None, false);
    ins(&mut m, Fs, "mkdir", vec![p(Str), p(Int)], Fs, Some(OptionMkdir), false);
    ins(&mut m, Fs, "mkfile", vec![p(Str), p(Int), p(Str)], Fs, Some(OptionMkfile), false);
    ins(&mut m, Fs, "rm", vec![p(Str)], Fs, Some(OptionRm), false);
    ins(&mut m, Fs, "copy", vec![p(Fs), p(Str), p(Str)], Fs, Some(OptionCopy), false);

    // string source builtins
    ins(&mut m, Str, "value", vec![p(Str)], Str, None, true);
    ins(&mut m, Str, "format", vec![p(Str), var(Str)], Str, None, true);

    // debug family
    ins(&mut m, Fs, "breakpoint", vec![], Fs, None, false);
    ins(&mut m, Str, "breakpoint", vec![], Str, None, false);

    ins(&mut m, OptionImage, "resolve", vec![ob()], OptionImage, None, false);

    ins(&mut m, OptionHttp, "checksum", vec![p(Str)], OptionHttp, None, false);
    ins(&mut m, OptionHttp, "chmod", vec![p(Int)], OptionHttp, None, false);
    ins(&mut m, OptionHttp, "filename", vec![p(Str)], OptionHttp, None, false);

    ins(&mut m, OptionGit, "keepGitDir", vec![ob()], OptionGit, None, false);

    ins(&mut m, OptionLocal, "includePatterns", vec![var(Str)], OptionLocal, None, false);
    ins(&mut m, OptionLocal, "excludePatterns", vec![var(Str)], OptionLocal, None, false);
    ins(&mut m, OptionLocal, "followPaths", vec![var(Str)], OptionLocal, None, false);

    ins(&mut m, OptionGenerate, "frontendInput", vec![p(Str), p(Fs)], OptionGenerate, None, false);
    ins(&mut m, OptionGenerate, "frontendOpt", vec![p(Str), p(Str)], OptionGenerate, None, false);

    ins(&mut m, OptionRun, "readonlyRootfs", vec![ob()], OptionRun, None, false);
    ins(&mut m, OptionRun, "env", vec![p(Str), p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "dir", vec![p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "user", vec![p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "network", vec![p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "security", vec![p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "host", vec![p(Str), p(Str)], OptionRun, None, false);
    ins(&mut m, OptionRun, "ssh", vec![], OptionRun, Some(OptionSsh), false);
    ins(&mut m, OptionRun, "secret", vec![p(Str)], OptionRun, Some(OptionSecret), false);
    ins(&mut m, OptionRun, "mount", vec![p(Fs), p(Str)], OptionRun, Some(OptionMount), false);

    ins(&mut m, OptionSsh, "target", vec![p(Str)], OptionSsh, None, false);
    ins(&mut m, OptionSsh, "id", vec![p(Str)], OptionSsh, None, false);
    ins(&mut m, OptionSsh, "uid", vec![p(Int)], OptionSsh, None, false);
    ins(&mut m, OptionSsh, "gid", vec![p(Int)], OptionSsh, None, false);
    ins(&mut m, OptionSsh, "mode", vec![p(Int)], OptionSsh, None, false);

    ins(&mut m, OptionSecret, "id", vec![p(Str)], OptionSecret, None, false);
    ins(&mut m, OptionSecret, "uid", vec![p(Int)], OptionSecret, None, false);
    ins(&mut m, OptionSecret, "gid", vec![p(Int)], OptionSecret, None, false);
    ins(&mut m, OptionSecret, "mode", vec![p(Int)], OptionSecret, None, false);

    ins(&mut m, OptionMount, "readonly", vec![ob()], OptionMount, None, false);
    ins(&mut m, OptionMount, "tmpfs", vec![ob()], OptionMount, None, false);
    ins(&mut m, OptionMount, "sourcePath", vec![p(Str)], OptionMount, None, false);
    ins(&mut m, OptionMount, "cache", vec![p(Str), p(Str)], OptionMount, None, false);

    ins(&mut m, OptionMkdir, "createParents", vec![ob()], OptionMkdir, None, false);
    ins(&mut m, OptionMkdir, "chown", vec![p(Str)], OptionMkdir, None, false);
    ins(&mut m, OptionMkdir, "createdTime", vec![p(Str)], OptionMkdir, None, false);

    ins(&mut m, OptionMkfile, "chown", vec![p(Str)], OptionMkfile, None, false);
    ins(&mut m, OptionMkfile, "createdTime", vec![p(Str)], OptionMkfile, None, false);

    ins(&mut m, OptionRm, "allowNotFound", vec![ob()], OptionRm, None, false);
    ins(&mut m, OptionRm, "allowWildcard", vec![ob()], OptionRm, None, false);

    ins(&mut m, OptionCopy, "followSymlinks", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "contentsOnly", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "unpack", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "createDestPath", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "allowWildcards", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "allowEmptyWildcard", vec![ob()], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "chown", vec![p(Str)], OptionCopy, None, false);
    ins(&mut m, OptionCopy, "createdTime", vec![p(Str)], OptionCopy, None, false);

    m
}

fn registry() -> &'static Table {
    static REG: OnceLock<Table> = OnceLock::new();
    REG.get_or_init(build)
}

/// Look up a builtin under a receiver type.
pub fn lookup(recv: ObjType, name: &str) -> Option<&'static BuiltinSig> {
    registry().get(&recv)?.get(name)
}
