use serde::{Deserialize, Serialize};

use crate::opts::{
    CopyOpt, ExecOpt, FrontendOpt, GitOpt, HttpOpt, ImageOpt, LocalOpt, MkdirOpt, MkfileOpt,
    MountOpt, RmOpt, SecretOpt, SshOpt,
};
use crate::state::State;

/// Semantic value produced by evaluating a block or expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Fs(State),
    Str(String),
    Int(i64),
    Bool(bool),
    Opts(Vec<OptItem>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Fs(_) => "fs",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Opts(_) => "option",
        }
    }
}

/// A single option item, tagged with the builtin family it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptItem {
    Image(ImageOpt),
    Http(HttpOpt),
    Git(GitOpt),
    Local(LocalOpt),
    Frontend(FrontendOpt),
    Exec(ExecOpt),
    Ssh(SshOpt),
    Secret(SecretOpt),
    Mount(MountOpt),
    Mkdir(MkdirOpt),
    Mkfile(MkfileOpt),
    Rm(RmOpt),
    Copy(CopyOpt),
}

impl OptItem {
    pub fn kind(&self) -> &'static str {
        match self {
            OptItem::Image(_) => "image",
            OptItem::Http(_) => "http",
            OptItem::Git(_) => "git",
            OptItem::Local(_) => "local",
            OptItem::Frontend(_) => "generate",
            OptItem::Exec(_) => "run",
            OptItem::Ssh(_) => "ssh",
            OptItem::Secret(_) => "secret",
            OptItem::Mount(_) => "mount",
            OptItem::Mkdir(_) => "mkdir",
            OptItem::Mkfile(_) => "mkfile",
            OptItem::Rm(_) => "rm",
            OptItem::Copy(_) => "copy",
        }
    }
}
