use serde::{Deserialize, Serialize};

use crate::opts::{
    CopyOpt, ExecOpt, FrontendOpt, GitOpt, HttpOpt, ImageOpt, LocalOpt, MkdirOpt, MkfileOpt,
    RmOpt,
};

/// A build-graph state: an ordered chain of operations applied to an empty
/// filesystem. An empty chain is the scratch state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    Image { reference: String, opts: Vec<ImageOpt> },
    Http { url: String, opts: Vec<HttpOpt> },
    Git { remote: String, reference: String, opts: Vec<GitOpt> },
    Local { id: String, opts: Vec<LocalOpt> },
    Frontend { input: State, opts: Vec<FrontendOpt> },
    Run { command: String, opts: Vec<ExecOpt> },
    Env { key: String, value: String },
    Dir { path: String },
    User { name: String },
    Args { args: Vec<String> },
    File { action: FileAction },
    // Subgraph rooted at a mountpoint of an exec, addressable after the exec.
    MountSource { exec: Box<State>, target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileAction {
    Mkdir { path: String, mode: u32, opts: Vec<MkdirOpt> },
    Mkfile { path: String, mode: u32, content: String, opts: Vec<MkfileOpt> },
    Rm { path: String, opts: Vec<RmOpt> },
    Copy { input: State, src: String, dest: String, info: CopyInfo, opts: Vec<CopyOpt> },
}

/// Flags controlling how a copy action treats its source and destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CopyInfo {
    pub follow_symlinks: bool,
    pub copy_dir_contents_only: bool,
    pub attempt_unpack: bool,
    pub create_dest_path: bool,
    pub allow_wildcard: bool,
    pub allow_empty_wildcard: bool,
}

impl CopyInfo {
    /// Fold the boolean copy options into flags, returning the remainder.
    pub fn split(items: Vec<CopyOpt>) -> (CopyInfo, Vec<CopyOpt>) {
        let mut info = CopyInfo::default();
        let mut rest = Vec::new();
        for it in items {
            match it {
                CopyOpt::FollowSymlinks(v) => info.follow_symlinks = v,
                CopyOpt::ContentsOnly(v) => info.copy_dir_contents_only = v,
                CopyOpt::Unpack(v) => info.attempt_unpack = v,
                CopyOpt::CreateDestPath(v) => info.create_dest_path = v,
                CopyOpt::AllowWildcards(v) => info.allow_wildcard = v,
                CopyOpt::AllowEmptyWildcard(v) => info.allow_empty_wildcard = v,
                other => rest.push(other),
            }
        }
        (info, rest)
    }
}

impl State {
    pub fn scratch() -> Self {
        State::default()
    }

    pub fn is_scratch(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    fn source(op: Op) -> Self {
        State { ops: vec![op] }
    }

    pub fn image(reference: impl Into<String>, opts: Vec<ImageOpt>) -> Self {
        State::source(Op::Image { reference: reference.into(), opts })
    }

    pub fn http(url: impl Into<String>, opts: Vec<HttpOpt>) -> Self {
        State::source(Op::Http { url: url.into(), opts })
    }

    pub fn git(remote: impl Into<String>, reference: impl Into<String>, opts: Vec<GitOpt>) -> Self {
        State::source(Op::Git {
            remote: remote.into(),
            reference: reference.into(),
            opts,
        })
    }

    pub fn local(id: impl Into<String>, opts: Vec<LocalOpt>) -> Self {
        State::source(Op::Local { id: id.into(), opts })
    }

    pub fn frontend(input: State, opts: Vec<FrontendOpt>) -> Self {
        State::source(Op::Frontend { input, opts })
    }

    /// Append a run op, yielding an exec whose root and mountpoints are
    /// addressable states.
    pub fn run(mut self, command: impl Into<String>, opts: Vec<ExecOpt>) -> Exec {
        self.ops.push(Op::Run { command: command.into(), opts });
        Exec { root: self }
    }

    pub fn add_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(Op::Env { key: key.into(), value: value.into() });
        self
    }

    pub fn dir(mut self, path: impl Into<String>) -> Self {
        self.ops.push(Op::Dir { path: path.into() });
        self
    }

    pub fn user(mut self, name: impl Into<String>) -> Self {
        self.ops.push(Op::User { name: name.into() });
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.ops.push(Op::Args { args });
        self
    }

    pub fn file(mut self, action: FileAction) -> Self {
        self.ops.push(Op::File { action });
        self
    }
}

/// The result of running a command on a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Exec {
    root: State,
}

impl Exec {
    /// The root filesystem after the exec.
    pub fn root(&self) -> State {
        self.root.clone()
    }

    /// The filesystem mounted at target, observed after the exec. Mounts are
    /// unique by mountpoint.
    pub fn get_mount(&self, target: impl Into<String>) -> State {
        State {
            ops: vec![Op::MountSource {
                exec: Box::new(self.root.clone()),
                target: target.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_is_empty() {
        assert!(State::scratch().is_scratch());
        assert_eq!(State::scratch().ops().len(), 0);
    }

    #[test]
    fn chain_appends_in_order() {
        let st = State::image("alpine", vec![])
            .add_env("K", "v")
            .dir("/src");
        assert_eq!(st.ops().len(), 3);
        assert!(matches!(st.ops()[0], Op::Image { .. }));
        assert!(matches!(st.ops()[2], Op::Dir { .. }));
    }

    #[test]
    fn exec_mount_roots_subgraph() {
        let exec = State::image("alpine", vec![]).run("true", vec![]);
        let mount = exec.get_mount("/m");
        match &mount.ops()[0] {
            Op::MountSource { exec: inner, target } => {
                assert_eq!(target, "/m");
                assert!(matches!(inner.ops().last(), Some(Op::Run { .. })));
            }
            other => panic!("expected mount source, got {:?}", other),
        }
    }
}
