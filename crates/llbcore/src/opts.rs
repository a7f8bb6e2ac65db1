use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::state::State;

/// Network mode for an exec. Unknown strings are rejected at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetMode {
    Unset,
    Host,
    Node,
}

impl NetMode {
    pub fn parse(s: &str) -> Result<Self> {
        Ok(match s {
            "unset" => NetMode::Unset,
            "host" => NetMode::Host,
            "node" => NetMode::Node,
            _ => bail!("ERROR_EVAL unknown network mode {:?}", s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityMode {
    Sandbox,
    Insecure,
}

impl SecurityMode {
    pub fn parse(s: &str) -> Result<Self> {
        Ok(match s {
            "sandbox" => SecurityMode::Sandbox,
            "insecure" => SecurityMode::Insecure,
            _ => bail!("ERROR_EVAL unknown security mode {:?}", s),
        })
    }
}

/// Sharing mode for a persistent cache mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheSharing {
    Shared,
    Private,
    Locked,
}

impl CacheSharing {
    pub fn parse(s: &str) -> Result<Self> {
        Ok(match s {
            "shared" => CacheSharing::Shared,
            "private" => CacheSharing::Private,
            "locked" => CacheSharing::Locked,
            _ => bail!("ERROR_EVAL unknown cache sharing mode {:?}", s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageOpt {
    Resolve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpOpt {
    Checksum(String),
    Chmod(u32),
    Filename(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GitOpt {
    KeepGitDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalOpt {
    IncludePatterns(Vec<String>),
    ExcludePatterns(Vec<String>),
    FollowPaths(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrontendOpt {
    IgnoreCache,
    Input { key: String, input: State },
    Opt { key: String, value: String },
}

/// Option item applied to a run exec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecOpt {
    ReadonlyRootfs,
    Env { key: String, value: String },
    Dir(String),
    User(String),
    Network(NetMode),
    Security(SecurityMode),
    // the address is carried verbatim; resolution happens downstream
    Host { host: String, address: String },
    Ssh(Vec<SshOpt>),
    Secret { target: String, opts: Vec<SecretOpt> },
    Mount { input: State, target: String, opts: Vec<MountOpt> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SshOpt {
    Id(String),
    Socket { target: String, uid: u32, gid: u32, mode: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretOpt {
    Id(String),
    File { uid: u32, gid: u32, mode: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountOpt {
    Readonly,
    Tmpfs,
    SourcePath(String),
    Cache { id: String, sharing: CacheSharing },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MkdirOpt {
    CreateParents(bool),
    Chown(String),
    // epoch seconds, parsed from RFC 3339
    CreatedTime(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MkfileOpt {
    Chown(String),
    CreatedTime(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RmOpt {
    AllowNotFound(bool),
    AllowWildcard(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyOpt {
    FollowSymlinks(bool),
    ContentsOnly(bool),
    Unpack(bool),
    CreateDestPath(bool),
    AllowWildcards(bool),
    AllowEmptyWildcard(bool),
    Chown(String),
    CreatedTime(i64),
}
