// LLB core: the build-graph value model emitted by the code generator.
pub mod canon;
pub mod ident;
pub mod opts;
pub mod rfc3339;
pub mod shlex;
pub mod state;
pub mod value;

pub use canon::encode_state_json;
pub use opts::{
    CacheSharing, CopyOpt, ExecOpt, FrontendOpt, GitOpt, HttpOpt, ImageOpt, LocalOpt, MkdirOpt,
    MkfileOpt, MountOpt, NetMode, RmOpt, SecretOpt, SecurityMode, SshOpt,
};
pub use state::{CopyInfo, Exec, FileAction, Op, State};
pub use value::{OptItem, Value};
