pub mod ast;
pub mod builtin;
pub mod canon;
pub mod check;
pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod scope;

pub use canon::print_file;
pub use check::check_file;
pub use error::{Diagnostic, Pos};
pub use eval::{generate, Debugger, GenInfo, GenOptions, ImportResolver, NoopDebugger};
pub use parse::{parse_file, Parsed};
