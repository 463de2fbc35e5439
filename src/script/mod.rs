//! Layout scripts: a small statement language driving the construction API
//!
//! ```text
//! margins 10 10 10 10
//! let a = anchor(left_margin, 40)
//! stub "OK" (80, 24) at cell(0, 0)
//! stub at (row_top(1), a, null, right_margin)
//! ```

pub mod ast;
mod grammar;
pub mod interp;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
pub use interp::{run_script, Interpreter, BUILTIN_NAMES};
