pub mod cursor;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod trace;
pub mod tree;

pub use cursor::Cursor;
pub use eval::{Environment, Interpreter};
pub use lex::Lexer;
pub use parse::Parser;
