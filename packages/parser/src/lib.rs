pub mod ast;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser};
pub use tokenizer::{tokenize, Token};
