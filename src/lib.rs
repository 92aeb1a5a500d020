pub mod ast;
pub mod ast_printer;
pub mod checker;
pub mod environment;
pub mod error;
pub mod parser;
pub mod reader;
pub mod scanner;
pub mod token;

use ast::Block;
use checker::Checker;
use error::Result;
use parser::Parser;

/// Parse a whole program held in memory.
pub fn parse_source(src: &str) -> Result<Block> {
    Parser::from_source(src)?.parse()
}

/// Parse and check a whole program held in memory, returning the tree on success.
pub fn check_source(src: &str) -> Result<Block> {
    let program = parse_source(src)?;
    Checker::new().check(&program)?;
    Ok(program)
}
