pub mod builder;
pub mod tokenizer;

pub use builder::build_commands;
pub use tokenizer::tokenize;
