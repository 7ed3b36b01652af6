pub mod ini_parser;
pub mod toml_parser;
