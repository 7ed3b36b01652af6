pub mod channel;
pub mod journal;
pub mod parsers;
