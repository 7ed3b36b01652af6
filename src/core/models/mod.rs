pub mod backup_config;
pub mod backup_target;
pub mod connection;
pub mod journal_entry;
pub mod outcome;
