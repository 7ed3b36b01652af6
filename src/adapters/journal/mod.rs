pub mod json_journal;
