pub mod digest;
pub mod dry_run_channel;
pub mod sftp_channel;
