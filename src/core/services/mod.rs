pub mod backup_service;
pub mod remote_path;
pub mod session;
pub mod sweep_service;
