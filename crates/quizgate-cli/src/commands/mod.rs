pub mod check;
pub mod context;
pub mod init;
