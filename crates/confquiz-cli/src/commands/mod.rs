pub mod health;
pub mod init;
pub mod play;
pub mod show;
