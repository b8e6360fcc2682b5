pub mod grade;
pub mod init;
pub mod media;
pub mod show;
pub mod smoke;
pub mod validate;
