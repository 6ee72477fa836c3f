pub mod export;
pub mod games;
pub mod status;
pub mod watch;
