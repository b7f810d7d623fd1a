pub mod board;
pub mod config;
pub mod task;
pub mod user;

pub use board::*;
pub use config::*;
pub use task::*;
pub use user::*;
