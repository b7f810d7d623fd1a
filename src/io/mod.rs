pub mod board_client;
pub mod config_io;
pub mod logging;
pub mod paths;
pub mod remote;
pub mod session;
pub mod state;
