//! Application use cases

pub mod dispatch;
pub mod memory;
pub mod negotiate_command;
pub mod run_turn;
