pub mod check;
pub mod config;
pub mod list;
pub mod play;
pub mod practice;
pub mod show;
