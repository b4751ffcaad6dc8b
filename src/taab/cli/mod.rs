pub mod commands;
mod prompt;
mod render;
pub mod setup;
mod styles;
