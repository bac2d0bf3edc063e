pub mod cli;
pub mod launcher;
pub mod scanner;
pub mod ui;
