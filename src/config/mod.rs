pub mod console;

pub use console::ConsoleConfig;
