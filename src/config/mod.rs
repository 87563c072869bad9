//! Configuration and CLI handling

pub mod cli;
pub mod file;
pub mod settings;

pub use cli::Cli;
pub use file::ConfigFile;
pub use settings::Settings;
