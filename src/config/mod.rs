pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;

pub use toml_config::{
    ApiConfig, AppConfig, ImportConfig, ListConfig, StorageConfig, DEFAULT_CONFIG_FILE,
};

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, InviteAction, JobAction, ListArgs, RecoverAction, UserAction};
