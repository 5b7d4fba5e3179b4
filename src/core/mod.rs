mod config;
mod error;
mod path;

pub use config::TreeConfig;
pub use error::FtError;
pub use path::FtPath;

pub type Result<T> = std::result::Result<T, FtError>;
