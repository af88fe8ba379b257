mod config;
mod io;
mod ir;

pub use config::ConfigError;
pub use io::IoError;
pub use ir::IrError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
