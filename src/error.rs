// src/error.rs

use thiserror::Error;

use crate::engine_lib::scene_types::PartTag;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("required scene part missing: {0}")]
    MissingPart(PartTag),

    #[error("model import failed: {0}")]
    Model(#[from] gltf::Error),

    #[error("model contains no scene nodes")]
    EmptyModel,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("window error: {0}")]
    Window(String),

    #[error("GPU setup failed: {0}")]
    Gpu(String),
}

impl From<toml::de::Error> for ViewerError {
    fn from(err: toml::de::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}
