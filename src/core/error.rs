use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiodomeError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),

    #[error("Invalid species config in {file}: {reason}")]
    InvalidSpeciesConfig { file: String, reason: String },

    #[error("Behavior not declared by species: {0}")]
    UnknownBehavior(String),

    #[error("Species {name} is a {class} species and cannot be spawned as {wanted}")]
    WrongSpeciesClass {
        name: String,
        class: &'static str,
        wanted: &'static str,
    },

    #[error("Position outside the terrain grid: ({x}, {y})")]
    OutOfBounds { x: i32, y: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BiodomeError>;
