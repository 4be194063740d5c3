use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be between 1x1 and {max}x{max} cells, got {width}x{height}")]
    BoardSize { width: u16, height: u16, max: u16 },
    #[error("start length {length} does not fit west of the centre of a {width}-wide board")]
    StartLength { length: u32, width: u16 },
    #[error("growth per food must be between 1 and {max}, got {growth}")]
    Growth { growth: u32, max: u32 },
    #[error("{name} must be a non-zero number of milliseconds")]
    ZeroInterval { name: &'static str },
    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to initialise logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
