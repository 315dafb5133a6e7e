#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    #[error("Renderer '{name}' is not available (known renderers: {known})")]
    RendererUnavailable { name: String, known: String },

    #[error("Invalid datetime format: '{0}'")]
    InvalidDatetimeFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
