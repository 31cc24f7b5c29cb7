use leon::{ParseError, RenderError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter {}.", .0)]
    MissingInput(String),

    #[error("A command needs at least an executable name.")]
    EmptyCommand,

    #[error("A process is already running. Cancel it or wait for it to finish.")]
    AlreadyRunning,

    #[error("Failed to start `{}`: {}", .program, .original)]
    Spawn {
        program: String,
        original: std::io::Error,
    },

    #[error("Failed to cancel process: {}", .0)]
    Kill(std::io::Error),

    #[error("SRA Toolkit not found ({}). Please ensure it's installed and in your PATH.", .0)]
    ToolkitNotFound(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error parsing argument template: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error rendering argument template: {}", .0)]
    Render(#[from] RenderError),

    #[error("Terminal IO error: {}", .0)]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub fn missing_input(what: &str) -> Self {
        Self::MissingInput(what.to_string())
    }

    pub fn spawn_error(program: &str, original: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            original,
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
