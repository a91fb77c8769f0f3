use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Short message suitable for the status line of the shell.
    pub fn to_status_string(&self) -> String {
        match self {
            Self::Anyhow(_) => "Could not load trip data".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Contract violations between views, presenters and the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unable to create event listener: `{0}` is not an element")]
    InvalidTarget(String),

    #[error("Can't replace a view that is not mounted")]
    NotMounted,

    #[error("Presenter has not been initialized")]
    NotInitialized,
}

/// Rejected form input. The form shakes instead of submitting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown destination: '{0}'")]
    UnknownDestination(String),

    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Event ends before it starts")]
    DateOrder,

    #[error("Invalid price: '{0}'")]
    InvalidPrice(String),

    #[error("No event type selected")]
    MissingType,
}

pub type AppResult<T> = Result<T, AppError>;
