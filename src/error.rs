use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Malformed meal record: {0}")]
    MalformedMeal(String),

    #[error("Lock error: {0}")]
    Lock(String),
}
