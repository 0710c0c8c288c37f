use crate::error::AppError;
use crate::model::Task;

/// Endpoint queried when no source is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";

fn build_client() -> Result<reqwest::blocking::Client, AppError> {
    reqwest::blocking::Client::builder()
        .build()
        .map_err(|err| AppError::network(err.to_string()))
}

/// One unconditional GET for the whole task list. Items may omit any field
/// except `id`; unknown fields are ignored.
pub fn fetch_tasks(endpoint: &str) -> Result<Vec<Task>, AppError> {
    let client = build_client()?;
    let response = client
        .get(endpoint)
        .send()
        .map_err(|err| AppError::network(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::network(format!("{endpoint} returned {status}")));
    }

    response
        .json::<Vec<Task>>()
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
