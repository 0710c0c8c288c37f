use serde::{Deserialize, Serialize};

/// One row of the task table, in the camelCase shape the remote endpoint
/// serves. Every field except `id` defaults to an empty string so sparse
/// remote items still deserialize; an empty field never matches a non-empty
/// search or filter and sorts before any non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp_created: String,
}
