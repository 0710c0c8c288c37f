use crate::config::Config;
use crate::error::AppError;
use crate::model::Task;
use crate::remote;
use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};

pub const SOURCE_ENV_VAR: &str = "TASKGRID_SOURCE";

/// Where the task list comes from: an http(s) endpoint, or a local JSON
/// file standing in for one. File sources are read once and never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(endpoint) => f.write_str(endpoint),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Pick the source: `--source` flag first, then `TASKGRID_SOURCE`, then the
/// configured endpoint.
pub fn resolve(flag: Option<&str>, config: &Config) -> Source {
    resolve_from(
        flag,
        std::env::var(SOURCE_ENV_VAR).ok().as_deref(),
        config,
    )
}

fn resolve_from(flag: Option<&str>, env: Option<&str>, config: &Config) -> Source {
    let raw = flag
        .filter(|value| !value.trim().is_empty())
        .or(env.filter(|value| !value.trim().is_empty()))
        .unwrap_or(config.endpoint.as_str());
    let raw = if raw.trim().is_empty() {
        remote::DEFAULT_ENDPOINT
    } else {
        raw
    };

    let source = Source::parse(raw);
    debug!("task source: {source}");
    source
}

pub fn load(source: &Source) -> Result<Vec<Task>, AppError> {
    match source {
        Source::Remote(endpoint) => remote::fetch_tasks(endpoint),
        Source::File(path) => read_tasks(path),
    }
}

/// Load semantics for startup and reload: any failure leaves the table
/// empty and the program running. The cause is only visible through the
/// `warn` log.
pub fn load_or_empty(source: &Source) -> Vec<Task> {
    match load(source) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!("task load from {source} failed, starting empty: {err}");
            Vec::new()
        }
    }
}

fn read_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Source, load, load_or_empty, resolve_from};
    use crate::config::Config;
    use crate::remote;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskgrid-{nanos}-{file_name}"))
    }

    #[test]
    fn parse_detects_remote_and_file_sources() {
        assert_eq!(
            Source::parse("https://example.test/todos"),
            Source::Remote("https://example.test/todos".to_string())
        );
        assert_eq!(
            Source::parse("http://127.0.0.1:8080/todos"),
            Source::Remote("http://127.0.0.1:8080/todos".to_string())
        );
        assert_eq!(
            Source::parse("/tmp/tasks.json"),
            Source::File(PathBuf::from("/tmp/tasks.json"))
        );
    }

    #[test]
    fn resolve_prefers_flag_then_env_then_config() {
        let config = Config {
            endpoint: "https://config.test/todos".to_string(),
            ..Config::default()
        };

        let from_flag = resolve_from(Some("flag.json"), Some("env.json"), &config);
        assert_eq!(from_flag, Source::File(PathBuf::from("flag.json")));

        let from_env = resolve_from(None, Some("env.json"), &config);
        assert_eq!(from_env, Source::File(PathBuf::from("env.json")));

        let from_config = resolve_from(None, None, &config);
        assert_eq!(
            from_config,
            Source::Remote("https://config.test/todos".to_string())
        );
    }

    #[test]
    fn resolve_skips_blank_values() {
        let config = Config {
            endpoint: String::new(),
            ..Config::default()
        };

        let source = resolve_from(Some("  "), Some(""), &config);
        assert_eq!(source, Source::Remote(remote::DEFAULT_ENDPOINT.to_string()));
    }

    #[test]
    fn load_reads_a_task_array_from_a_file() {
        let path = temp_path("source-load.json");
        let content = serde_json::json!([
            {
                "id": 1,
                "title": "Buy milk",
                "description": "semi skimmed",
                "dueDate": "28/08/2026",
                "tag": "errands",
                "status": "OPEN",
                "timestampCreated": "20/08/2026 09:15:00"
            },
            { "id": 2, "title": "sparse item" }
        ]);
        std::fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();

        let tasks = load(&Source::File(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].due_date, "28/08/2026");
        assert_eq!(tasks[0].timestamp_created, "20/08/2026 09:15:00");
        assert_eq!(tasks[1].tag, "");
    }

    #[test]
    fn load_reports_missing_file() {
        let path = temp_path("source-missing.json");
        let err = load(&Source::File(path)).unwrap_err();
        assert_eq!(err.code(), "io_error");
    }

    #[test]
    fn load_reports_malformed_json() {
        let path = temp_path("source-bad.json");
        std::fs::write(&path, "{ not json ").unwrap();

        let err = load(&Source::File(path.clone())).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn load_or_empty_swallows_failures() {
        let path = temp_path("source-swallowed.json");
        let tasks = load_or_empty(&Source::File(path));
        assert!(tasks.is_empty());
    }
}
