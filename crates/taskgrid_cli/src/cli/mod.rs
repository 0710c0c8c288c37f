use clap::{Parser, Subcommand};
use taskgrid_core::view::{FilterField, SortDirection, SortField};

#[derive(Parser, Debug)]
#[command(name = "taskgrid", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task source: an http(s) endpoint or a JSON file path
    #[arg(long, value_name = "ENDPOINT_OR_PATH", global = true)]
    pub source: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the task table
    ///
    /// Example: taskgrid list --search milk --sort due-date --order descend
    /// Example: taskgrid list --filter tag=school --page 2
    List {
        /// Text matched against title, description and tag
        #[arg(long)]
        search: Option<String>,
        /// Exact-match column filter, repeatable (columns: title,
        /// description, due-date, tag)
        #[arg(long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,
        /// Column to sort by (created, title, description, due-date, tag,
        /// status)
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,
        /// Sort direction: ascend or descend
        #[arg(long, value_name = "DIRECTION")]
        order: Option<String>,
        /// Page number, starting at 1
        #[arg(long, value_name = "N")]
        page: Option<u32>,
        /// Rows per page
        #[arg(long = "page-size", value_name = "N")]
        page_size: Option<u32>,
    },
    /// Set the search text, or clear it
    ///
    /// Example: taskgrid search milk
    Search {
        text: Option<String>,
    },
    /// Set column filters, or clear them all
    ///
    /// Example: taskgrid filter tag=school
    /// Example: taskgrid filter tag= (clears the tag filter)
    Filter {
        #[arg(value_name = "COLUMN=VALUE")]
        specs: Vec<String>,
    },
    /// Sort by a column, or clear the sort
    ///
    /// Example: taskgrid sort due-date descend
    Sort {
        column: Option<String>,
        direction: Option<String>,
    },
    /// Jump to a page, optionally changing the page size
    ///
    /// Example: taskgrid page 2
    /// Example: taskgrid page 1 10
    Page {
        number: u32,
        size: Option<u32>,
    },
    /// Add a task
    ///
    /// Example: taskgrid add "Buy milk" --tag errands --due 30/08/2026
    Add {
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "due", value_name = "DATE", default_value = "")]
        due_date: String,
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// Replace fields of a task
    ///
    /// Example: taskgrid edit 3 --title "Buy oat milk"
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "due", value_name = "DATE")]
        due_date: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: taskgrid delete 3
    Delete {
        id: u64,
    },
    /// Show one task
    ///
    /// Example: taskgrid show 3
    Show {
        id: u64,
    },
    /// Fetch the source again, discarding every local change
    ///
    /// Example: taskgrid reload
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub field: FilterField,
    pub value: String,
}

/// Parse a raw `COLUMN=VALUE` filter into a structured column filter. An
/// empty value clears that column's filter.
pub fn parse_filter_spec(raw: &str) -> Result<ParsedFilter, String> {
    let trimmed = raw.trim();
    let (column_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "filter must be in COLUMN=VALUE format".to_string())?;

    let field = parse_filter_field(column_raw)?;
    Ok(ParsedFilter {
        field,
        value: value_raw.trim().to_string(),
    })
}

pub fn parse_filter_field(name: &str) -> Result<FilterField, String> {
    match canonical_column_name(name).as_deref() {
        Some("title") => Ok(FilterField::Title),
        Some("description") => Ok(FilterField::Description),
        Some("due" | "due_date" | "duedate") => Ok(FilterField::DueDate),
        Some("tag") => Ok(FilterField::Tag),
        _ => Err(format!("unknown filter column '{}'", name.trim())),
    }
}

pub fn parse_sort_field(name: &str) -> Result<SortField, String> {
    match canonical_column_name(name).as_deref() {
        Some("created" | "timestamp_created" | "timestampcreated") => {
            Ok(SortField::TimestampCreated)
        }
        Some("title") => Ok(SortField::Title),
        Some("description") => Ok(SortField::Description),
        Some("due" | "due_date" | "duedate") => Ok(SortField::DueDate),
        Some("tag") => Ok(SortField::Tag),
        Some("status") => Ok(SortField::Status),
        _ => Err(format!("unknown sort column '{}'", name.trim())),
    }
}

pub fn parse_sort_direction(name: &str) -> Result<SortDirection, String> {
    match canonical_column_name(name).as_deref() {
        Some("ascend" | "asc" | "ascending") => Ok(SortDirection::Ascend),
        Some("descend" | "desc" | "descending") => Ok(SortDirection::Descend),
        _ => Err(format!("unknown sort direction '{}'", name.trim())),
    }
}

fn canonical_column_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
