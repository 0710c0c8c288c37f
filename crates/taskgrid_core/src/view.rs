use crate::model::Task;

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Columns the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    TimestampCreated,
    Title,
    Description,
    DueDate,
    Tag,
    Status,
}

impl SortField {
    fn value_of(self, task: &Task) -> &str {
        match self {
            Self::TimestampCreated => &task.timestamp_created,
            Self::Title => &task.title,
            Self::Description => &task.description,
            Self::DueDate => &task.due_date,
            Self::Tag => &task.tag,
            Self::Status => &task.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascend,
    Descend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Columns that accept an exact-match filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    Description,
    DueDate,
    Tag,
}

/// One optional filter value per filterable column. An empty value disables
/// that column's filter; active filters are combined with AND.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filters {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub tag: String,
}

impl Filters {
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Title => self.title = value,
            FilterField::Description => self.description = value,
            FilterField::DueDate => self.due_date = value,
            FilterField::Tag => self.tag = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.due_date.is_empty()
            && self.tag.is_empty()
    }

    fn matches(&self, task: &Task) -> bool {
        field_matches(&self.title, &task.title)
            && field_matches(&self.description, &task.description)
            && field_matches(&self.due_date, &task.due_date)
            && field_matches(&self.tag, &task.tag)
    }
}

fn field_matches(filter: &str, value: &str) -> bool {
    filter.is_empty() || filter.to_lowercase() == value.to_lowercase()
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub number: u32,
    pub size: u32,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The four independent view-state variables. Each one may change at any
/// time without touching the others; the rendered page is recomputed from
/// scratch on every render.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub filters: Filters,
    pub sort: Option<SortSpec>,
    pub page: PageSpec,
}

/// One rendered page plus the length of the filtered and sorted sequence
/// it was sliced from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: usize,
}

pub fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let needle = needle.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
        || task.tag.to_lowercase().contains(&needle)
}

/// Sort by the field's display value. The comparator is total, so equal
/// keys may land in any order.
pub fn sort_tasks(tasks: &mut [Task], spec: SortSpec) {
    tasks.sort_unstable_by(|a, b| {
        let ordering = spec.field.value_of(a).cmp(spec.field.value_of(b));
        match spec.direction {
            SortDirection::Ascend => ordering,
            SortDirection::Descend => ordering.reverse(),
        }
    });
}

/// Apply search, filters, sort and pagination in that order. `total` is
/// taken before slicing, so the pager reflects the whole filtered sequence
/// and a page past the end comes back empty with `total` unchanged.
pub fn apply(tasks: &[Task], state: &ViewState) -> TaskPage {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_search(task, &state.search))
        .filter(|task| state.filters.matches(task))
        .cloned()
        .collect();

    if let Some(spec) = state.sort {
        sort_tasks(&mut visible, spec);
    }

    let total = visible.len();
    let tasks = page_slice(visible, state.page);

    TaskPage { tasks, total }
}

fn page_slice(tasks: Vec<Task>, page: PageSpec) -> Vec<Task> {
    let size = page.size as usize;
    let start = size.saturating_mul((page.number.max(1) - 1) as usize);
    tasks.into_iter().skip(start).take(size).collect()
}
