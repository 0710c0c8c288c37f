use crate::error::AppError;
use crate::model::Task;
use crate::view::{self, FilterField, Filters, SortSpec, TaskPage, ViewState};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Status stamped onto every newly added task.
pub const NEW_TASK_STATUS: &str = "OPEN";

/// User-supplied fields for a new task. Everything else is generated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub tag: String,
}

/// The in-memory task table: the loaded collection plus the view state the
/// next render is computed from. Nothing here is ever written back to the
/// source; dropping the grid discards every change.
#[derive(Debug, Default)]
pub struct TaskGrid {
    tasks: Vec<Task>,
    state: ViewState,
}

impl TaskGrid {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            state: ViewState::default(),
        }
    }

    /// Replace the whole collection, keeping the view state.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn task(&self, id: u64) -> Result<&Task, AppError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))
    }

    /// Append a task with a generated id, `OPEN` status and a local
    /// `DD/MM/YYYY HH:mm:ss` creation stamp.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task, AppError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let task = Task {
            id: self.next_id()?,
            title: title.to_string(),
            description: draft.description,
            due_date: draft.due_date,
            tag: draft.tag,
            status: NEW_TASK_STATUS.to_string(),
            timestamp_created: creation_stamp()?,
        };

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Replace the task whose id matches with `replacement`, leaving every
    /// other entry untouched.
    pub fn edit_task(&mut self, id: u64, replacement: Task) -> Result<Task, AppError> {
        if replacement.id != id {
            return Err(AppError::invalid_input("replacement id must match"));
        }

        let slot = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))?;

        *slot = replacement;
        Ok(slot.clone())
    }

    pub fn delete_task(&mut self, id: u64) -> Result<Task, AppError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))?;

        Ok(self.tasks.remove(index))
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.state.filters.set(field, value);
    }

    pub fn clear_filters(&mut self) {
        self.state.filters = Filters::default();
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.state.sort = Some(spec);
    }

    pub fn clear_sort(&mut self) {
        self.state.sort = None;
    }

    pub fn set_page(&mut self, number: u32) {
        self.state.page.number = number;
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.state.page.size = size;
    }

    /// Recompute the visible page from the current collection and view state.
    pub fn render(&self) -> TaskPage {
        view::apply(&self.tasks, &self.state)
    }

    fn next_id(&self) -> Result<u64, AppError> {
        self.tasks
            .iter()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| AppError::invalid_data("task ids exhausted"))
    }
}

fn creation_stamp() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let format = format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");
    now.format(&format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
