use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskgrid_cli::cli::{Cli, Command, parse_filter_spec, parse_sort_direction, parse_sort_field};
use taskgrid_core::config::{self, Config};
use taskgrid_core::error::AppError;
use taskgrid_core::grid::{TaskDraft, TaskGrid};
use taskgrid_core::model::Task;
use taskgrid_core::source::{self, Source};
use taskgrid_core::view::{PageSpec, SortDirection, SortSpec, TaskPage};

struct Session {
    grid: TaskGrid,
    source: Source,
    default_page_size: u32,
    interactive: bool,
}

impl Session {
    fn start(source: Source, default_page_size: u32, interactive: bool) -> Self {
        let mut grid = TaskGrid::from_tasks(source::load_or_empty(&source));
        grid.set_page_size(default_page_size);
        Self {
            grid,
            source,
            default_page_size,
            interactive,
        }
    }

    /// Fetch the source again and start over: collection and view state
    /// both reset, local changes are gone.
    fn reload(&mut self) {
        let mut grid = TaskGrid::from_tasks(source::load_or_empty(&self.source));
        grid.set_page_size(self.default_page_size);
        self.grid = grid;
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Due date")]
    due_date: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            created: task.timestamp_created.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            tag: task.tag.clone(),
            status: task.status.clone(),
        }
    }
}

fn print_page_plain(page: &TaskPage, spec: PageSpec) {
    let rows: Vec<TaskRow> = page.tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
    println!(
        "page {} of {} ({} total)",
        spec.number.max(1),
        page_count(page.total, spec.size),
        page.total
    );
}

fn page_count(total: usize, size: u32) -> usize {
    let size = size.max(1) as usize;
    total.div_ceil(size).max(1)
}

fn print_page_json(page: &TaskPage) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(page).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_line(task: &Task) {
    println!(
        "{} | {} | {} | {} | {} | {} | {}",
        task.id,
        dash(&task.timestamp_created),
        dash(&task.title),
        dash(&task.description),
        dash(&task.due_date),
        dash(&task.tag),
        dash(&task.status),
    );
}

fn dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn print_current_page(session: &Session, json: bool) -> Result<(), AppError> {
    let page = session.grid.render();
    if json {
        print_page_json(&page)
    } else {
        print_page_plain(&page, session.grid.state().page);
        Ok(())
    }
}

fn rerender(session: &Session, json: bool) -> Result<(), AppError> {
    if session.interactive && !json {
        print_current_page(session, false)?;
    }
    Ok(())
}

fn merge_required(new: Option<String>, current: String, name: &str) -> Result<String, AppError> {
    match new {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(AppError::invalid_input(format!("{name} is required")));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(current),
    }
}

fn merge_clearable(new: Option<String>, current: String) -> String {
    match new {
        Some(value) => value.trim().to_string(),
        None => current,
    }
}

fn apply_view_args(
    session: &mut Session,
    search: Option<String>,
    filters: Vec<String>,
    sort: Option<String>,
    order: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<(), AppError> {
    if let Some(text) = search {
        session.grid.set_search(text);
    }

    for spec in filters {
        let parsed = parse_filter_spec(&spec).map_err(AppError::invalid_input)?;
        session.grid.set_filter(parsed.field, parsed.value);
    }

    if let Some(column) = sort {
        let field = parse_sort_field(&column).map_err(AppError::invalid_input)?;
        let direction = match order.as_deref() {
            Some(raw) => parse_sort_direction(raw).map_err(AppError::invalid_input)?,
            None => SortDirection::Ascend,
        };
        session.grid.set_sort(SortSpec { field, direction });
    } else if order.is_some() {
        return Err(AppError::invalid_input("--order requires --sort"));
    }

    if let Some(number) = page {
        if number == 0 {
            return Err(AppError::invalid_input("page number starts at 1"));
        }
        session.grid.set_page(number);
    }

    if let Some(size) = page_size {
        if size == 0 {
            return Err(AppError::invalid_input("page size must be at least 1"));
        }
        session.grid.set_page_size(size);
    }

    Ok(())
}

fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::List {
            search,
            filters,
            sort,
            order,
            page,
            page_size,
        } => {
            apply_view_args(session, search, filters, sort, order, page, page_size)?;
            print_current_page(session, cli.json)?;
        }
        Command::Search { text } => {
            session.grid.set_search(text.unwrap_or_default());
            print_current_page(session, cli.json)?;
        }
        Command::Filter { specs } => {
            if specs.is_empty() {
                session.grid.clear_filters();
            } else {
                for spec in specs {
                    let parsed = parse_filter_spec(&spec).map_err(AppError::invalid_input)?;
                    session.grid.set_filter(parsed.field, parsed.value);
                }
            }
            print_current_page(session, cli.json)?;
        }
        Command::Sort { column, direction } => {
            match column {
                Some(column) => {
                    let field = parse_sort_field(&column).map_err(AppError::invalid_input)?;
                    let direction = match direction.as_deref() {
                        Some(raw) => parse_sort_direction(raw).map_err(AppError::invalid_input)?,
                        None => SortDirection::Ascend,
                    };
                    session.grid.set_sort(SortSpec { field, direction });
                }
                None => session.grid.clear_sort(),
            }
            print_current_page(session, cli.json)?;
        }
        Command::Page { number, size } => {
            if number == 0 {
                return Err(AppError::invalid_input("page number starts at 1"));
            }
            if size == Some(0) {
                return Err(AppError::invalid_input("page size must be at least 1"));
            }
            session.grid.set_page(number);
            if let Some(size) = size {
                session.grid.set_page_size(size);
            }
            print_current_page(session, cli.json)?;
        }
        Command::Add {
            title,
            description,
            due_date,
            tag,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = session.grid.add_task(TaskDraft {
                title,
                description,
                due_date,
                tag,
            })?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
            rerender(session, cli.json)?;
        }
        Command::Edit {
            id,
            title,
            description,
            due_date,
            tag,
        } => {
            if title.is_none() && description.is_none() && due_date.is_none() && tag.is_none() {
                return Err(AppError::invalid_input("nothing to edit"));
            }

            let current = session.grid.task(id)?.clone();
            let replacement = Task {
                id: current.id,
                title: merge_required(title, current.title, "title")?,
                description: merge_required(description, current.description, "description")?,
                due_date: merge_clearable(due_date, current.due_date),
                tag: merge_clearable(tag, current.tag),
                status: current.status,
                timestamp_created: current.timestamp_created,
            };

            let task = session.grid.edit_task(id, replacement)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
            rerender(session, cli.json)?;
        }
        Command::Delete { id } => {
            let task = session.grid.delete_task(id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
            rerender(session, cli.json)?;
        }
        Command::Show { id } => {
            let task = session.grid.task(id)?;
            if cli.json {
                print_task_json(task)?;
            } else {
                print_task_line(task);
            }
        }
        Command::Reload => {
            if let Some(raw) = cli.source.as_deref() {
                session.source = Source::parse(raw);
            }
            session.reload();
            print_current_page(session, cli.json)?;
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // an empty quoted token is still a token
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(current.clone());
                current.clear();
            }
            quoted = false;
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let source = source::resolve(None, config);
    let mut session = Session::start(source, config.page_size, true);

    print_current_page(&session, false)?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskgrid".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut session, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let config_load = config::load_config_with_fallback();
    if let Some(err) = config_load.error.as_ref() {
        eprintln!("WARNING: {}", err);
    }
    let config = config_load.config;

    if interactive {
        if let Err(err) = run_interactive(&config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.use_stderr() {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
            err.exit()
        }
    };

    let source = source::resolve(cli.source.as_deref(), &config);
    let mut session = Session::start(source, config.page_size, false);
    if let Err(err) = run_command(&mut session, cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
