//! Interactive menu loop

use std::io::{BufRead, Write};
use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};
use tracing::warn;

use crate::console::Console;
use crate::task::{is_storable_text, Category, DueDate, MenuOption, Priority, Status, Task};
use crate::task_store::{Filter, NewTask, TaskEdit, TaskStore};
use crate::{Error, Result};

const MAIN_MENU: &str = "\nPlease choose an option:\n\
1. Create New Task\n\
2. View All Tasks\n\
3. Edit Task\n\
4. Delete Task\n\
5. Save Tasks\n\
6. Load Tasks\n\
7. Search/Filter Tasks\n\
8. Exit";

const SEARCH_MENU: &str = "Search and Filter Options:\n\
1. By Category\n\
2. By Priority\n\
3. By Status";

const CHOICE_PROMPT: &str = "Enter your choice: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Create,
    ViewAll,
    Edit,
    Delete,
    Save,
    Load,
    Search,
    Exit,
}

impl MenuChoice {
    fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::Create),
            2 => Some(Self::ViewAll),
            3 => Some(Self::Edit),
            4 => Some(Self::Delete),
            5 => Some(Self::Save),
            6 => Some(Self::Load),
            7 => Some(Self::Search),
            8 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// One interactive run over a task store.
pub struct Session<'a, R, W> {
    store: &'a mut TaskStore,
    console: Console<R, W>,
    default_file: Option<PathBuf>,
    today: DueDate,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, console: Console<R, W>) -> Self {
        Self {
            store,
            console,
            default_file: None,
            today: DueDate::today(),
        }
    }

    pub fn with_default_file(mut self, path: Option<PathBuf>) -> Self {
        self.default_file = path;
        self
    }

    /// Overrides the date used for overdue reminders.
    pub fn with_today(mut self, today: DueDate) -> Self {
        self.today = today;
        self
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs the menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.console.say("Welcome to TaskMaster!")?;
        self.console.say("-----------------------")?;
        self.remind_overdue()?;

        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(Error::InputClosed) => {
                    self.console.say("Exiting TaskMaster. Goodbye!")?;
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Handles one menu selection. Returns `false` once the user exits.
    fn step(&mut self) -> Result<bool> {
        self.console.say(MAIN_MENU)?;
        let choice = self.console.prompt_number(CHOICE_PROMPT)?;
        match choice.and_then(MenuChoice::from_choice) {
            Some(MenuChoice::Create) => self.create_task()?,
            Some(MenuChoice::ViewAll) => self.view_tasks()?,
            Some(MenuChoice::Edit) => self.edit_task()?,
            Some(MenuChoice::Delete) => self.delete_task()?,
            Some(MenuChoice::Save) => self.save_tasks()?,
            Some(MenuChoice::Load) => self.load_tasks()?,
            Some(MenuChoice::Search) => self.search_tasks()?,
            Some(MenuChoice::Exit) => {
                self.console.say("Exiting TaskMaster. Goodbye!")?;
                return Ok(false);
            }
            None => self.console.failure("Invalid choice. Please try again.")?,
        }
        Ok(true)
    }

    fn create_task(&mut self) -> Result<()> {
        let title = self.prompt_text("Enter Task Title: ")?;
        let description = self.prompt_text("Enter Task Description: ")?;
        let category = self.choose::<Category>()?;
        let priority = self.choose::<Priority>()?;
        let due_date = loop {
            let input = self.console.prompt("Enter Due Date (YYYY-MM-DD): ")?;
            match parse_due_date(&input) {
                Some(date) => break date,
                None => self
                    .console
                    .failure("Invalid date format. Please try again.")?,
            }
        };

        let created = self.store.create(NewTask {
            title,
            description,
            category,
            priority,
            due_date,
        });
        match created {
            Ok(task) => {
                let message = format!("Task \"{}\" has been created successfully!", task.title);
                self.console.success(&message)
            }
            Err(Error::IdsExhausted) => self
                .console
                .failure("No task ids left. Delete tasks and load a smaller file."),
            Err(err) => Err(err),
        }
    }

    fn view_tasks(&mut self) -> Result<()> {
        if self.store.list().is_empty() {
            return self.console.say("No tasks available.");
        }
        let tasks: Vec<&Task> = self.store.list().iter().collect();
        let lines = render_table("Tasks", &tasks, &self.today, self.console.width());
        for line in lines {
            self.console.say(line)?;
        }
        self.remind_overdue()
    }

    fn edit_task(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("Enter Task ID to edit: ")? else {
            return self.console.failure("Task not found.");
        };
        let Some(current) = self.store.get(id).cloned() else {
            return self.console.failure("Task not found.");
        };

        self.console
            .say(format!("Editing Task \"{}\"", current.title))?;

        let mut edit = TaskEdit::default();
        let title = self.prompt_text("Enter new title (leave empty to keep current): ")?;
        if !title.is_empty() {
            edit.title = Some(title);
        }
        let description =
            self.prompt_text("Enter new description (leave empty to keep current): ")?;
        if !description.is_empty() {
            edit.description = Some(description);
        }
        edit.category = self.choose_or_keep(current.category)?;
        edit.priority = self.choose_or_keep(current.priority)?;

        let input = self
            .console
            .prompt("Enter new Due Date (YYYY-MM-DD) (leave empty to keep current): ")?;
        if !input.is_empty() {
            match parse_due_date(&input) {
                Some(date) => edit.due_date = Some(date),
                None => self
                    .console
                    .failure("Invalid date format. Keeping current due date.")?,
            }
        }

        edit.status = self.choose_or_keep(current.status)?;

        match self.store.edit(id, edit) {
            Ok(_) => self.console.success("Task updated successfully!"),
            Err(Error::TaskNotFound(_)) => self.console.failure("Task not found."),
            Err(err) => Err(err),
        }
    }

    fn delete_task(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("Enter Task ID to delete: ")? else {
            return self.console.failure("Task not found.");
        };
        match self.store.delete(id) {
            Ok(_) => self.console.success("Task deleted successfully."),
            Err(Error::TaskNotFound(_)) => self.console.failure("Task not found."),
            Err(err) => Err(err),
        }
    }

    fn save_tasks(&mut self) -> Result<()> {
        let Some(path) = self.prompt_path("Enter filename to save tasks: ")? else {
            return Ok(());
        };
        match self.store.save(&path) {
            Ok(()) => self
                .console
                .success(&format!("Tasks saved successfully to {}.", path.display())),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save failed");
                self.console
                    .failure(&format!("Error saving tasks to {}: {err}", path.display()))
            }
        }
    }

    fn load_tasks(&mut self) -> Result<()> {
        let Some(path) = self.prompt_path("Enter filename to load tasks: ")? else {
            return Ok(());
        };
        self.load_from(path)
    }

    /// Loads `path` and reports the outcome, keeping the current tasks on failure.
    pub fn load_from(&mut self, path: PathBuf) -> Result<()> {
        match self.store.load(&path) {
            Ok(report) => {
                for skipped in &report.skipped {
                    self.console.warning(&format!(
                        "Skipped record {}: {}",
                        skipped.position, skipped.error
                    ))?;
                }
                self.console
                    .success(&format!("Tasks loaded successfully from {}.", path.display()))
            }
            Err(Error::Io(err)) => {
                warn!(path = %path.display(), error = %err, "load failed");
                self.console
                    .failure(&format!("Error opening file for reading: {err}"))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "load failed");
                self.console
                    .failure(&format!("Error reading tasks from {}: {err}", path.display()))
            }
        }
    }

    fn search_tasks(&mut self) -> Result<()> {
        self.console.say(SEARCH_MENU)?;
        let criterion = self.console.prompt_number(CHOICE_PROMPT)?;
        let filter = match criterion {
            Some(1) => self.choose_once::<Category>()?.map(Filter::Category),
            Some(2) => self.choose_once::<Priority>()?.map(Filter::Priority),
            Some(3) => self.choose_once::<Status>()?.map(Filter::Status),
            _ => None,
        };
        let Some(filter) = filter else {
            return self.console.failure("Invalid choice.");
        };

        let results = self.store.filter(filter);
        if results.is_empty() {
            return self.console.say("No tasks match the criteria.");
        }
        let lines = render_table("Search Results", &results, &self.today, self.console.width());
        for line in lines {
            self.console.say(line)?;
        }
        Ok(())
    }

    fn remind_overdue(&mut self) -> Result<()> {
        let reminders: Vec<String> = self
            .store
            .overdue(&self.today)
            .iter()
            .map(|t| format!("Reminder: task {} \"{}\" was due {}.", t.id, t.title, t.due_date))
            .collect();
        for reminder in reminders {
            self.console.warning(&reminder)?;
        }
        Ok(())
    }

    /// Reads a title or description, re-prompting while it contains the field
    /// separator or a line break.
    fn prompt_text(&mut self, message: &str) -> Result<String> {
        loop {
            let text = self.console.prompt(message)?;
            if is_storable_text(&text) {
                return Ok(text);
            }
            self.console
                .failure("Text cannot contain '|' or line breaks. Please try again.")?;
        }
    }

    fn prompt_id(&mut self, message: &str) -> Result<Option<u32>> {
        let id = self.console.prompt_number(message)?;
        Ok(id.and_then(|id| u32::try_from(id).ok()))
    }

    /// Reads a filename; an empty answer falls back to the default file.
    fn prompt_path(&mut self, message: &str) -> Result<Option<PathBuf>> {
        let message = match &self.default_file {
            Some(path) => format!("{} [{}] ", message.trim_end(), path.display()),
            None => message.to_string(),
        };
        let input = self.console.prompt(&message)?;
        let input = input.trim();
        if !input.is_empty() {
            return Ok(Some(PathBuf::from(input)));
        }
        if let Some(path) = &self.default_file {
            return Ok(Some(path.clone()));
        }
        self.console.failure("No filename given.")?;
        Ok(None)
    }

    fn print_options<T: MenuOption>(&mut self, heading: &str) -> Result<()> {
        self.console.say(heading)?;
        for (index, option) in T::ALL.iter().enumerate() {
            self.console.say(format!("{}. {}", index + 1, option))?;
        }
        Ok(())
    }

    /// Asks until a valid option is picked.
    fn choose<T: MenuOption>(&mut self) -> Result<T> {
        loop {
            if let Some(option) = self.choose_once::<T>()? {
                return Ok(option);
            }
            self.console.failure("Invalid choice. Please try again.")?;
        }
    }

    fn choose_once<T: MenuOption>(&mut self) -> Result<Option<T>> {
        self.print_options::<T>(&format!("Choose {}:", T::LABEL))?;
        let choice = self.console.prompt_number(CHOICE_PROMPT)?;
        Ok(choice.and_then(T::from_choice))
    }

    /// Out-of-range or empty answers keep the current value.
    fn choose_or_keep<T: MenuOption>(&mut self, current: T) -> Result<Option<T>> {
        self.print_options::<T>(&format!("Choose {} (current: {}):", T::LABEL, current))?;
        let choice = self
            .console
            .prompt_number("Enter your choice (0 to keep current): ")?;
        Ok(choice.and_then(T::from_choice))
    }
}

/// A due date typed at a prompt: the `YYYY-MM-DD` shape and nothing that
/// would split the stored line.
fn parse_due_date(input: &str) -> Option<DueDate> {
    if !is_storable_text(input) {
        return None;
    }
    DueDate::parse(input).ok()
}

/// Draws `tasks` as a bordered table and returns the rows as plain text.
///
/// Overdue due dates are suffixed with `!`.
pub fn render_table(title: &str, tasks: &[&Task], today: &DueDate, width: u16) -> Vec<String> {
    let header = Row::new(vec![
        "ID",
        "Title",
        "Description",
        "Category",
        "Priority",
        "Due Date",
        "Status",
    ]);
    let rows = tasks.iter().map(|task| {
        let due = if task.is_overdue(today) {
            format!("{}!", task.due_date)
        } else {
            task.due_date.to_string()
        };
        Row::new(vec![
            Cell::from(task.id.to_string()),
            Cell::from(task.title.clone()),
            Cell::from(task.description.clone()),
            Cell::from(task.category.name()),
            Cell::from(task.priority.name()),
            Cell::from(due),
            Cell::from(task.status.name()),
        ])
    });
    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));

    let height = u16::try_from(tasks.len() + 3).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    Widget::render(table, area, &mut buffer);

    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| &buffer[(x, y)])
                .filter(|cell| !cell.skip)
                .map(|cell| cell.symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
