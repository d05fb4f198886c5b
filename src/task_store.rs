//! In-memory task collection
//!
//! Tasks are kept in insertion order and persisted as a whole, either as
//! pipe-delimited lines or, for `.json` paths, as a JSON array.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::task::{Category, DueDate, Priority, Status, Task, MAX_ID};
use crate::{Error, Result};

/// Fields supplied by the user when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: DueDate,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<DueDate>,
    pub status: Option<Status>,
}

/// Search criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Category(Category),
    Priority(Priority),
    Status(Status),
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match *self {
            Filter::Category(category) => task.category == category,
            Filter::Priority(priority) => task.priority == priority,
            Filter::Status(status) => task.status == status,
        }
    }
}

/// A record dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number, or array position for JSON files.
    pub position: usize,
    pub error: ParseError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// The id the next created task will receive.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Appends a pending task under the next id. Fails once the id space is
    /// used up.
    pub fn create(&mut self, new: NewTask) -> Result<&Task> {
        let id = self.next_id;
        if id > MAX_ID {
            return Err(Error::IdsExhausted);
        }
        self.next_id = id + 1;
        let task = Task {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            due_date: new.due_date,
            status: Status::Pending,
        };
        debug!(id, title = %task.title, "created task");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn edit(&mut self, id: u32, edit: TaskEdit) -> Result<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        if let Some(title) = edit.title {
            task.title = title;
        }
        if let Some(description) = edit.description {
            task.description = description;
        }
        if let Some(category) = edit.category {
            task.category = category;
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(due_date) = edit.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = edit.status {
            task.status = status;
        }
        debug!(id, "edited task");
        Ok(&*task)
    }

    /// Removes the task with `id`. Its id is not handed out again.
    pub fn delete(&mut self, id: u32) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        debug!(id, "deleted task");
        Ok(self.tasks.remove(index))
    }

    pub fn filter(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn overdue(&self, today: &DueDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_overdue(today)).collect()
    }

    /// Writes every task to `path`, replacing its previous contents.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(&mut writer, &self.tasks)?;
            writeln!(writer)?;
        } else {
            for task in &self.tasks {
                writeln!(writer, "{}", task.to_line())?;
            }
        }
        writer.flush()?;
        debug!(path = %path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Replaces the collection with the tasks stored at `path`.
    ///
    /// Malformed records and records repeating an earlier id are skipped and
    /// listed in the report. On error the collection is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let parsed: Vec<(usize, std::result::Result<Task, ParseError>)> = if is_json(path) {
            let tasks: Vec<Task> = serde_json::from_reader(reader)?;
            tasks
                .into_iter()
                .enumerate()
                .map(|(index, task)| {
                    let result = if !(1..=MAX_ID).contains(&task.id) {
                        Err(ParseError::InvalidId(task.id.to_string()))
                    } else {
                        Ok(task)
                    };
                    (index + 1, result)
                })
                .collect()
        } else {
            let mut parsed = Vec::new();
            for (index, bytes) in reader.split(b'\n').enumerate() {
                let bytes = bytes?;
                let Ok(line) = String::from_utf8(bytes) else {
                    parsed.push((index + 1, Err(ParseError::InvalidUtf8)));
                    continue;
                };
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if line.trim().is_empty() {
                    continue;
                }
                parsed.push((index + 1, Task::from_line(line)));
            }
            parsed
        };

        let mut tasks: Vec<Task> = Vec::with_capacity(parsed.len());
        let mut report = LoadReport::default();
        for (position, result) in parsed {
            let result = result.and_then(|task| {
                if tasks.iter().any(|t| t.id == task.id) {
                    Err(ParseError::DuplicateId(task.id))
                } else {
                    Ok(task)
                }
            });
            match result {
                Ok(task) => tasks.push(task),
                Err(error) => {
                    warn!(path = %path.display(), position, %error, "skipping malformed task record");
                    report.skipped.push(SkippedRecord { position, error });
                }
            }
        }

        report.loaded = tasks.len();
        self.next_id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |max| max + 1);
        self.tasks = tasks;
        debug!(path = %path.display(), loaded = report.loaded, skipped = report.skipped.len(), "loaded tasks");
        Ok(report)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
