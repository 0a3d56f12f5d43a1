// File: ./src/importer.rs
// Turns a parsed checklist into parent tasks and subtasks
use crate::client::TaskService;
use crate::model::ChecklistDocument;
use anyhow::{Context, Result};
use std::fmt;

pub const ROOT_DESCRIPTION: &str = "Auto-created parent for imported checklist.";
pub const DEFAULT_PREFIX: &str = "Packing - ";

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Prepended to every category task name.
    pub prefix: String,
    /// Title of a single parent task to nest all categories under.
    pub root_parent: Option<String>,
    pub closed_status: Option<String>,
    /// Shown in each category's description, usually the input file name.
    pub source_name: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            root_parent: None,
            closed_status: None,
            source_name: "stdin".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub subtasks: usize,
    pub closed: usize,
    pub status_failures: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} categories, {} subtasks, {} closed",
            self.categories, self.subtasks, self.closed
        )?;
        if self.status_failures > 0 {
            write!(f, ", {} status updates failed", self.status_failures)?;
        }
        Ok(())
    }
}

/// Walks a document in order and creates one task per category and item.
///
/// Without a service every action is printed instead (dry run).
pub struct Importer<'a, S> {
    service: Option<&'a S>,
    options: &'a ImportOptions,
}

impl<'a, S: TaskService> Importer<'a, S> {
    pub fn new(service: &'a S, options: &'a ImportOptions) -> Self {
        Self {
            service: Some(service),
            options,
        }
    }

    pub fn dry_run(options: &'a ImportOptions) -> Self {
        Self {
            service: None,
            options,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.service.is_none()
    }

    /// Creates every task in document order. The first failed creation aborts
    /// the run; failed status updates only produce a warning.
    pub async fn run(&self, doc: &ChecklistDocument) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        let root_id = match self.options.root_parent.as_deref() {
            Some(title) if !title.is_empty() => {
                Some(self.create_task(title, ROOT_DESCRIPTION, None).await?)
            }
            _ => None,
        };

        let description = format!("Generated from {}.", self.options.source_name);
        let closed_status = self
            .options
            .closed_status
            .as_deref()
            .filter(|s| !s.is_empty());

        for block in doc {
            let name = format!("{}{}", self.options.prefix, block.title);
            let parent_id = self
                .create_task(&name, &description, root_id.as_deref())
                .await?;
            summary.categories += 1;

            for item in &block.items {
                let sub_id = self.create_task(&item.text, "", Some(&parent_id)).await?;
                summary.subtasks += 1;

                if item.checked
                    && let Some(status) = closed_status
                {
                    if self.set_status(&sub_id, status).await {
                        summary.closed += 1;
                    } else {
                        summary.status_failures += 1;
                    }
                }
            }
        }

        Ok(summary)
    }

    async fn create_task(
        &self,
        name: &str,
        description: &str,
        parent: Option<&str>,
    ) -> Result<String> {
        let Some(service) = self.service else {
            println!(
                "[DRY] create task: {} (parent={})",
                name,
                parent.unwrap_or("None")
            );
            return Ok(format!("DRY::{}", name));
        };

        let id = service
            .create_task(name, description, parent)
            .await
            .with_context(|| format!("Failed to create task '{}'", name))?;
        println!("Created task: {} [{}]", name, id);
        Ok(id)
    }

    /// Returns whether the status was applied.
    async fn set_status(&self, task_id: &str, status: &str) -> bool {
        let Some(service) = self.service else {
            println!("[DRY] set status: {} on {}", status, task_id);
            return true;
        };

        match service.set_status(task_id, status).await {
            Ok(()) => {
                tracing::debug!("Set status '{}' on {}", status, task_id);
                true
            }
            Err(e) => {
                tracing::warn!("Could not set status '{}' on {}: {}", status, task_id, e);
                false
            }
        }
    }
}
