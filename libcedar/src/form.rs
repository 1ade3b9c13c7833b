use crate::checklist::{Actor, Aggregate, Checklist, ChecklistStatus, ItemStatus, Priority};

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

/// Buttons offered on a saved checklist.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FormAction {
    MarkAllCompleted,
    GenerateReport,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub completion_percentage: u8,
    pub status_counts: IndexMap<ItemStatus, usize>,
    pub priority_counts: IndexMap<Priority, usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportLine {
    pub item: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub notes: Option<String>,
}

/// Read-only summary of a completed checklist.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditReport {
    pub checklist: String,
    pub company: Option<String>,
    pub fiscal_year: Option<String>,
    pub items: Vec<ReportLine>,
}

impl Checklist {
    /// Completes every outstanding item, Not Applicable ones included, and
    /// stamps the items it changes. Items that were already Completed are
    /// left as they are, stamped or not.
    pub fn mark_all_completed(&mut self, actor: &Actor) -> Aggregate {
        let mut changed = 0;
        for item in self.items.iter_mut() {
            if item.status != ItemStatus::Completed {
                item.status = ItemStatus::Completed;
                item.stamp(actor);
                changed += 1;
            }
        }

        info!(checklist = %self.title, changed, user = %actor.user, "marked all items completed");
        self.recompute()
    }

    /// A checklist can be submitted once nothing is left Pending or In Progress.
    pub fn validate_submit(&self) -> Result<()> {
        let unresolved: Vec<&str> = self
            .items
            .iter()
            .filter(|item| !item.status.is_resolved())
            .map(|item| item.item.as_str())
            .collect();

        if unresolved.is_empty() {
            return Ok(());
        }

        Err(anyhow!(format!(
            "all checklist items must be Completed or Not Applicable before submission, still pending: {}",
            unresolved.join(", ")
        )))
    }

    pub fn generate_report(&self) -> Result<AuditReport> {
        if self.status() != ChecklistStatus::Completed {
            return Err(anyhow!(format!(
                "checklist `{}' is {} ({}%), a report needs it Completed",
                self.title,
                self.status(),
                self.completion_percentage()
            )));
        }

        Ok(AuditReport {
            checklist: self.title.clone(),
            company: self.company.clone(),
            fiscal_year: self.fiscal_year.clone(),
            items: self
                .items
                .iter()
                .map(|item| ReportLine {
                    item: item.item.clone(),
                    description: item.description.clone(),
                    status: item.status,
                    notes: item.notes.clone(),
                })
                .collect(),
        })
    }

    pub fn actions(&self) -> Vec<FormAction> {
        match self.status() {
            ChecklistStatus::Completed => vec![FormAction::GenerateReport],
            ChecklistStatus::Pending | ChecklistStatus::InProgress => {
                vec![FormAction::MarkAllCompleted]
            }
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        let mut status_counts: IndexMap<ItemStatus, usize> =
            ItemStatus::ALL.iter().map(|&s| (s, 0)).collect();
        let mut priority_counts: IndexMap<Priority, usize> =
            Priority::ALL.iter().map(|&p| (p, 0)).collect();

        for item in &self.items {
            *status_counts.entry(item.status).or_default() += 1;
            *priority_counts.entry(item.priority).or_default() += 1;
        }

        Dashboard {
            completion_percentage: self.completion_percentage(),
            status_counts,
            priority_counts,
        }
    }
}
