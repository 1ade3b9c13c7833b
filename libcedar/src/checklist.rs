use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ItemStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Pending,
        ItemStatus::InProgress,
        ItemStatus::Completed,
        ItemStatus::NotApplicable,
    ];

    /// Terminal states count toward completion.
    pub fn is_resolved(self) -> bool {
        match self {
            ItemStatus::Completed | ItemStatus::NotApplicable => true,
            ItemStatus::Pending | ItemStatus::InProgress => false,
        }
    }

    /// Whether work has started on the item. A checklist with at least one
    /// started item is no longer pending.
    pub fn is_started(self) -> bool {
        match self {
            ItemStatus::Completed | ItemStatus::InProgress => true,
            ItemStatus::Pending | ItemStatus::NotApplicable => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pending",
            ItemStatus::InProgress => "In Progress",
            ItemStatus::Completed => "Completed",
            ItemStatus::NotApplicable => "Not Applicable",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl TryFrom<&str> for ItemStatus {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or(anyhow!(format!(
                "input `{}' is not a valid checklist item status",
                s
            )))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl TryFrom<&str> for Priority {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.label().eq_ignore_ascii_case(s))
            .ok_or(anyhow!(format!("input `{}' is not a valid priority", s)))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ChecklistStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecklistStatus::Pending => f.pad("Pending"),
            ChecklistStatus::InProgress => f.pad("In Progress"),
            ChecklistStatus::Completed => f.pad("Completed"),
        }
    }
}

/// Who performs an edit, and when. Stands in for the session user and the
/// current date a form would otherwise read from its surroundings.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub user: String,
    pub today: NaiveDate,
}

impl Actor {
    pub fn new(user: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            user: user.into(),
            today,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ItemStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

impl ChecklistItem {
    pub fn new(item: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            item: item.into(),
            description: None,
            notes: None,
            status,
            priority: Priority::default(),
            completion_date: None,
            completed_by: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_stamped(&self) -> bool {
        self.completion_date.is_some()
    }

    /// Records who completed the item and when, the first time it is seen
    /// Completed. Returns whether a stamp was written.
    pub fn stamp(&mut self, actor: &Actor) -> bool {
        if self.status != ItemStatus::Completed || self.is_stamped() {
            return false;
        }

        self.completion_date = Some(actor.today);
        self.completed_by = Some(actor.user.clone());
        true
    }
}

/// Derived state of a checklist.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Aggregate {
    pub status: ChecklistStatus,
    pub completion_percentage: u8,
}

/// Rolls item statuses up into the parent status and completion percentage.
///
/// Completed and Not Applicable items are resolved. The percentage is the
/// share of resolved items, rounded half up, and 0 for an empty checklist.
/// Only a fully resolved checklist reaches 100: an unresolved one is capped at
/// 99 even where plain rounding would give 100 (201 items or more).
pub fn aggregate(items: &[ChecklistItem]) -> Aggregate {
    let total = items.len();
    let resolved = items.iter().filter(|i| i.status.is_resolved()).count();

    if total == 0 {
        return Aggregate::default();
    }

    let mut completion_percentage = ((200 * resolved + total) / (2 * total)) as u8;
    // 100% is reserved for a completed checklist, even when rounding says otherwise
    if resolved < total {
        completion_percentage = completion_percentage.min(99);
    }
    let status = if resolved == total {
        ChecklistStatus::Completed
    } else if items.iter().any(|i| i.status.is_started()) {
        ChecklistStatus::InProgress
    } else {
        ChecklistStatus::Pending
    };

    Aggregate {
        status,
        completion_percentage,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Checklist {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    pub(crate) items: Vec<ChecklistItem>,
    #[serde(flatten)]
    pub(crate) aggregate: Aggregate,
}

impl Checklist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_items(title: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        let mut checklist = Self::new(title);
        checklist.items = items;
        checklist.recompute();
        checklist
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn status(&self) -> ChecklistStatus {
        self.aggregate.status
    }

    pub fn completion_percentage(&self) -> u8 {
        self.aggregate.completion_percentage
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    pub fn push(&mut self, item: ChecklistItem) {
        self.items.push(item);
        self.recompute();
    }

    /// Re-derives status and percentage from the current items.
    pub fn recompute(&mut self) -> Aggregate {
        let previous = self.aggregate;
        self.aggregate = aggregate(&self.items);

        debug!(
            checklist = %self.title,
            items = self.items.len(),
            status = %self.aggregate.status,
            percentage = self.aggregate.completion_percentage,
            "recomputed checklist"
        );
        if previous.status != self.aggregate.status {
            info!(
                checklist = %self.title,
                "status changed: {} -> {}",
                previous.status,
                self.aggregate.status
            );
        }

        self.aggregate
    }

    fn item_mut(&mut self, index: usize) -> anyhow::Result<&mut ChecklistItem> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(anyhow!(format!(
            "no checklist item at row {} (checklist has {} items)",
            index, len
        )))
    }

    /// Item status edit. Stamps the item when it becomes Completed for the
    /// first time, then rolls the change up into the checklist.
    pub fn on_item_status_changed(
        &mut self,
        index: usize,
        status: ItemStatus,
        actor: &Actor,
    ) -> anyhow::Result<Aggregate> {
        let item = self.item_mut(index)?;
        item.status = status;
        if item.stamp(actor) {
            debug!(item = %item.item, user = %actor.user, "stamped completion");
        }

        Ok(self.recompute())
    }

    /// Row removal. Returns the removed item.
    pub fn on_item_removed(&mut self, index: usize) -> anyhow::Result<ChecklistItem> {
        if index >= self.items.len() {
            return Err(anyhow!(format!(
                "no checklist item at row {} (checklist has {} items)",
                index,
                self.items.len()
            )));
        }

        let removed = self.items.remove(index);
        self.recompute();
        Ok(removed)
    }

    /// Priority does not take part in aggregation, so nothing is recomputed.
    pub fn set_item_priority(&mut self, index: usize, priority: Priority) -> anyhow::Result<()> {
        self.item_mut(index)?.priority = priority;
        Ok(())
    }

    pub fn set_item_notes(&mut self, index: usize, notes: Option<String>) -> anyhow::Result<()> {
        self.item_mut(index)?.notes = notes;
        Ok(())
    }
}
