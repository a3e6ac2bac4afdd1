// 💳 Account Entity - a node in a chart's account tree
//
// Identity: id, unique within the chart, assigned by the repository
// Values: name, tags, user (may change on update)
// Fixed after creation: number, parent, created

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tags::Tags;
use crate::taxonomy::{DETAIL, RETAINED_EARNINGS, SUMMARY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    /// Empty until the account is first saved
    pub id: String,

    /// Hierarchical code, e.g. "1.1". Starts with the parent's number.
    pub number: String,

    pub name: String,

    pub tags: Tags,

    /// Parent account id within the same chart; `None` for a root account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    pub user: String,

    #[serde(rename = "timestamp")]
    pub as_of: Option<DateTime<Utc>>,

    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(number: impl Into<String>, name: impl Into<String>, tags: impl Into<Tags>) -> Self {
        Account {
            number: number.into(),
            name: name.into(),
            tags: tags.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Some(parent_id.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    /// Parent id, treating an empty reference as no parent
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_detail(&self) -> bool {
        self.tags.contains(DETAIL)
    }

    pub fn is_summary(&self) -> bool {
        self.tags.contains(SUMMARY)
    }

    pub fn is_retained_earnings(&self) -> bool {
        self.tags.contains(RETAINED_EARNINGS)
    }
}
