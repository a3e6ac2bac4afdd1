// 📒 Chart Entity - a named chart of accounts
//
// Identity: id, assigned by the repository on first save
// Values: name, retained earnings account, user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chart {
    /// Empty until the chart is first saved
    pub id: String,

    pub name: String,

    /// Account last saved with the `retainedEarnings` marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_earnings_account: Option<String>,

    pub user: String,

    /// Time of the last save
    #[serde(rename = "timestamp")]
    pub as_of: Option<DateTime<Utc>>,

    /// Set once, on creation
    pub created: Option<DateTime<Utc>>,

    /// Reserved for soft delete, never set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<DateTime<Utc>>,
}

impl Chart {
    pub fn new(name: impl Into<String>) -> Self {
        Chart {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    pub fn retained_earnings_account(&self) -> Option<&str> {
        self.retained_earnings_account.as_deref().filter(|id| !id.is_empty())
    }
}
