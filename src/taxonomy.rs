// 🏷️ Tag Taxonomy - Catalog of account classification tags
// Which tags exist, and which of them a child account must share with its parent

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// TAG NAMES
// ============================================================================

pub const BALANCE_SHEET: &str = "balanceSheet";
pub const INCOME_STATEMENT: &str = "incomeStatement";

pub const OPERATING: &str = "operating";
pub const DEDUCTION: &str = "deduction";
pub const SALES_TAX: &str = "salesTax";
pub const COST: &str = "cost";
pub const NON_OPERATING_TAX: &str = "nonOperatingTax";
pub const INCOME_TAX: &str = "incomeTax";
pub const DIVIDENDS: &str = "dividends";

pub const INCREASE_ON_DEBIT: &str = "increaseOnDebit";
pub const INCREASE_ON_CREDIT: &str = "increaseOnCredit";
pub const DETAIL: &str = "detail";
pub const SUMMARY: &str = "summary";

/// Points the chart at the account being saved. Acted on, never stored.
pub const RETAINED_EARNINGS: &str = "retainedEarnings";

/// Group label shared by `balanceSheet` and `incomeStatement`.
pub const FINANCIAL_STATEMENT: &str = "financial statement";
/// Group label of the income-statement attribute subset (at most one per account).
pub const INCOME_STATEMENT_ATTRIBUTE: &str = "income statement attribute";

// ============================================================================
// TAG CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagCategory {
    /// Must be carried by every child of an account that carries it.
    Inherited { group: String },
    /// Structural, describes this account only.
    NonInherited,
    /// Recognized on save, then stripped. Outside the inheritance rules.
    Marker,
}

impl TagCategory {
    pub fn is_inherited(&self) -> bool {
        matches!(self, TagCategory::Inherited { .. })
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            TagCategory::Inherited { group } => Some(group),
            _ => None,
        }
    }
}

// ============================================================================
// TAG DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    pub category: TagCategory,
}

impl TagDefinition {
    pub fn inherited(name: impl Into<String>, group: impl Into<String>) -> Self {
        TagDefinition {
            name: name.into(),
            category: TagCategory::Inherited { group: group.into() },
        }
    }

    pub fn non_inherited(name: impl Into<String>) -> Self {
        TagDefinition {
            name: name.into(),
            category: TagCategory::NonInherited,
        }
    }

    pub fn marker(name: impl Into<String>) -> Self {
        TagDefinition {
            name: name.into(),
            category: TagCategory::Marker,
        }
    }
}

// ============================================================================
// TAG TAXONOMY
// ============================================================================

/// TagTaxonomy - immutable catalog of every tag an account may carry
///
/// Tags not found here are dropped before an account is persisted.
/// Definitions keep their registration order so that rule checks walking
/// the inherited tags always report the same failure first.
#[derive(Debug, Clone)]
pub struct TagTaxonomy {
    definitions: Vec<TagDefinition>,
    by_name: HashMap<String, usize>,
}

impl TagTaxonomy {
    /// Create an empty taxonomy. Every tag is unknown until registered.
    pub fn empty() -> Self {
        TagTaxonomy {
            definitions: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create the standard chart-of-accounts taxonomy
    pub fn new() -> Self {
        let mut taxonomy = TagTaxonomy::empty();
        taxonomy.register_standard_tags();
        taxonomy
    }

    fn register_standard_tags(&mut self) {
        // ====================================================================
        // FINANCIAL STATEMENT (inherited, exactly one per account)
        // ====================================================================

        self.register(TagDefinition::inherited(BALANCE_SHEET, FINANCIAL_STATEMENT));
        self.register(TagDefinition::inherited(INCOME_STATEMENT, FINANCIAL_STATEMENT));

        // ====================================================================
        // INCOME STATEMENT ATTRIBUTES (inherited, at most one per account)
        // ====================================================================

        for name in [OPERATING, DEDUCTION, SALES_TAX, COST, NON_OPERATING_TAX, INCOME_TAX, DIVIDENDS] {
            self.register(TagDefinition::inherited(name, INCOME_STATEMENT_ATTRIBUTE));
        }

        // ====================================================================
        // NORMAL BALANCE AND LEVEL (not inherited)
        // ====================================================================

        self.register(TagDefinition::non_inherited(INCREASE_ON_DEBIT));
        self.register(TagDefinition::non_inherited(INCREASE_ON_CREDIT));
        self.register(TagDefinition::non_inherited(DETAIL));
        self.register(TagDefinition::non_inherited(SUMMARY));

        self.register(TagDefinition::marker(RETAINED_EARNINGS));
    }

    /// Register a tag, replacing any previous definition with the same name
    pub fn register(&mut self, def: TagDefinition) {
        match self.by_name.get(&def.name) {
            Some(&i) => self.definitions[i] = def,
            None => {
                self.by_name.insert(def.name.clone(), self.definitions.len());
                self.definitions.push(def);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    /// Category of a tag, or `None` when the tag is unknown
    pub fn category_of(&self, name: &str) -> Option<&TagCategory> {
        self.get(name).map(|def| &def.category)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Inherited tags, in registration order
    pub fn inherited(&self) -> impl Iterator<Item = &TagDefinition> {
        self.definitions.iter().filter(|def| def.category.is_inherited())
    }

    /// True when the tag belongs to the given inherited group
    pub fn in_group(&self, name: &str, group: &str) -> bool {
        self.category_of(name).and_then(TagCategory::group) == Some(group)
    }

    /// True for tags that trigger an action on save but are never stored
    pub fn is_marker(&self, name: &str) -> bool {
        self.category_of(name) == Some(&TagCategory::Marker)
    }

    /// Keep only the tags an account may persist: known, and not a marker.
    /// Order is preserved.
    pub fn filter<'a, I>(&self, tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .filter(|tag| self.is_known(tag) && !self.is_marker(tag))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.definitions.len()
    }
}

impl Default for TagTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
