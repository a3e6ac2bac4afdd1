// 📐 Rule Layer - Chart and Account Validation
// Checks run in a fixed order; the first failure is the one reported

use std::sync::Arc;

use crate::entities::{Account, Chart};
use crate::taxonomy::{
    TagTaxonomy, BALANCE_SHEET, INCOME_STATEMENT, INCOME_STATEMENT_ATTRIBUTE, INCREASE_ON_CREDIT,
    INCREASE_ON_DEBIT,
};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct Validator {
    taxonomy: Arc<TagTaxonomy>,
}

impl Validator {
    pub fn new(taxonomy: Arc<TagTaxonomy>) -> Self {
        Validator { taxonomy }
    }

    pub fn validate_chart(&self, chart: &Chart) -> ValidationResult {
        if chart.name.trim().is_empty() {
            return Err(ValidationError::new("name", "The name must be informed"));
        }
        Ok(())
    }

    /// Validate an account against the stored accounts of its chart.
    ///
    /// `stored` is the chart's collection as persisted, before this save.
    /// An account with an empty id is treated as a creation.
    pub fn validate_account(&self, account: &Account, stored: &[Account]) -> ValidationResult {
        if account.number.trim().is_empty() {
            return Err(ValidationError::new("number", "The number must be informed"));
        }
        if account.name.trim().is_empty() {
            return Err(ValidationError::new("name", "The name must be informed"));
        }

        let tags = &account.tags;
        match (tags.contains(BALANCE_SHEET), tags.contains(INCOME_STATEMENT)) {
            (false, false) => {
                return Err(ValidationError::new("tags", "The financial statement must be informed"))
            }
            (true, true) => {
                return Err(ValidationError::new(
                    "tags",
                    "The statement must be either balance sheet or income statement",
                ))
            }
            _ => {}
        }
        match (tags.contains(INCREASE_ON_DEBIT), tags.contains(INCREASE_ON_CREDIT)) {
            (false, false) => {
                return Err(ValidationError::new("tags", "The normal balance must be informed"))
            }
            (true, true) => {
                return Err(ValidationError::new(
                    "tags",
                    "The normal balance must be either debit or credit",
                ))
            }
            _ => {}
        }

        let attributes = tags
            .iter()
            .filter(|tag| self.taxonomy.in_group(tag, INCOME_STATEMENT_ATTRIBUTE))
            .count();
        if attributes > 1 {
            return Err(ValidationError::new(
                "tags",
                "Only one income statement attribute is allowed",
            ));
        }

        if account.is_new() && stored.iter().any(|a| a.number == account.number) {
            return Err(ValidationError::new(
                "number",
                "An account with this number already exists",
            ));
        }

        if let Some(parent_id) = account.parent_id() {
            let parent = stored
                .iter()
                .find(|a| a.id == parent_id)
                .ok_or_else(|| ValidationError::new("parent", format!("Parent not found: {}", parent_id)))?;

            if !account.number.starts_with(&parent.number) {
                return Err(ValidationError::new(
                    "number",
                    "The number must start with parent's number",
                ));
            }

            for def in self.taxonomy.inherited() {
                if parent.tags.contains(&def.name) && !tags.contains(&def.name) {
                    let group = def.category.group().unwrap_or(&def.name);
                    return Err(ValidationError::new(
                        "tags",
                        format!("The {} must be same as the parent", group),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(TagTaxonomy::new()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_account(id: &str, number: &str, tags: &[&str]) -> Account {
        let mut account = Account::new(number, format!("account {}", number), tags);
        account.id = id.to_string();
        account
    }

    fn message(result: ValidationResult) -> String {
        result.unwrap_err().message
    }

    #[test]
    fn test_chart_name_required() {
        let validator = Validator::default();

        assert!(validator.validate_chart(&Chart::new("Main")).is_ok());
        assert_eq!(
            message(validator.validate_chart(&Chart::new("   "))),
            "The name must be informed"
        );
    }

    #[test]
    fn test_valid_account() {
        let validator = Validator::default();
        let account = Account::new("1", "Assets", ["balanceSheet", "increaseOnDebit", "detail"]);

        assert!(validator.validate_account(&account, &[]).is_ok());
    }

    #[test]
    fn test_number_checked_before_name() {
        let validator = Validator::default();
        let account = Account::new(" ", "", ["balanceSheet", "increaseOnDebit"]);

        let err = validator.validate_account(&account, &[]).unwrap_err();
        assert_eq!(err.field, "number");
        assert_eq!(err.message, "The number must be informed");
    }

    #[test]
    fn test_name_required() {
        let validator = Validator::default();
        let account = Account::new("1", "\t", ["balanceSheet", "increaseOnDebit"]);

        assert_eq!(
            message(validator.validate_account(&account, &[])),
            "The name must be informed"
        );
    }

    #[test]
    fn test_financial_statement_exactly_one() {
        let validator = Validator::default();

        let missing = Account::new("1", "A", ["increaseOnDebit"]);
        assert_eq!(
            message(validator.validate_account(&missing, &[])),
            "The financial statement must be informed"
        );

        let both = Account::new("1", "A", ["balanceSheet", "incomeStatement", "increaseOnDebit"]);
        assert_eq!(
            message(validator.validate_account(&both, &[])),
            "The statement must be either balance sheet or income statement"
        );
    }

    #[test]
    fn test_normal_balance_exactly_one() {
        let validator = Validator::default();

        let missing = Account::new("1", "A", ["balanceSheet"]);
        assert_eq!(
            message(validator.validate_account(&missing, &[])),
            "The normal balance must be informed"
        );

        let both = Account::new("1", "A", ["balanceSheet", "increaseOnDebit", "increaseOnCredit"]);
        assert_eq!(
            message(validator.validate_account(&both, &[])),
            "The normal balance must be either debit or credit"
        );
    }

    #[test]
    fn test_single_income_statement_attribute() {
        let validator = Validator::default();

        let one = Account::new("4", "Revenue", ["incomeStatement", "increaseOnCredit", "operating"]);
        assert!(validator.validate_account(&one, &[]).is_ok());

        let two = Account::new(
            "4",
            "Revenue",
            ["incomeStatement", "increaseOnCredit", "operating", "cost"],
        );
        assert_eq!(
            message(validator.validate_account(&two, &[])),
            "Only one income statement attribute is allowed"
        );
    }

    #[test]
    fn test_duplicate_number_on_creation_only() {
        let validator = Validator::default();
        let stored = vec![stored_account("a1", "1", &["balanceSheet", "increaseOnDebit"])];

        let duplicate = Account::new("1", "Again", ["balanceSheet", "increaseOnDebit"]);
        assert_eq!(
            message(validator.validate_account(&duplicate, &stored)),
            "An account with this number already exists"
        );

        // an update of the stored record itself is not a duplicate
        let update = stored_account("a1", "1", &["balanceSheet", "increaseOnDebit"]);
        assert!(validator.validate_account(&update, &stored).is_ok());
    }

    #[test]
    fn test_parent_must_exist() {
        let validator = Validator::default();
        let child = Account::new("1.1", "Cash", ["balanceSheet", "increaseOnDebit"]).with_parent("nope");

        assert_eq!(
            message(validator.validate_account(&child, &[])),
            "Parent not found: nope"
        );
    }

    #[test]
    fn test_number_must_start_with_parent_number() {
        let validator = Validator::default();
        let stored = vec![stored_account("a1", "1", &["balanceSheet", "increaseOnDebit"])];
        let child = Account::new("2.1", "Cash", ["balanceSheet", "increaseOnDebit"]).with_parent("a1");

        let err = validator.validate_account(&child, &stored).unwrap_err();
        assert_eq!(err.field, "number");
        assert_eq!(err.message, "The number must start with parent's number");
    }

    #[test]
    fn test_inherited_tags_must_match_parent() {
        let validator = Validator::default();
        let stored = vec![stored_account(
            "r",
            "4",
            &["incomeStatement", "increaseOnCredit", "operating", "summary"],
        )];

        let wrong_statement =
            Account::new("4.1", "Sales", ["balanceSheet", "increaseOnCredit"]).with_parent("r");
        assert_eq!(
            message(validator.validate_account(&wrong_statement, &stored)),
            "The financial statement must be same as the parent"
        );

        let missing_attribute =
            Account::new("4.1", "Sales", ["incomeStatement", "increaseOnCredit"]).with_parent("r");
        assert_eq!(
            message(validator.validate_account(&missing_attribute, &stored)),
            "The income statement attribute must be same as the parent"
        );

        // normal balance is not inherited
        let debit_child = Account::new(
            "4.1",
            "Returns",
            ["incomeStatement", "increaseOnDebit", "operating"],
        )
        .with_parent("r");
        assert!(validator.validate_account(&debit_child, &stored).is_ok());
    }

    #[test]
    fn test_retained_earnings_not_inherited() {
        let validator = Validator::default();
        let stored = vec![stored_account(
            "p",
            "3",
            &["balanceSheet", "increaseOnCredit", "retainedEarnings"],
        )];
        let child = Account::new("3.1", "Reserve", ["balanceSheet", "increaseOnCredit"]).with_parent("p");

        assert!(validator.validate_account(&child, &stored).is_ok());
    }
}
