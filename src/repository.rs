// 📚 Repository - charts and accounts over a key-value store
//
// Every operation reads and writes whole collections:
//   "charts-of-accounts"  every chart, kept sorted by name
//   "accounts/<chartId>"  one chart's accounts, in insertion order
//
// There is no locking and no transaction. Two callers saving into the same
// collection both read the same snapshot and the second put wins, so writes
// must be serialized by the caller. The cascade after an account save
// (retained earnings reference, parent promotion) is not atomic either: if
// one of its writes fails, the account itself stays saved.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::codec;
use crate::entities::{Account, Chart, Tags};
use crate::error::{LedgerError, LedgerResult};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::store::KeyValueStore;
use crate::taxonomy::{TagTaxonomy, DETAIL, SUMMARY};
use crate::validator::{ValidationError, Validator};

pub const CHARTS_KEY: &str = "charts-of-accounts";

pub fn accounts_key(chart_id: &str) -> String {
    format!("accounts/{}", chart_id)
}

pub struct ChartRepository<S> {
    store: S,
    taxonomy: Arc<TagTaxonomy>,
    validator: Validator,
    ids: Box<dyn IdGenerator>,
}

impl<S: KeyValueStore> ChartRepository<S> {
    /// Repository with the standard taxonomy and random UUID ids
    pub fn new(store: S) -> Self {
        let taxonomy = Arc::new(TagTaxonomy::new());
        ChartRepository {
            store,
            validator: Validator::new(Arc::clone(&taxonomy)),
            taxonomy,
            ids: Box::new(UuidGenerator),
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: TagTaxonomy) -> Self {
        self.taxonomy = Arc::new(taxonomy);
        self.validator = Validator::new(Arc::clone(&self.taxonomy));
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // CHARTS
    // ========================================================================

    /// All charts, sorted by name
    pub fn list_charts(&self) -> LedgerResult<Vec<Chart>> {
        self.load(CHARTS_KEY)
    }

    pub fn get_chart(&self, chart_id: &str) -> LedgerResult<Option<Chart>> {
        Ok(self.list_charts()?.into_iter().find(|c| c.id == chart_id))
    }

    /// Create (empty id) or replace a chart. Refreshes `as_of`; keeps `created`.
    ///
    /// A non-empty id that matches no stored chart replaces nothing: the
    /// collection is written back as it was and the chart is returned.
    pub fn save_chart(&self, mut chart: Chart) -> LedgerResult<Chart> {
        if let Err(e) = self.validator.validate_chart(&chart) {
            warn!(chart_id = %chart.id, reason = %e, "chart rejected");
            return Err(e.into());
        }
        if chart.retained_earnings_account().is_none() {
            chart.retained_earnings_account = None;
        }

        let mut charts: Vec<Chart> = self.load(CHARTS_KEY)?;
        let now = Utc::now();
        chart.as_of = Some(now);

        if chart.is_new() {
            chart.id = self.ids.next_id();
            chart.created = Some(now);
            charts.push(chart.clone());
            info!(chart_id = %chart.id, name = %chart.name, "chart created");
        } else {
            match charts.iter_mut().find(|c| c.id == chart.id) {
                Some(slot) => {
                    chart.created = slot.created;
                    *slot = chart.clone();
                }
                None => warn!(chart_id = %chart.id, "no stored chart with this id, nothing replaced"),
            }
        }

        charts.sort_by(|a, b| a.name.cmp(&b.name));
        self.write(CHARTS_KEY, &charts)?;

        Ok(chart)
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    /// Accounts of a chart, sorted by number (lexicographic, not numeric)
    pub fn list_accounts(&self, chart_id: &str) -> LedgerResult<Vec<Account>> {
        require_chart_id(chart_id)?;
        let mut accounts: Vec<Account> = self.load(&accounts_key(chart_id))?;
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(accounts)
    }

    pub fn get_account(&self, chart_id: &str, account_id: &str) -> LedgerResult<Option<Account>> {
        require_chart_id(chart_id)?;
        let accounts: Vec<Account> = self.load(&accounts_key(chart_id))?;
        Ok(accounts.into_iter().find(|a| a.id == account_id))
    }

    /// Create (empty id) or update an account, then bring its chart and
    /// ancestors in line.
    ///
    /// On update only name, tags and user are taken from `account`; number,
    /// parent and created keep their stored values.
    pub fn save_account(&self, chart_id: &str, account: Account) -> LedgerResult<Account> {
        require_chart_id(chart_id)?;

        let saved = self.store_account(chart_id, account)?;
        self.promote_ancestors(chart_id, &saved)?;

        Ok(saved)
    }

    /// Position of each number in the chart's stored (insertion) order.
    ///
    /// This is not the order `list_accounts` returns. An account matches when
    /// its number is equal and it carries every tag in `required_tags`; the
    /// last match wins and -1 means none.
    pub fn indexes<N, T>(&self, chart_id: &str, numbers: &[N], required_tags: &[T]) -> LedgerResult<Vec<isize>>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        require_chart_id(chart_id)?;
        let accounts: Vec<Account> = self.load(&accounts_key(chart_id))?;

        Ok(numbers
            .iter()
            .map(|number| {
                accounts
                    .iter()
                    .rposition(|a| a.number == number.as_ref() && a.tags.contains_all(required_tags))
                    .map_or(-1, |i| i as isize)
            })
            .collect())
    }

    // ========================================================================
    // SAVE PATH
    // ========================================================================

    /// Validate and write one account, then move the chart's retained
    /// earnings reference if the caller tagged it `retainedEarnings`.
    /// The marker itself is never stored.
    fn store_account(&self, chart_id: &str, mut account: Account) -> LedgerResult<Account> {
        let key = accounts_key(chart_id);
        let mut accounts: Vec<Account> = self.load(&key)?;

        let retained_earnings = account.is_retained_earnings();
        let mut tags = Tags::from(self.taxonomy.filter(&account.tags));

        if account.is_new() && !tags.contains(DETAIL) {
            tags = tags.with(DETAIL);
        }
        if account.parent_id().is_none() {
            account.parent = None;
        }

        if !account.is_new() {
            let previous = accounts
                .iter()
                .find(|a| a.id == account.id)
                .ok_or_else(|| ValidationError::new("id", format!("Account not found: {}", account.id)))?;
            account.number = previous.number.clone();
            account.parent = previous.parent.clone();
            account.created = previous.created;

            // leaf status follows the tree once children exist
            if accounts.iter().any(|a| a.parent_id() == Some(account.id.as_str())) {
                tags = tags.without(DETAIL).with(SUMMARY);
            }
        }

        account.tags = tags;

        if let Err(e) = self.validator.validate_account(&account, &accounts) {
            warn!(chart_id, number = %account.number, reason = %e, "account rejected");
            return Err(e.into());
        }

        let now = Utc::now();
        account.as_of = Some(now);

        if account.is_new() {
            account.id = self.ids.next_id();
            account.created = Some(now);
            accounts.push(account.clone());
            info!(chart_id, account_id = %account.id, number = %account.number, "account created");
        } else if let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) {
            *slot = account.clone();
        }

        self.write(&key, &accounts)?;

        if retained_earnings {
            self.point_retained_earnings(chart_id, &account.id)?;
        }

        Ok(account)
    }

    fn point_retained_earnings(&self, chart_id: &str, account_id: &str) -> LedgerResult<()> {
        let mut chart = self
            .get_chart(chart_id)?
            .ok_or_else(|| ValidationError::new("chart", format!("Chart not found: {}", chart_id)))?;

        if chart.retained_earnings_account() != Some(account_id) {
            info!(chart_id, account_id, "retained earnings account changed");
        }
        chart.retained_earnings_account = Some(account_id.to_string());
        self.save_chart(chart)?;

        Ok(())
    }

    /// Walk up from a saved account turning each `detail` ancestor into a
    /// `summary` one. Stops at the first ancestor that needs no change.
    fn promote_ancestors(&self, chart_id: &str, account: &Account) -> LedgerResult<()> {
        let mut visited = HashSet::new();
        visited.insert(account.id.clone());
        let mut parent_id = account.parent_id().map(str::to_string);

        while let Some(id) = parent_id {
            let accounts: Vec<Account> = self.load(&accounts_key(chart_id))?;

            if !visited.insert(id.clone()) || visited.len() > accounts.len() {
                warn!(chart_id, account_id = %account.id, "parent chain loops, promotion stopped");
                return Err(LedgerError::CorruptHierarchy {
                    account_id: account.id.clone(),
                });
            }

            let Some(mut parent) = accounts.into_iter().find(|a| a.id == id) else {
                warn!(chart_id, parent_id = %id, "parent vanished during promotion");
                return Ok(());
            };

            let tags = parent.tags.without(DETAIL).with(SUMMARY);
            if tags == parent.tags {
                break;
            }

            info!(chart_id, account_id = %parent.id, number = %parent.number, "account promoted to summary");
            parent.tags = tags;
            let saved = self.store_account(chart_id, parent)?;
            parent_id = saved.parent_id().map(str::to_string);
        }

        Ok(())
    }

    // ========================================================================
    // STORE ACCESS
    // ========================================================================

    fn load<T: DeserializeOwned>(&self, key: &str) -> LedgerResult<Vec<T>> {
        let data = self.store.get(key.as_bytes()).map_err(LedgerError::Storage)?;
        let records: Vec<T> = codec::decode(data.as_deref())?;
        debug!(key, count = records.len(), "collection loaded");
        Ok(records)
    }

    fn write<T: Serialize>(&self, key: &str, records: &[T]) -> LedgerResult<()> {
        let data = codec::encode(records)?;
        self.store.put(key.as_bytes(), &data).map_err(LedgerError::Storage)?;
        debug!(key, count = records.len(), "collection written");
        Ok(())
    }
}

fn require_chart_id(chart_id: &str) -> LedgerResult<()> {
    if chart_id.trim().is_empty() {
        return Err(LedgerError::invalid_argument("chart id is empty"));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
