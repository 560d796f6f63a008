//! The state behind the home screen and the actions the user can take on it.

use serde::Serialize;
use time::Month;
use tokio::sync::watch;

use crate::{
    Error,
    category::Category,
    clock::Clock,
    dashboard::{
        aggregation::{SpendingPoint, TimeFrame, spending_by_time_frame},
        filter::{FilterCriteria, Totals},
    },
    database_id::{CategoryId, TransactionId},
    datetime::to_millis,
    stores::{CategoryStore, TransactionStore},
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// Everything the home screen displays, published as one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeState {
    /// Every stored transaction, newest first.
    pub transactions: Vec<Transaction>,
    /// Every category.
    pub categories: Vec<Category>,
    /// The categories marked as favorites.
    pub favorite_categories: Vec<Category>,
    /// The transactions that pass the filters, newest first.
    pub filtered_transactions: Vec<Transaction>,
    /// Income minus expenses over `filtered_transactions`.
    pub total_balance: f64,
    /// The sum of income in `filtered_transactions`.
    pub total_income: f64,
    /// The sum of expenses in `filtered_transactions`.
    pub total_expenses: f64,
    /// The chart buckets for `selected_time_frame` over `filtered_transactions`.
    pub spending_data: Vec<SpendingPoint>,
    /// The span of time the chart covers.
    pub selected_time_frame: TimeFrame,
    /// The month of the current year the list is narrowed to.
    pub selected_month: Month,
    /// The filters the user has chosen.
    pub filters: FilterCriteria,
    /// Set when the last transaction the user tried to add had an invalid or
    /// future date.
    pub date_error: Option<String>,
    /// Set when the store could not be read or written.
    pub error: Option<String>,
}

/// Drives the home screen.
///
/// Every action recomputes the whole [HomeState] and publishes it once to
/// the subscribers returned by [HomeViewModel::subscribe].
pub struct HomeViewModel<T, C, K> {
    transaction_store: T,
    category_store: C,
    clock: K,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    favorite_categories: Vec<Category>,
    filters: FilterCriteria,
    time_frame: TimeFrame,
    date_error: Option<String>,
    error: Option<String>,
    state: watch::Sender<HomeState>,
}

impl<T, C, K> HomeViewModel<T, C, K>
where
    T: TransactionStore,
    C: CategoryStore,
    K: Clock,
{
    /// Create the view-model and load the transactions and categories from
    /// the stores.
    ///
    /// The list starts narrowed to the current month with the chart showing
    /// [TimeFrame::Month].
    pub fn new(transaction_store: T, category_store: C, clock: K) -> Self {
        let filters = FilterCriteria::new(clock.now().month());
        let time_frame = TimeFrame::default();
        let (state, _) = watch::channel(HomeState {
            transactions: Vec::new(),
            categories: Vec::new(),
            favorite_categories: Vec::new(),
            filtered_transactions: Vec::new(),
            total_balance: 0.0,
            total_income: 0.0,
            total_expenses: 0.0,
            spending_data: Vec::new(),
            selected_time_frame: time_frame,
            selected_month: filters.selected_month,
            filters: filters.clone(),
            date_error: None,
            error: None,
        });

        let mut view_model = Self {
            transaction_store,
            category_store,
            clock,
            transactions: Vec::new(),
            categories: Vec::new(),
            favorite_categories: Vec::new(),
            filters,
            time_frame,
            date_error: None,
            error: None,
            state,
        };
        view_model.refresh();

        view_model
    }

    /// Receive every new [HomeState].
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    /// A copy of the latest [HomeState].
    pub fn state(&self) -> HomeState {
        self.state.borrow().clone()
    }

    /// Reload the transactions and categories from the stores.
    ///
    /// If a store fails, the previous data is kept and the error is shown in
    /// [HomeState::error].
    pub fn refresh(&mut self) {
        self.error = None;

        match self.transaction_store.get_all() {
            Ok(transactions) => self.transactions = transactions,
            Err(error) => self.record_store_error("load transactions", error),
        }

        match (
            self.category_store.get_all(),
            self.category_store.get_favorites(),
        ) {
            (Ok(categories), Ok(favorites)) => {
                self.categories = categories;
                self.favorite_categories = favorites;
            }
            (Err(error), _) | (_, Err(error)) => self.record_store_error("load categories", error),
        }

        self.recompute();
    }

    /// Replace the transactions with a new snapshot from the store.
    pub fn on_transactions_changed(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        self.recompute();
    }

    /// Replace the categories with a new snapshot from the store.
    pub fn on_categories_changed(&mut self, categories: Vec<Category>, favorites: Vec<Category>) {
        self.categories = categories;
        self.favorite_categories = favorites;
        self.recompute();
    }

    /// Show transactions whose title or category contains `query`.
    ///
    /// A blank query turns the search off.
    pub fn set_search_query(&mut self, query: &str) {
        self.filters.search_query = query.to_owned();
        self.recompute();
    }

    /// Show transactions in `category`, or turn the category filter off with `None`.
    pub fn set_selected_category(&mut self, category: Option<&str>) {
        self.filters.selected_category = category.map(str::to_owned);
        self.recompute();
    }

    /// Show transactions of `kind`, or turn the type filter off with `None`.
    pub fn set_selected_type(&mut self, kind: Option<TransactionType>) {
        self.filters.selected_type = kind;
        self.recompute();
    }

    /// Show transactions between `start` and `end` (inclusive), in
    /// milliseconds since the Unix epoch.
    pub fn set_date_range(&mut self, start: i64, end: i64) {
        self.filters.date_range = Some((start, end));
        self.recompute();
    }

    /// Turn off the search, category, type and date range filters.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    /// Narrow the list to `month` of the current year.
    pub fn select_month(&mut self, month: Month) {
        self.filters.selected_month = month;
        self.recompute();
    }

    /// Change the span of time the chart covers.
    pub fn update_time_frame(&mut self, time_frame: TimeFrame) {
        self.time_frame = time_frame;
        self.recompute();
    }

    /// Validate and store a new transaction, then reload the store.
    ///
    /// An invalid or future date is reported through [HomeState::date_error].
    /// Other invalid input is ignored. Returns the stored transaction on
    /// success.
    pub fn add_transaction(&mut self, builder: TransactionBuilder) -> Option<Transaction> {
        let now = to_millis(self.clock.now());

        let builder = match builder.validate(now) {
            Ok(builder) => builder,
            Err(error @ Error::FutureDate(_)) => {
                tracing::debug!("Rejected transaction: {error}");
                self.date_error = Some(error.to_string());
                self.recompute();
                return None;
            }
            Err(error) => {
                tracing::debug!("Ignored invalid transaction: {error}");
                return None;
            }
        };

        match self.transaction_store.create(builder) {
            Ok(transaction) => {
                self.date_error = None;
                self.refresh();
                Some(transaction)
            }
            Err(error) => {
                self.record_store_error("add transaction", error);
                self.recompute();
                None
            }
        }
    }

    /// Editing transactions is not supported, so this does nothing.
    pub fn update_transaction(&mut self, transaction: &Transaction) {
        tracing::debug!("Ignored update of transaction {}", transaction.id);
    }

    /// Deleting transactions is not supported, so this does nothing.
    pub fn delete_transaction(&mut self, id: TransactionId) {
        tracing::debug!("Ignored deletion of transaction {id}");
    }

    /// Flip the favorite flag of the category with `id`.
    ///
    /// Unknown IDs are ignored.
    pub fn toggle_category_favorite(&mut self, id: CategoryId) {
        let Some(category) = self.categories.iter().find(|category| category.id == id) else {
            tracing::debug!("Ignored favorite toggle for unknown category {id}");
            return;
        };

        match self
            .category_store
            .update_favorite(id, !category.is_favorite)
        {
            Ok(()) => self.refresh(),
            Err(error) => {
                self.record_store_error("update category", error);
                self.recompute();
            }
        }
    }

    fn record_store_error(&mut self, action: &str, error: Error) {
        tracing::error!("Could not {action}: {error}");
        self.error = Some(error.to_string());
    }

    fn recompute(&mut self) {
        let now = self.clock.now();
        let filtered_transactions = self.filters.apply(&self.transactions, now.year());
        let totals = Totals::from_transactions(&filtered_transactions);
        let spending_data = spending_by_time_frame(&filtered_transactions, self.time_frame, now);

        tracing::debug!(
            "Showing {} of {} transactions",
            filtered_transactions.len(),
            self.transactions.len()
        );

        self.state.send_replace(HomeState {
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            favorite_categories: self.favorite_categories.clone(),
            filtered_transactions,
            total_balance: totals.balance,
            total_income: totals.income,
            total_expenses: totals.expenses,
            spending_data,
            selected_time_frame: self.time_frame,
            selected_month: self.filters.selected_month,
            filters: self.filters.clone(),
            date_error: self.date_error.clone(),
            error: self.error.clone(),
        });
    }
}
