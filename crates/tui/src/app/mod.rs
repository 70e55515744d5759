use std::time::Duration;

use api_types::{
    account::AccountView,
    budget::BudgetView,
    category::CategoryView,
    goal::GoalView,
    rates::RateTableView,
    stats::CurrencyTotal,
    transaction::{ExpenseNew, IncomeNew, TransactionView},
};
use chrono::Local;
use crossterm::event::{self, Event, KeyEvent};
use engine::{Currency, Money, RateTable};

use crate::{
    client::Client,
    config::AppConfig,
    currency_store::{CurrencyStore, engine_currency},
    error::{AppError, Result},
    local_state::{LocalState, default_state_path},
    ui,
    ui::keymap::{AppAction, map_input_key, map_key},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Transactions,
    Budgets,
    Goals,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Transactions => "Transactions",
            Self::Budgets => "Budgets",
            Self::Goals => "Goals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAddField {
    Amount,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAddKind {
    Expense,
    Income,
}

#[derive(Debug)]
pub struct QuickAddState {
    pub kind: QuickAddKind,
    pub amount: String,
    pub note: String,
    pub focus: QuickAddField,
    pub error: Option<String>,
}

impl QuickAddState {
    fn new(kind: QuickAddKind) -> Self {
        Self {
            kind,
            amount: String::new(),
            note: String::new(),
            focus: QuickAddField::Amount,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct SelectorState {
    pub selected: usize,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub login: LoginState,
    pub section: Section,
    pub accounts: Vec<AccountView>,
    pub selected_account: usize,
    pub transactions: Vec<TransactionView>,
    pub categories: Vec<CategoryView>,
    pub budgets: Vec<BudgetView>,
    pub month: String,
    pub goals: Vec<GoalView>,
    pub totals: Vec<CurrencyTotal>,
    pub currency: CurrencyStore,
    pub selector: Option<SelectorState>,
    pub quick_add: Option<QuickAddState>,
    pub status: Option<String>,
}

impl AppState {
    pub fn selected_account_view(&self) -> Option<&AccountView> {
        self.accounts.get(self.selected_account)
    }
}

pub struct App {
    client: Client,
    local_state: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let local_state = LocalState::load(default_state_path())?;
        let preferred = local_state.preferred().unwrap_or_default();

        let state = AppState {
            screen: Screen::Login,
            login: LoginState {
                username: config.username.clone(),
                password: String::new(),
                focus: LoginField::Username,
                message: None,
            },
            section: Section::Overview,
            accounts: Vec::new(),
            selected_account: 0,
            transactions: Vec::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            month: Local::now().format("%Y-%m").to_string(),
            goals: Vec::new(),
            totals: Vec::new(),
            currency: CurrencyStore::new(preferred),
            selector: None,
            quick_add: None,
            status: None,
        };

        Ok(Self {
            client,
            local_state,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.selector.is_some() {
            self.handle_selector_key(key)?;
            return Ok(());
        }
        if self.state.screen == Screen::Login {
            self.handle_login_key(key).await?;
            return Ok(());
        }
        if self.state.quick_add.is_some() {
            self.handle_quick_add_key(key).await?;
            return Ok(());
        }

        match map_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => self.state.status = None,
            AppAction::Up => {
                if self.state.section == Section::Overview && self.state.selected_account > 0 {
                    self.state.selected_account -= 1;
                }
            }
            AppAction::Down => {
                if self.state.section == Section::Overview
                    && self.state.selected_account + 1 < self.state.accounts.len()
                {
                    self.state.selected_account += 1;
                }
            }
            AppAction::Submit => {
                if self.state.section == Section::Overview {
                    self.state.section = Section::Transactions;
                    self.load_transactions().await;
                }
            }
            AppAction::Input('o') => self.state.section = Section::Overview,
            AppAction::Input('t') => {
                self.state.section = Section::Transactions;
                self.load_transactions().await;
            }
            AppAction::Input('b') => self.state.section = Section::Budgets,
            AppAction::Input('g') => self.state.section = Section::Goals,
            AppAction::Input('c') => self.open_selector(),
            AppAction::Input('r') => self.refresh_all().await,
            AppAction::Input('a') => {
                if self.state.section == Section::Transactions
                    && self.state.selected_account_view().is_some()
                {
                    self.state.quick_add = Some(QuickAddState::new(QuickAddKind::Expense));
                }
            }
            AppAction::Input('i') => {
                if self.state.section == Section::Transactions
                    && self.state.selected_account_view().is_some()
                {
                    self.state.quick_add = Some(QuickAddState::new(QuickAddKind::Income));
                }
            }
            AppAction::Input(_) | AppAction::NextField | AppAction::Backspace => {}
            AppAction::None => {}
        }

        Ok(())
    }

    fn handle_selector_key(&mut self, key: KeyEvent) -> Result<()> {
        let count = Currency::ALL.len();
        match map_key(key) {
            AppAction::Quit | AppAction::Cancel => self.state.selector = None,
            AppAction::Up => {
                if let Some(selector) = self.state.selector.as_mut() {
                    selector.selected = (selector.selected + count - 1) % count;
                }
            }
            AppAction::Down => {
                if let Some(selector) = self.state.selector.as_mut() {
                    selector.selected = (selector.selected + 1) % count;
                }
            }
            AppAction::Submit => {
                if let Some(selector) = self.state.selector.take() {
                    self.select_currency(Currency::ALL[selector.selected]);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<()> {
        match map_input_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextField => {
                self.state.login.focus = match self.state.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            AppAction::Submit => self.attempt_login().await,
            AppAction::Backspace => {
                self.active_login_field_mut().pop();
            }
            AppAction::Input(ch) => {
                self.active_login_field_mut().push(ch);
            }
            AppAction::Cancel => self.state.login.message = None,
            _ => {}
        }
        Ok(())
    }

    async fn handle_quick_add_key(&mut self, key: KeyEvent) -> Result<()> {
        match map_input_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => self.state.quick_add = None,
            AppAction::NextField => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    form.focus = match form.focus {
                        QuickAddField::Amount => QuickAddField::Note,
                        QuickAddField::Note => QuickAddField::Amount,
                    };
                }
            }
            AppAction::Submit => self.submit_quick_add().await,
            AppAction::Backspace => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    match form.focus {
                        QuickAddField::Amount => form.amount.pop(),
                        QuickAddField::Note => form.note.pop(),
                    };
                }
            }
            AppAction::Input(ch) => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    match form.focus {
                        QuickAddField::Amount => form.amount.push(ch),
                        QuickAddField::Note => form.note.push(ch),
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn active_login_field_mut(&mut self) -> &mut String {
        match self.state.login.focus {
            LoginField::Username => &mut self.state.login.username,
            LoginField::Password => &mut self.state.login.password,
        }
    }

    fn creds(&self) -> (String, String) {
        (
            self.state.login.username.trim().to_string(),
            self.state.login.password.trim().to_string(),
        )
    }

    fn open_selector(&mut self) {
        let preferred = self.state.currency.preferred();
        let selected = Currency::ALL
            .iter()
            .position(|currency| *currency == preferred)
            .unwrap_or(0);
        self.state.selector = Some(SelectorState { selected });
    }

    /// The single place the preference changes: store first, then persist.
    fn select_currency(&mut self, currency: Currency) {
        self.state.currency.set_preferred(currency);
        self.local_state.set_preferred(currency);
        if let Err(err) = self.local_state.save(default_state_path()) {
            self.state.status = Some(format!("could not save preference: {err}"));
        }
    }

    async fn attempt_login(&mut self) {
        let (username, password) = self.creds();
        if username.is_empty() || password.is_empty() {
            self.state.login.message = Some("Username and password are required.".to_string());
            return;
        }

        match self.client.accounts(&username, &password).await {
            Ok(accounts) => {
                self.state.accounts = accounts;
                self.state.selected_account = 0;
                self.state.screen = Screen::Home;
                self.state.login.message = None;
                self.load_all().await;
                self.load_transactions().await;
            }
            Err(err) => {
                self.state.login.message = Some(err.message());
            }
        }
    }

    async fn refresh_all(&mut self) {
        self.client.invalidate_all();
        let (username, password) = self.creds();
        match self.client.accounts(&username, &password).await {
            Ok(accounts) => {
                self.state.accounts = accounts;
                if self.state.selected_account >= self.state.accounts.len() {
                    self.state.selected_account = 0;
                }
            }
            Err(err) => self.state.status = Some(err.message()),
        }
        self.load_all().await;
        self.load_transactions().await;
    }

    /// Loads everything except the per-account transaction list.
    ///
    /// Failures land in the status line; the UI keeps rendering whatever data
    /// it already has.
    async fn load_all(&mut self) {
        let (username, password) = self.creds();
        self.state.status = None;

        match self.client.stats(&username, &password).await {
            Ok(totals) => self.state.totals = totals,
            Err(err) => self.state.status = Some(err.message()),
        }
        match self.client.categories(&username, &password).await {
            Ok(categories) => self.state.categories = categories,
            Err(err) => self.state.status = Some(err.message()),
        }
        let month = self.state.month.clone();
        match self.client.budgets(&username, &password, &month).await {
            Ok(budgets) => self.state.budgets = budgets,
            Err(err) => self.state.status = Some(err.message()),
        }
        match self.client.goals(&username, &password).await {
            Ok(goals) => self.state.goals = goals,
            Err(err) => self.state.status = Some(err.message()),
        }

        // Rates are optional: the UI degrades to original currencies until a
        // snapshot arrives.
        match self.client.rates(&username, &password).await {
            Ok(Some(view)) => self.state.currency.install_rates(to_rate_table(view)),
            Ok(None) => {}
            Err(err) => self.state.status = Some(err.message()),
        }
    }

    async fn load_transactions(&mut self) {
        let Some(account) = self.state.selected_account_view() else {
            self.state.transactions = Vec::new();
            return;
        };
        let account_id = account.id;
        let (username, password) = self.creds();

        match self
            .client
            .transactions(&username, &password, account_id)
            .await
        {
            Ok(transactions) => self.state.transactions = transactions,
            Err(err) => self.state.status = Some(err.message()),
        }
    }

    async fn submit_quick_add(&mut self) {
        let Some(account) = self.state.selected_account_view() else {
            self.state.quick_add = None;
            return;
        };
        let account_id = account.id;
        let account_currency = engine_currency(account.currency);

        let Some(form) = self.state.quick_add.as_ref() else {
            return;
        };
        let amount = match Money::parse(&form.amount, account_currency) {
            Ok(amount) if amount.is_positive() => amount,
            Ok(_) => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    form.error = Some("amount must be positive".to_string());
                }
                return;
            }
            Err(err) => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    form.error = Some(err.to_string());
                }
                return;
            }
        };
        let note = form.note.trim().to_string();
        let kind = form.kind;
        let note = (!note.is_empty()).then_some(note);
        let occurred_at = Local::now().fixed_offset();

        let (username, password) = self.creds();
        let result = match kind {
            QuickAddKind::Expense => {
                let payload = ExpenseNew {
                    account_id,
                    amount_minor: amount.minor(),
                    category_id: None,
                    note,
                    occurred_at,
                };
                self.client.expense_new(&username, &password, &payload).await
            }
            QuickAddKind::Income => {
                let payload = IncomeNew {
                    account_id,
                    amount_minor: amount.minor(),
                    category_id: None,
                    note,
                    occurred_at,
                };
                self.client.income_new(&username, &password, &payload).await
            }
        };
        match result {
            Ok(_) => {
                self.state.quick_add = None;
                self.state.status = Some(match kind {
                    QuickAddKind::Expense => "expense added".to_string(),
                    QuickAddKind::Income => "income added".to_string(),
                });
                // The mutation invalidated the touched entities; refetch.
                match self.client.accounts(&username, &password).await {
                    Ok(accounts) => self.state.accounts = accounts,
                    Err(err) => self.state.status = Some(err.message()),
                }
                match self.client.stats(&username, &password).await {
                    Ok(totals) => self.state.totals = totals,
                    Err(err) => self.state.status = Some(err.message()),
                }
                let month = self.state.month.clone();
                match self.client.budgets(&username, &password, &month).await {
                    Ok(budgets) => self.state.budgets = budgets,
                    Err(err) => self.state.status = Some(err.message()),
                }
                self.load_transactions().await;
            }
            Err(err) => {
                if let Some(form) = self.state.quick_add.as_mut() {
                    form.error = Some(err.message());
                }
            }
        }
    }
}

fn to_rate_table(view: RateTableView) -> RateTable {
    RateTable::new(
        engine_currency(view.base),
        view.rates
            .into_iter()
            .map(|entry| (engine_currency(entry.currency), entry.rate)),
        view.fetched_at,
    )
}
