use std::{path::PathBuf, time::Duration};

use api_types::transaction::{Transaction, TransactionDraft, TransactionId, TransactionKind};
use chrono::Utc;
use ratatui::{Terminal, backend::Backend};

use crate::{
    balance::Balance,
    client::TransactionService,
    config::{AppConfig, OrderingPolicy},
    error::{AppError, Result},
    export,
    form::{FormField, FormState},
    store::TransactionStore,
    ui::{
        self, CrosstermKeys, KeySource,
        keymap::{self, AppAction},
    },
    view::{self, DateDisplay, RowView},
};

const TICK_RATE: Duration = Duration::from_millis(200);
const PENDING_TICK: Duration = Duration::from_millis(50);

/// A user intent. Every key press that touches state becomes one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    Submit,
    Delete(TransactionId),
    Edit(TransactionId),
    ResetForm,
    SetKind(TransactionKind),
    Export,
    /// Replays the command behind the current error banner.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Export,
    Validate,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fetch => "load transactions",
            Self::Create => "add transaction",
            Self::Update => "update transaction",
            Self::Delete => "delete transaction",
            Self::Export => "export transactions",
            Self::Validate => "validate form",
        }
    }
}

/// Result of executing a [`Command`], applied to [`ViewState`] by [`reduce`].
#[derive(Debug)]
pub enum Outcome {
    Fetched(Vec<Transaction>),
    Created(Transaction),
    Updated {
        target: TransactionId,
        record: Transaction,
    },
    Deleted(TransactionId),
    EditStarted(Transaction),
    FormReset,
    KindChanged(TransactionKind),
    Exported {
        path: String,
        rows: usize,
    },
    /// The user stopped waiting for a request.
    Cancelled(Operation),
    Failed {
        operation: Operation,
        message: String,
        retry: Option<Command>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub level: StatusLevel,
    pub message: String,
    pub retry: Option<Command>,
}

impl StatusState {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            message: message.into(),
            retry: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Form(FormField),
}

impl Focus {
    pub fn is_text(self) -> bool {
        matches!(self, Self::Form(field) if field.is_text())
    }

    fn next(self) -> Self {
        match self {
            Self::Table => Self::Form(FormField::Type),
            Self::Form(FormField::Type) => Self::Form(FormField::Category),
            Self::Form(FormField::Category) => Self::Form(FormField::Amount),
            Self::Form(FormField::Amount) => Self::Form(FormField::Description),
            Self::Form(FormField::Description) => Self::Table,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Table => Self::Form(FormField::Description),
            Self::Form(FormField::Type) => Self::Table,
            Self::Form(FormField::Category) => Self::Form(FormField::Type),
            Self::Form(FormField::Amount) => Self::Form(FormField::Category),
            Self::Form(FormField::Description) => Self::Form(FormField::Amount),
        }
    }
}

/// Everything the UI renders from.
#[derive(Debug)]
pub struct ViewState {
    pub store: TransactionStore,
    pub form: FormState,
    pub status: Option<StatusState>,
    pub focus: Focus,
    pub selected: usize,
    pub ordering: OrderingPolicy,
    pub visible_rows: usize,
    pub dates: DateDisplay,
    /// Request in flight, if any.
    pub pending: Option<Operation>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(OrderingPolicy::default(), 10, DateDisplay::default())
    }
}

impl ViewState {
    pub fn new(ordering: OrderingPolicy, visible_rows: usize, dates: DateDisplay) -> Self {
        Self {
            store: TransactionStore::new(),
            form: FormState::new(),
            status: None,
            focus: Focus::Table,
            selected: 0,
            ordering,
            visible_rows,
            dates,
            pending: None,
        }
    }

    pub fn balance(&self) -> Balance {
        Balance::of(self.store.as_slice())
    }

    pub fn rows(&self) -> Vec<RowView> {
        view::rows(
            self.store.as_slice(),
            self.ordering,
            self.visible_rows,
            &self.dates,
        )
    }

    pub fn selected_id(&self) -> Option<TransactionId> {
        view::visible(self.store.as_slice(), self.ordering, self.visible_rows)
            .get(self.selected)
            .map(|tx| tx.id.clone())
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn visible_len(&self) -> usize {
        self.store.len().min(self.visible_rows)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible_len().saturating_sub(1));
    }
}

/// Applies an outcome to the view state. This is the only place where the
/// local sequence and the form change.
pub fn reduce(state: &mut ViewState, outcome: Outcome) {
    match outcome {
        Outcome::Fetched(items) => {
            let count = items.len();
            state.store.replace_all(items);
            state.status = Some(StatusState::success(format!(
                "Loaded {count} transactions."
            )));
        }
        Outcome::Created(record) => {
            state.status = Some(StatusState::success(format!(
                "Added transaction {}.",
                record.id
            )));
            state.store.upsert(record);
            state.form.reset();
        }
        Outcome::Updated { target, record } => {
            state.status = Some(StatusState::success(format!(
                "Updated transaction {}.",
                record.id
            )));
            state.store.replace(&target, record);
            state.form.reset();
        }
        Outcome::Deleted(id) => {
            state.store.remove(&id);
            state.status = Some(StatusState::success(format!("Deleted transaction {id}.")));
        }
        Outcome::EditStarted(tx) => {
            state.status = Some(StatusState {
                level: StatusLevel::Info,
                message: format!("Editing transaction {}.", tx.id),
                retry: None,
            });
            state.form.populate(&tx);
            state.focus = Focus::Form(FormField::Amount);
        }
        Outcome::FormReset => {
            state.form.reset();
        }
        Outcome::KindChanged(kind) => {
            state.form.set_kind(kind);
        }
        Outcome::Exported { path, rows } => {
            state.status = Some(StatusState::success(format!(
                "Exported {rows} transactions to {path}."
            )));
        }
        Outcome::Cancelled(operation) => {
            state.status = Some(StatusState {
                level: StatusLevel::Info,
                message: format!(
                    "Stopped waiting to {}; press l to reload.",
                    operation.label()
                ),
                retry: None,
            });
        }
        Outcome::Failed {
            operation,
            message,
            retry,
        } => {
            state.form.error = (operation == Operation::Validate).then(|| message.clone());
            state.status = Some(StatusState {
                level: StatusLevel::Error,
                message: format!("Failed to {}: {message}", operation.label()),
                retry,
            });
        }
    }
    state.clamp_selection();
}

/// A command that still needs an answer from the service.
#[derive(Debug)]
enum Request {
    Load,
    Create(TransactionDraft),
    Update {
        target: TransactionId,
        draft: TransactionDraft,
    },
    Delete(TransactionId),
}

impl Request {
    fn operation(&self) -> Operation {
        match self {
            Self::Load => Operation::Fetch,
            Self::Create(_) => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }

    async fn send<S: TransactionService>(self, service: &S) -> Outcome {
        match self {
            Self::Load => match service.list().await {
                Ok(items) => {
                    tracing::info!(count = items.len(), "fetched transactions");
                    Outcome::Fetched(items)
                }
                Err(err) => failed(Operation::Fetch, err, Some(Command::Load)),
            },
            Self::Create(draft) => match service.create(&draft).await {
                Ok(record) => {
                    tracing::info!(id = %record.id, "added transaction");
                    Outcome::Created(record)
                }
                Err(err) => failed(Operation::Create, err, Some(Command::Submit)),
            },
            Self::Update { target, draft } => {
                let res = service.update(&target, &draft).await;
                match res {
                    Ok(record) => {
                        tracing::info!(id = %record.id, "updated transaction");
                        Outcome::Updated { target, record }
                    }
                    Err(err) => failed(Operation::Update, err, Some(Command::Submit)),
                }
            }
            Self::Delete(id) => {
                let res = service.delete(&id).await;
                match res {
                    Ok(()) => {
                        tracing::info!(id = %id, "deleted transaction");
                        Outcome::Deleted(id)
                    }
                    Err(err) => failed(Operation::Delete, err, Some(Command::Delete(id))),
                }
            }
        }
    }
}

enum Step {
    Local(Outcome),
    Remote(Request),
    Nothing,
}

pub struct App<S> {
    service: S,
    export_path: PathBuf,
    pub state: ViewState,
    should_quit: bool,
}

impl<S: TransactionService> App<S> {
    pub fn new(service: S, config: &AppConfig) -> Result<Self> {
        let state = ViewState::new(config.ordering, config.visible_rows, config.date_display()?);
        Ok(Self {
            service,
            export_path: PathBuf::from(&config.export_path),
            state,
            should_quit: false,
        })
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Executes a command and folds its outcome into the state.
    pub async fn dispatch(&mut self, command: Command) {
        let outcome = match self.prepare(command) {
            Step::Nothing => return,
            Step::Local(outcome) => outcome,
            Step::Remote(request) => request.send(&self.service).await,
        };
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Outcome) {
        reduce(&mut self.state, outcome);
        tracing::debug!(balance = %self.state.balance(), "balance recomputed");
    }

    fn prepare(&self, command: Command) -> Step {
        match command {
            Command::Load => Step::Remote(Request::Load),
            Command::Submit => match self.state.form.draft(Utc::now()) {
                Ok(draft) => match self.state.form.editing.clone() {
                    Some(target) => Step::Remote(Request::Update { target, draft }),
                    None => Step::Remote(Request::Create(draft)),
                },
                Err(err) => {
                    tracing::debug!("rejected form: {err}");
                    Step::Local(Outcome::Failed {
                        operation: Operation::Validate,
                        message: err.to_string(),
                        retry: None,
                    })
                }
            },
            Command::Delete(id) => Step::Remote(Request::Delete(id)),
            Command::Edit(id) => match self.state.store.get(&id) {
                Some(tx) => {
                    tracing::debug!(id = %id, "editing transaction");
                    Step::Local(Outcome::EditStarted(tx.clone()))
                }
                None => {
                    tracing::debug!(id = %id, "edit requested for unknown transaction");
                    Step::Nothing
                }
            },
            Command::ResetForm => Step::Local(Outcome::FormReset),
            Command::SetKind(kind) => Step::Local(Outcome::KindChanged(kind)),
            Command::Export => Step::Local(self.export()),
            Command::Retry => match self.state.status.as_ref().and_then(|s| s.retry.clone()) {
                Some(Command::Retry) | None => Step::Nothing,
                Some(command) => self.prepare(command),
            },
        }
    }

    fn export(&self) -> Outcome {
        let path = self.export_path.display().to_string();
        match export::write_file(&self.export_path, self.state.store.as_slice()) {
            Ok(rows) => {
                tracing::info!(rows, path = %path, "exported transactions");
                Outcome::Exported { path, rows }
            }
            Err(err) => failed(Operation::Export, err, None),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.run_with(&mut terminal, &mut CrosstermKeys).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    /// Loads the sequence, then handles keys until the user quits.
    pub async fn run_with<B: Backend, K: KeySource>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut K,
    ) -> Result<()> {
        self.run_command(terminal, keys, Command::Load).await?;

        while !self.should_quit {
            draw(terminal, &self.state)?;

            if let Some(key) = keys.next_key(TICK_RATE)? {
                let action = keymap::map_key(key, self.state.focus.is_text());
                if let Some(command) = self.command_for(action) {
                    self.run_command(terminal, keys, command).await?;
                }
            }
        }

        Ok(())
    }

    /// Like [`App::dispatch`], but keeps redrawing and reading keys while a
    /// request is in flight. Quit and Esc drop the request.
    async fn run_command<B: Backend, K: KeySource>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut K,
        command: Command,
    ) -> Result<()> {
        let request = match self.prepare(command) {
            Step::Nothing => return Ok(()),
            Step::Local(outcome) => {
                self.apply(outcome);
                return Ok(());
            }
            Step::Remote(request) => request,
        };

        let operation = request.operation();
        self.state.pending = Some(operation);
        let outcome = {
            let response = request.send(&self.service);
            tokio::pin!(response);
            loop {
                draw(terminal, &self.state)?;
                tokio::select! {
                    outcome = &mut response => break Some(outcome),
                    () = tokio::time::sleep(PENDING_TICK) => {
                        let Some(key) = keys.next_key(Duration::ZERO)? else {
                            continue;
                        };
                        match keymap::map_key(key, self.state.focus.is_text()) {
                            AppAction::Quit => {
                                self.should_quit = true;
                                break None;
                            }
                            AppAction::Cancel => break Some(Outcome::Cancelled(operation)),
                            _ => {}
                        }
                    }
                }
            }
        };
        self.state.pending = None;

        if let Some(outcome) = outcome {
            if let Outcome::Cancelled(_) = outcome {
                tracing::info!("abandoned request to {}", operation.label());
            }
            self.apply(outcome);
        }
        Ok(())
    }

    /// Translates a key action into focus movement or a [`Command`] and
    /// runs it.
    pub async fn handle_action(&mut self, action: AppAction) {
        if let Some(command) = self.command_for(action) {
            self.dispatch(command).await;
        }
    }

    /// Applies focus and text edits in place and returns the command the
    /// action asks for, if any.
    fn command_for(&mut self, action: AppAction) -> Option<Command> {
        let focus = self.state.focus;
        match action {
            AppAction::Quit => {
                self.should_quit = true;
                None
            }
            AppAction::Cancel => {
                self.state.focus = Focus::Table;
                Some(Command::ResetForm)
            }
            AppAction::NextField => {
                self.state.focus = focus.next();
                None
            }
            AppAction::PrevField => {
                self.state.focus = focus.prev();
                None
            }
            AppAction::Submit => match focus {
                Focus::Table => self.state.selected_id().map(Command::Edit),
                Focus::Form(_) => Some(Command::Submit),
            },
            AppAction::Backspace => {
                if let Focus::Form(field) = focus {
                    if let Some(input) = self.state.form.input_mut(field) {
                        input.pop();
                    }
                }
                None
            }
            AppAction::Up => {
                match focus {
                    Focus::Table => self.state.select_prev(),
                    _ => self.state.focus = focus.prev(),
                }
                None
            }
            AppAction::Down => {
                match focus {
                    Focus::Table => self.state.select_next(),
                    _ => self.state.focus = focus.next(),
                }
                None
            }
            AppAction::Left | AppAction::Right => match focus {
                Focus::Form(FormField::Type) => {
                    Some(Command::SetKind(self.state.form.next_kind()))
                }
                Focus::Form(FormField::Category) => {
                    if action == AppAction::Right {
                        self.state.form.next_category();
                    } else {
                        self.state.form.prev_category();
                    }
                    None
                }
                _ => None,
            },
            AppAction::Input(ch) => {
                if let Focus::Form(field) = focus {
                    if let Some(input) = self.state.form.input_mut(field) {
                        input.push(ch);
                        return None;
                    }
                }
                self.shortcut(ch)
            }
            AppAction::None => None,
        }
    }

    fn shortcut(&self, ch: char) -> Option<Command> {
        match ch {
            'l' | 'L' => Some(Command::Load),
            'x' | 'X' => Some(Command::Export),
            'n' | 'N' => Some(Command::ResetForm),
            'r' | 'R' => Some(Command::Retry),
            'e' | 'E' => self.state.selected_id().map(Command::Edit),
            'd' | 'D' => self.state.selected_id().map(Command::Delete),
            _ => None,
        }
    }
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, state: &ViewState) -> Result<()> {
    terminal
        .draw(|frame| ui::render(frame, state))
        .map_err(|err| AppError::Terminal(err.to_string()))?;
    Ok(())
}

fn failed(operation: Operation, err: impl std::fmt::Display, retry: Option<Command>) -> Outcome {
    tracing::error!("failed to {}: {err}", operation.label());
    Outcome::Failed {
        operation,
        message: err.to_string(),
        retry,
    }
}
