//! One console session: the customers table plus its menus and dialogs.

use std::sync::Arc;
use std::time::Instant;

use deskkit::settings::SettingsProvider;
use deskkit::shell::{
    Activation, Close, Content, DeviceClassSource, ItemHandle, ItemProps, Outline, ShellError,
    ShellRoot, Trigger, Viewport,
};
use deskkit::table::{ColumnSort, RequestSeq, TableController, TableError};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::backend::{self, AccountStatus, Customer, CustomerStore, Fetcher, Response};
use crate::commands::{self, Command, CommandError};
use crate::config::ConsoleConfig;
use crate::render;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error("{0}")]
    Invalid(String),
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Nothing,
    Quit,
}

pub struct Session {
    table: TableController<Customer>,
    viewport: Viewport,
    gate_while_loading: bool,
    dispatched: Option<RequestSeq>,
    actions: ShellRoot,
    action_items: Vec<ItemHandle>,
    quick: ShellRoot,
    _quick_items: Vec<ItemHandle>,
    reset: ShellRoot,
}

impl Session {
    pub fn new(
        config: &ConsoleConfig,
        settings: SettingsProvider,
        store: Arc<CustomerStore>,
        responses: mpsc::UnboundedSender<Response>,
    ) -> Result<Self, SessionError> {
        let viewport = Viewport::new(config.viewport, config.initial_width);
        let fetcher = Fetcher::new(store, config.latency, responses);

        let table = TableController::builder(backend::columns())
            .config(config.table.clone())
            .persist(settings, config.layout_prefix.clone())
            .on_refetch(move |request| {
                fetcher.spawn(request.clone());
            })
            .build()?;

        let actions = ShellRoot::menu(Arc::new(viewport.clone()));

        let quick = ShellRoot::select(Arc::new(viewport.clone())).placeholder("Any status");
        let quick_scope = quick.scope();
        let quick_items = AccountStatus::ALL
            .iter()
            .map(|status| {
                let label = format!("Only {}", status);
                quick_scope.register(ItemProps::new(status.as_str(), label))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let reset = ShellRoot::dialog(Arc::new(viewport.clone()))
            .title("Reset column layout")
            .description("Restore the default columns and forget saved preferences?");

        Ok(Self {
            table,
            viewport,
            gate_while_loading: config.gate_while_loading,
            dispatched: None,
            actions,
            action_items: Vec::new(),
            quick,
            _quick_items: quick_items,
            reset,
        })
    }

    pub fn table(&self) -> &TableController<Customer> {
        &self.table
    }

    /// Issue the first load.
    pub fn start(&mut self) -> RequestSeq {
        let seq = self.table.reload();
        self.gate();
        seq
    }

    /// When pending filter edits are due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.table.next_deadline()
    }

    /// Commit filter edits whose quiet period has passed.
    pub fn tick(&mut self) -> Option<String> {
        let committed = self.table.tick();
        self.gate();
        committed.then(|| format!("filters committed | {}", render::footer(&self.table)))
    }

    /// Apply a finished fetch. Stale responses print nothing.
    pub fn apply(&mut self, response: Response) -> Option<String> {
        let Response { seq, page } = response;
        let applied = self.table.apply_response(seq, page.rows, page.page_count);
        self.gate();
        if !applied {
            log::info!("Ignored stale response {}", seq);
            return None;
        }
        Some(format!(
            "{}\n{} customers match",
            render::table(&self.table),
            page.total
        ))
    }

    /// Parse and run one input line.
    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, SessionError> {
        match commands::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Nothing),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        log::debug!("Command: {:?}", command);
        let outcome = self.run(command);
        self.gate();
        outcome
    }

    fn run(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let table = &mut self.table;
        let outcome = match command {
            Command::Page(page) => {
                table.set_page(page);
                self.footer()
            }
            Command::Next => {
                table.next_page();
                self.footer()
            }
            Command::Prev => {
                table.previous_page();
                self.footer()
            }
            Command::First => {
                table.first_page();
                self.footer()
            }
            Command::Last => {
                table.last_page();
                self.footer()
            }
            Command::Size(per_page) => {
                if !table.config().page_size_options.contains(&per_page) {
                    return Err(SessionError::Invalid(format!(
                        "page size must be one of {:?}",
                        table.config().page_size_options
                    )));
                }
                table.set_page_size(per_page)?;
                self.footer()
            }
            Command::Sort { column, direction } => {
                let sort = direction.map(|direction| ColumnSort {
                    column,
                    direction,
                });
                table.set_sort(sort)?;
                self.footer()
            }
            Command::ToggleSort(column) => {
                table.toggle_sort(&column)?;
                self.footer()
            }
            Command::Filter { column, value } => {
                table.set_filter(&column, value)?;
                self.pending(&column)
            }
            Command::Clear(column) => {
                table.clear_filter(&column)?;
                self.pending(&column)
            }
            Command::Flush => {
                if table.commit_filters() {
                    self.footer()
                } else {
                    Outcome::Print("no filter changes pending".to_string())
                }
            }
            Command::Hide(column) => {
                table.set_column_visibility(&column, false)?;
                self.grid()
            }
            Command::Show(column) => {
                table.set_column_visibility(&column, true)?;
                self.grid()
            }
            Command::Move { column, index } => {
                table.move_column(&column, index)?;
                self.grid()
            }
            Command::Width { column, width } => {
                table.set_column_size(&column, width)?;
                self.grid()
            }
            Command::Select(row) => {
                if !table.rows().iter().any(|c| c.id.to_string() == row) {
                    return Err(SessionError::Invalid(format!("no row {} on this page", row)));
                }
                table.toggle_row_selected(&row);
                self.grid()
            }
            Command::SelectAll => {
                table.select_all_rows();
                self.grid()
            }
            Command::Unselect => {
                table.clear_selection();
                self.grid()
            }
            Command::Viewport(width) => {
                self.viewport.set_width(width);
                Outcome::Print(format!(
                    "viewport {}px ({:?})",
                    self.viewport.width(),
                    self.viewport.device_class()
                ))
            }
            Command::Actions => self.open_actions()?,
            Command::Pick(value) => self.pick(&value)?,
            Command::Quick(None) => {
                self.actions.close();
                self.quick.open();
                self.show(&self.quick, "Status")?
            }
            Command::Quick(Some(status)) => {
                self.actions.close();
                self.quick.open();
                self.pick(&status)?
            }
            Command::Reset => {
                self.reset.open();
                let scope = self.reset.scope();
                let dialog = Content::new(&scope).render(&Outline)?;
                let cancel = Close::new(&scope, "Cancel").render(&Outline)?;
                Outcome::Print(format!(
                    "{}\n{}\n(confirm or cancel)",
                    dialog.map(|node| node.to_string()).unwrap_or_default(),
                    cancel
                ))
            }
            Command::Confirm => {
                if !self.reset.is_open() {
                    return Err(SessionError::Invalid("nothing to confirm".to_string()));
                }
                self.table.reset_layout();
                self.reset.close();
                self.grid()
            }
            Command::Cancel => {
                let scope = self.reset.scope();
                let closed = Close::new(&scope, "Cancel")
                    .on_click(|| log::debug!("Layout reset cancelled"))
                    .click()?;
                let closed = self.actions.close() | self.quick.close() | closed;
                Outcome::Print(if closed { "closed" } else { "nothing open" }.to_string())
            }
            Command::Reload => {
                self.table.reload();
                self.footer()
            }
            Command::Status => Outcome::Print(render::status(&self.table)),
            Command::Help => Outcome::Print(commands::HELP.to_string()),
            Command::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }

    /// Rebuild the row actions for the current selection and open the menu.
    fn open_actions(&mut self) -> Result<Outcome, SessionError> {
        let scope = self.actions.scope();
        let selected = self.table.selected_row_ids().len();

        // Dropping the old handles unregisters the previous items.
        self.action_items.clear();
        self.action_items.push(scope.register(
            ItemProps::new("export", "Export page").on_select(|_| log::info!("Export requested")),
        )?);
        if selected > 0 {
            self.action_items.push(scope.register(ItemProps::new(
                "pause",
                format!("Pause {} account(s)", selected),
            ))?);
        }
        self.action_items.push(
            scope.register(
                ItemProps::new("delete", "Delete selected")
                    .destructive()
                    .hidden(selected == 0),
            )?,
        );

        self.quick.close();
        self.actions.open();
        self.show(&self.actions, "Actions")
    }

    /// Activate an item in whichever shell is open.
    fn pick(&mut self, value: &str) -> Result<Outcome, SessionError> {
        if self.actions.is_open() {
            let scope = self.actions.scope();
            let activation = Content::new(&scope).activate(value)?;
            let text = match activation {
                Activation::Selected(action) => self.run_action(&action),
                Activation::Cleared | Activation::Ignored => format!("{} ignored", value),
            };
            return Ok(Outcome::Print(text));
        }
        if self.quick.is_open() {
            let scope = self.quick.scope();
            match Content::new(&scope).activate(value)? {
                Activation::Selected(status) => {
                    self.table.set_filter("status", status)?;
                }
                Activation::Cleared => {
                    self.table.clear_filter("status")?;
                }
                Activation::Ignored => return Ok(Outcome::Nothing),
            }
            self.table.commit_filters();
            return Ok(self.footer());
        }
        Err(SessionError::Invalid("no menu is open".to_string()))
    }

    fn run_action(&mut self, action: &str) -> String {
        let selected = self.table.selected_row_ids();
        match action {
            "export" => format!("exported {} rows", self.table.rows().len()),
            "pause" => format!("paused accounts {}", selected.join(", ")),
            "delete" => {
                self.table.clear_selection();
                format!("deleted accounts {}", selected.join(", "))
            }
            other => format!("{} done", other),
        }
    }

    fn show(&self, root: &ShellRoot, label: &str) -> Result<Outcome, SessionError> {
        let scope = root.scope();
        let text = render::shell(&Trigger::new(&scope, label), &Content::new(&scope))?;
        Ok(Outcome::Print(text))
    }

    fn footer(&self) -> Outcome {
        Outcome::Print(render::footer(&self.table))
    }

    fn grid(&self) -> Outcome {
        Outcome::Print(render::table(&self.table))
    }

    fn pending(&self, column: &str) -> Outcome {
        let value = self
            .table
            .pending_filter(column)
            .map(|value| value.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        Outcome::Print(format!("{} filter -> {} (pending)", column, value))
    }

    /// Hold back further refetches until the outstanding one answers.
    fn gate(&mut self) {
        if !self.gate_while_loading {
            return;
        }
        let latest = self.table.latest_request();
        if latest != self.dispatched {
            self.dispatched = latest;
            self.table.set_loading(true);
        }
    }
}
