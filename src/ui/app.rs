use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::auth::{AuthEvent, DevIdentity, IdentityProvider};
use crate::config::Config;
use crate::error::Result;
use crate::events::{apply_event, AppEvent, UserAction};
use crate::memory::MemoryStore;
use crate::presenter::Presenter;
use crate::session::SessionController;
use crate::task::Filter;

const EVENT_POLL_MS: u64 = 120;

/// Which field of the add prompt has focus.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddField {
    Title,
    Due,
}

/// Modal text input state.
pub(crate) enum Prompt {
    Add {
        title: String,
        due: String,
        field: AddField,
    },
    Edit {
        id: String,
        title: String,
    },
}

pub struct App {
    pub(crate) presenter: Presenter,
    pub(crate) controller: SessionController,
    provider: Box<dyn IdentityProvider>,
    auth_rx: Receiver<AuthEvent>,
    pub(crate) selected: usize,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) notice: Option<String>,
}

impl App {
    fn new(
        presenter: Presenter,
        controller: SessionController,
        provider: Box<dyn IdentityProvider>,
        auth_rx: Receiver<AuthEvent>,
    ) -> Self {
        Self {
            presenter,
            controller,
            provider,
            auth_rx,
            selected: 0,
            prompt: None,
            notice: None,
        }
    }

    pub(crate) fn user_label(&self) -> Option<String> {
        self.controller.session().map(|session| {
            session
                .principal
                .email
                .clone()
                .unwrap_or_else(|| session.principal.display_name.clone())
        })
    }

    fn dispatch(&mut self, event: AppEvent) {
        let outcome = apply_event(
            &mut self.presenter,
            &mut self.controller,
            self.provider.as_ref(),
            event,
        );
        if let Some(notice) = outcome.notice {
            self.notice = Some(notice);
        }
    }

    /// Drain auth transitions and subscription pushes without blocking.
    fn drain_channels(&mut self) -> bool {
        let mut any = false;
        loop {
            match self.auth_rx.try_recv() {
                Ok(auth_event) => {
                    self.dispatch(AppEvent::Auth(auth_event));
                    any = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        let messages = self.controller.poll();
        for msg in messages {
            self.dispatch(msg.into());
            any = true;
        }
        if any {
            self.clamp_selection();
        }
        any
    }

    fn clamp_selection(&mut self) {
        let rows = self.presenter.view().rows.len();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    fn selected_row_id(&self) -> Option<String> {
        self.presenter
            .view()
            .rows
            .get(self.selected)
            .map(|row| row.id.clone())
    }

    fn selected_row_state(&self) -> Option<(String, String, bool)> {
        self.presenter
            .view()
            .rows
            .get(self.selected)
            .map(|row| (row.id.clone(), row.title.clone(), row.completed))
    }
}

/// Launch the task list UI against an in-process store.
pub fn run(config: Config) -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let (provider, auth_rx) = DevIdentity::new(&config.identity);
    let presenter = Presenter::new(store.clone());
    let controller = SessionController::new(store);
    let mut app = App::new(presenter, controller, Box::new(provider), auth_rx);
    run_terminal(&mut app)
}

fn run_terminal(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut dirty = true;
    loop {
        if app.drain_channels() {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| super::view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Returns true when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // A keypress replaces any stale notice.
    app.notice = None;

    if app.prompt.is_some() {
        handle_prompt_key(app, key);
        return false;
    }

    if !app.controller.is_signed_in() {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('s') | KeyCode::Enter => {
                app.dispatch(AppEvent::Action(UserAction::SignIn));
                false
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('s') => app.dispatch(AppEvent::Action(UserAction::SignOut)),
        KeyCode::Char('a') => {
            app.prompt = Some(Prompt::Add {
                title: String::new(),
                due: String::new(),
                field: AddField::Title,
            });
        }
        KeyCode::Char('e') => {
            if let Some((id, title, _)) = app.selected_row_state() {
                app.prompt = Some(Prompt::Edit { id, title });
            }
        }
        KeyCode::Char(' ') => {
            if let Some((id, _, completed)) = app.selected_row_state() {
                app.dispatch(AppEvent::Action(UserAction::Toggle {
                    id,
                    completed: !completed,
                }));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_row_id() {
                app.dispatch(AppEvent::Action(UserAction::Delete { id }));
            }
        }
        KeyCode::Char('c') => app.dispatch(AppEvent::Action(UserAction::ClearCompleted)),
        KeyCode::Char('1') => app.dispatch(AppEvent::Action(UserAction::SetFilter(Filter::All))),
        KeyCode::Char('2') => {
            app.dispatch(AppEvent::Action(UserAction::SetFilter(Filter::Active)))
        }
        KeyCode::Char('3') => {
            app.dispatch(AppEvent::Action(UserAction::SetFilter(Filter::Completed)))
        }
        KeyCode::Char('f') => {
            let next = app.presenter.filter().next();
            app.dispatch(AppEvent::Action(UserAction::SetFilter(next)));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected = app.selected.saturating_add(1);
            app.clamp_selection();
        }
        _ => {}
    }
    false
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.prompt = None;
        }
        KeyCode::Enter => {
            let prompt = app.prompt.take().expect("prompt present");
            submit_prompt(app, prompt);
        }
        KeyCode::Tab => {
            if let Prompt::Add { field, .. } = prompt {
                *field = match field {
                    AddField::Title => AddField::Due,
                    AddField::Due => AddField::Title,
                };
            }
        }
        KeyCode::Backspace => {
            prompt_buffer(prompt).pop();
        }
        KeyCode::Char(ch) => {
            prompt_buffer(prompt).push(ch);
        }
        _ => {}
    }
}

fn prompt_buffer(prompt: &mut Prompt) -> &mut String {
    match prompt {
        Prompt::Add {
            title,
            field: AddField::Title,
            ..
        } => title,
        Prompt::Add {
            due,
            field: AddField::Due,
            ..
        } => due,
        Prompt::Edit { title, .. } => title,
    }
}

fn submit_prompt(app: &mut App, prompt: Prompt) {
    match prompt {
        Prompt::Add { title, due, .. } => {
            let due_date = match parse_due(&due) {
                Ok(due_date) => due_date,
                Err(notice) => {
                    // Keep the prompt open so the date can be fixed.
                    app.notice = Some(notice);
                    app.prompt = Some(Prompt::Add {
                        title,
                        due,
                        field: AddField::Due,
                    });
                    return;
                }
            };
            app.dispatch(AppEvent::Action(UserAction::Add { title, due_date }));
        }
        Prompt::Edit { id, title } => {
            app.dispatch(AppEvent::Action(UserAction::Retitle { id, title }));
        }
    }
}

fn parse_due(raw: &str) -> std::result::Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid due date '{trimmed}' (expected YYYY-MM-DD)"))
}
