use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::context::Context;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::board::Board;
use crate::model::config::Config;
use crate::model::task::TaskState;
use crate::model::user::User;
use crate::ops::cache::BoardCache;
use crate::ops::search::{SearchQuery, apply_search};
use crate::ops::store::{Mutation, OpError, Store};
use crate::ops::subtask_editor::SubtaskEditor;
use crate::render::view::{BoardView, ContactListView};

use super::input;
use super::render;
use super::theme::Theme;
use super::worker::{Reply, Request, Rollback, Worker};

/// Top-level pages, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    Contacts,
    Summary,
}

impl View {
    pub const ALL: [View; 3] = [View::Board, View::Contacts, View::Summary];

    pub fn label(self) -> &'static str {
        match self {
            View::Board => "Board",
            View::Contacts => "Contacts",
            View::Summary => "Summary",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            View::Board => "board",
            View::Contacts => "contacts",
            View::Summary => "summary",
        }
    }

    fn parse(s: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Next (or previous, for negative steps) tab, wrapping around
    pub fn cycle(self, step: isize) -> View {
        let len = View::ALL.len() as isize;
        let i = View::ALL.iter().position(|&v| v == self).unwrap_or(0) as isize;
        View::ALL[(i + step).rem_euclid(len) as usize]
    }
}

/// What keys currently do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the search prompt
    Search,
    /// Choosing a column for task `key`
    Move { key: String, target: TaskState },
    /// The task popup is open
    Detail,
}

/// The open task popup
#[derive(Debug, Clone)]
pub struct DetailState {
    pub key: String,
    pub editor: SubtaskEditor,
    /// Selected subtask row
    pub cursor: usize,
    /// Text of a subtask being added
    pub adding: Option<String>,
    /// Waiting for `y` to delete the task
    pub confirm_delete: bool,
}

/// Main application state
pub struct App {
    pub cache: BoardCache,
    pub user_key: String,
    pub view: View,
    pub mode: Mode,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Focused board column
    pub column: usize,
    /// Selected card among the visible cards of the focused column
    pub row: usize,
    pub contact_row: usize,
    pub search_input: String,
    pub query: SearchQuery,
    pub detail: Option<DetailState>,
    /// One-line message for the status row
    pub status: Option<String>,
    pub today: NaiveDate,
    pub should_quit: bool,
    in_flight: usize,
    outbox: Vec<Request>,
}

impl App {
    pub fn new(user_key: &str, config: &Config, today: NaiveDate) -> Self {
        App {
            cache: BoardCache::new(),
            user_key: user_key.to_string(),
            view: View::Board,
            mode: Mode::Navigate,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            column: 0,
            row: 0,
            contact_row: 0,
            search_input: String::new(),
            query: SearchQuery::empty(),
            detail: None,
            status: None,
            today,
            should_quit: false,
            in_flight: 0,
            outbox: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        self.cache.board()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.board().user(&self.user_key)
    }

    pub fn board_view(&self) -> BoardView {
        BoardView::build(self.board())
    }

    pub fn contact_list(&self) -> ContactListView {
        ContactListView::build(self.board(), Some(&self.user_key))
    }

    /// Keys of the cards currently shown in a column, top to bottom
    pub fn visible_keys(&self, column: usize) -> Vec<String> {
        let view = self.board_view();
        let searched = apply_search(&view, &self.query);
        searched
            .columns
            .get(column)
            .map(|col| col.visible_cards().map(|c| c.card.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn selected_key(&self) -> Option<String> {
        self.visible_keys(self.column).into_iter().nth(self.row)
    }

    /// Put the cursor on a card, if it is visible
    pub fn select_key(&mut self, key: &str) {
        for column in 0..TaskState::ALL.len() {
            if let Some(row) = self.visible_keys(column).iter().position(|k| k == key) {
                self.column = column;
                self.row = row;
                return;
            }
        }
    }

    pub fn clamp_cursors(&mut self) {
        self.column = self.column.min(TaskState::ALL.len() - 1);
        let cards = self.visible_keys(self.column).len();
        self.row = self.row.min(cards.saturating_sub(1));
        let contacts = self.board().users.len();
        self.contact_row = self.contact_row.min(contacts.saturating_sub(1));
    }

    pub fn set_search(&mut self, text: &str) {
        let selected = self.selected_key();
        self.search_input = text.to_string();
        self.query = SearchQuery::parse(text);
        if let Some(key) = selected {
            self.select_key(&key);
        }
        self.clamp_cursors();
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // -----------------------------------------------------------------------
    // Remote work
    // -----------------------------------------------------------------------

    pub fn request_reload(&mut self) {
        let ticket = self.cache.begin_reload();
        self.outbox.push(Request::Reload(ticket));
    }

    /// Queue a planned change, or show why it could not be planned
    pub fn submit(&mut self, planned: Result<Mutation, OpError>) {
        match planned {
            Ok(mutation) => {
                self.in_flight += 1;
                self.outbox.push(Request::Commit {
                    mutation,
                    rollback: None,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "change rejected");
                self.flash(e.to_string());
            }
        }
    }

    /// Move a card right away and queue the write; the card jumps back if
    /// the write fails.
    pub fn commit_move(&mut self, key: &str, target: TaskState) {
        let Some(previous) = self.cache.apply_task_state(key, target) else {
            self.flash(OpError::TaskNotFound(key.to_string()).to_string());
            return;
        };
        self.in_flight += 1;
        self.outbox.push(Request::Commit {
            mutation: Mutation::MoveTask {
                key: key.to_string(),
                state: target,
            },
            rollback: Some(Rollback {
                key: key.to_string(),
                previous_state: previous,
            }),
        });
        self.select_key(key);
        self.after_board_change();
    }

    /// Requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn handle_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Reloaded {
                ticket,
                result: Ok(board),
            } => {
                let selected = self.selected_key();
                if self.cache.finish_reload(ticket, board) {
                    if let Some(key) = selected {
                        self.select_key(&key);
                    }
                    self.after_board_change();
                }
            }
            Reply::Reloaded { result: Err(e), .. } => {
                tracing::warn!(error = %e, "reload failed");
                self.flash(format!("reload failed: {}", e));
            }
            Reply::Committed {
                mutation,
                error: None,
                ..
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                mutation.apply(&mut self.cache);
                self.flash(mutation.describe());
                self.after_board_change();
                if self.in_flight == 0 {
                    self.request_reload();
                }
            }
            Reply::Committed {
                rollback,
                error: Some(e),
                ..
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if let Some(rb) = rollback {
                    self.cache.restore_task_state(&rb.key, rb.previous_state);
                    self.select_key(&rb.key);
                }
                self.flash(format!("could not save: {}", e));
                self.after_board_change();
                // A multi-step write may have partly landed
                if self.in_flight == 0 {
                    self.request_reload();
                }
            }
        }
    }

    /// Re-derive everything that depends on the cached board
    fn after_board_change(&mut self) {
        self.clamp_cursors();
        let Some(detail) = &mut self.detail else {
            return;
        };
        match self.cache.board().task(&detail.key) {
            None => {
                self.detail = None;
                if self.mode == Mode::Detail {
                    self.mode = Mode::Navigate;
                }
            }
            Some(task) => {
                if detail.editor.editing().is_none() && detail.adding.is_none() {
                    detail.editor = SubtaskEditor::from_task(task);
                    detail.cursor = detail.cursor.min(detail.editor.len().saturating_sub(1));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Task popup
    // -----------------------------------------------------------------------

    pub fn open_detail(&mut self, key: &str) {
        let Some(task) = self.board().task(key) else {
            return;
        };
        self.detail = Some(DetailState {
            key: key.to_string(),
            editor: SubtaskEditor::from_task(task),
            cursor: 0,
            adding: None,
            confirm_delete: false,
        });
        self.mode = Mode::Detail;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // Persisted UI state
    // -----------------------------------------------------------------------

    pub fn ui_state(&self) -> UiState {
        UiState {
            view: self.view.as_str().to_string(),
            column: self.column,
            last_search: (!self.search_input.is_empty()).then(|| self.search_input.clone()),
        }
    }

    pub fn restore(&mut self, state: &UiState) {
        if let Some(view) = View::parse(&state.view) {
            self.view = view;
        }
        self.column = state.column.min(TaskState::ALL.len() - 1);
        if let Some(search) = &state.last_search {
            self.set_search(search);
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

pub fn run(ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    let user_key = ctx.session.require_user()?;
    let store = Store::connect(&ctx.config.remote, &ctx.session.board_id)?;
    let worker = Worker::spawn(store.client().clone())?;

    let mut app = App::new(&user_key, &ctx.config, ctx.today());
    if let Some(state) = read_ui_state(&ctx.config_dir) {
        app.restore(&state);
    }
    app.request_reload();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &worker);

    save_ui_state(&app, &ctx.config_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &Worker,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for request in app.take_requests() {
            worker.send(request);
        }
        for reply in worker.poll() {
            app.handle_reply(reply);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn save_ui_state(app: &App, dir: &Path) {
    if let Err(e) = write_ui_state(dir, &app.ui_state()) {
        tracing::warn!(error = %e, "could not save ui state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{loaded_app, sample_board};

    #[test]
    fn view_cycles_and_wraps() {
        assert_eq!(View::Board.cycle(1), View::Contacts);
        assert_eq!(View::Summary.cycle(1), View::Board);
        assert_eq!(View::Board.cycle(-1), View::Summary);
    }

    #[test]
    fn search_keeps_the_selected_card_when_still_visible() {
        let mut app = loaded_app();
        app.row = 1;
        assert_eq!(app.selected_key().as_deref(), Some("task1"));
        app.set_search("schema");
        assert_eq!(app.visible_keys(0), vec!["task1".to_string()]);
        assert_eq!(app.selected_key().as_deref(), Some("task1"));
    }

    #[test]
    fn optimistic_move_is_rolled_back_on_failure() {
        let mut app = loaded_app();
        app.commit_move("task0", TaskState::InProgress);
        assert_eq!(app.board().task("task0").unwrap().task_state, "in-progress");
        assert_eq!((app.column, app.row), (1, 0));

        let mut requests = app.take_requests();
        assert_eq!(requests.len(), 1);
        let Request::Commit { mutation, rollback } = requests.remove(0) else {
            panic!("expected a commit");
        };
        app.handle_reply(Reply::Committed {
            mutation,
            rollback,
            error: Some("PATCH b/tasks/task0 returned 503".into()),
        });
        assert_eq!(app.board().task("task0").unwrap().task_state, "to-do");
        assert_eq!((app.column, app.row), (0, 0));
        assert!(app.status.as_deref().unwrap().starts_with("could not save"));
        assert!(!app.is_busy());
    }

    #[test]
    fn failed_commit_reloads_once_idle() {
        let mut app = loaded_app();
        app.submit(crate::ops::contact_ops::delete_contact(app.board(), "BK100"));
        let Some(Request::Commit { mutation, rollback }) = app.take_requests().pop() else {
            panic!("expected a commit");
        };
        app.handle_reply(Reply::Committed {
            mutation,
            rollback,
            error: Some("PATCH b/tasks/task0 returned 503".into()),
        });
        let follow_up = app.take_requests();
        assert_eq!(follow_up.len(), 1);
        assert!(matches!(follow_up[0], Request::Reload(_)));
    }

    #[test]
    fn successful_commit_applies_and_reloads_once_idle() {
        let mut app = loaded_app();
        app.submit(crate::ops::task_ops::delete_task(app.board(), "task2"));
        app.submit(crate::ops::task_ops::delete_task(app.board(), "task1"));
        let requests = app.take_requests();
        assert_eq!(requests.len(), 2);

        let mut replies = requests.into_iter().map(|r| match r {
            Request::Commit { mutation, rollback } => Reply::Committed {
                mutation,
                rollback,
                error: None,
            },
            Request::Reload(_) => panic!("unexpected reload"),
        });
        app.handle_reply(replies.next().unwrap());
        assert!(app.board().task("task2").is_none());
        assert!(app.take_requests().is_empty());

        app.handle_reply(replies.next().unwrap());
        let follow_up = app.take_requests();
        assert_eq!(follow_up.len(), 1);
        assert!(matches!(follow_up[0], Request::Reload(_)));
    }

    #[test]
    fn stale_reload_is_ignored() {
        let mut app = loaded_app();
        app.request_reload();
        app.request_reload();
        let tickets: Vec<_> = app
            .take_requests()
            .into_iter()
            .map(|r| match r {
                Request::Reload(t) => t,
                Request::Commit { .. } => panic!("unexpected commit"),
            })
            .collect();

        let mut newer = sample_board();
        newer.tasks.truncate(1);
        app.handle_reply(Reply::Reloaded {
            ticket: tickets[1],
            result: Ok(newer),
        });
        app.handle_reply(Reply::Reloaded {
            ticket: tickets[0],
            result: Ok(sample_board()),
        });
        assert_eq!(app.board().tasks.len(), 1);
    }

    #[test]
    fn reload_keeps_the_active_search() {
        let mut app = loaded_app();
        app.set_search("login");
        assert_eq!(app.visible_keys(0), vec!["task0".to_string()]);

        app.request_reload();
        let Some(Request::Reload(ticket)) = app.take_requests().pop() else {
            panic!("expected a reload");
        };
        let mut newer = sample_board();
        if let Some(task) = newer.task_mut("task1") {
            task.title = "Login audit table".into();
        }
        let mut added = crate::model::task::Task::new("Fix login bug", TaskState::Done);
        added.id = "task4".into();
        newer.tasks.push(added);
        app.handle_reply(Reply::Reloaded {
            ticket,
            result: Ok(newer),
        });

        assert_eq!(app.search_input, "login");
        assert_eq!(
            app.visible_keys(0),
            vec!["task0".to_string(), "task1".to_string()]
        );
        assert_eq!(app.visible_keys(3), vec!["task4".to_string()]);
        let view = app.board_view();
        let searched = apply_search(&view, &app.query);
        let done: Vec<_> = searched.columns[3].visible_cards().collect();
        assert_eq!(done[0].title_hits, vec![4..9]);
        assert_eq!(searched.columns[0].cards[1].title_hits, vec![0..5]);
    }

    #[test]
    fn rejected_change_shows_the_reason() {
        let mut app = loaded_app();
        app.submit(crate::ops::task_ops::delete_task(app.board(), "task9"));
        assert!(app.take_requests().is_empty());
        assert!(app.status.as_deref().unwrap().contains("task9"));
    }

    #[test]
    fn detail_closes_when_task_disappears() {
        let mut app = loaded_app();
        app.open_detail("task2");
        assert_eq!(app.mode, Mode::Detail);
        app.submit(crate::ops::task_ops::delete_task(app.board(), "task2"));
        for request in app.take_requests() {
            if let Request::Commit { mutation, rollback } = request {
                app.handle_reply(Reply::Committed {
                    mutation,
                    rollback,
                    error: None,
                });
            }
        }
        assert!(app.detail.is_none());
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn ui_state_round_trips_through_restore() {
        let mut app = loaded_app();
        app.view = View::Contacts;
        app.column = 3;
        app.set_search("deploy");
        let state = app.ui_state();

        let mut fresh = loaded_app();
        fresh.restore(&state);
        assert_eq!(fresh.view, View::Contacts);
        assert_eq!(fresh.search_input, "deploy");
        assert_eq!(fresh.visible_keys(3), vec!["task2".to_string()]);
    }
}
