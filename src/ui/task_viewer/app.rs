use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::filter::{Filter, ListView};
use crate::persistence::TaskPersistence;
use crate::store::TaskStore;
use crate::task::Task;

use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum InputMode {
    Normal,
    Insert,
}

pub struct AppState<P: TaskPersistence> {
    store: TaskStore<P>,
    pub(crate) filter: Filter,
    pub(crate) selected: Option<usize>,
    pub(crate) input: String,
    pub(crate) mode: InputMode,
    status: Option<(String, StatusKind)>,
}

impl<P: TaskPersistence> AppState<P> {
    pub fn new(store: TaskStore<P>, filter: Filter) -> Self {
        let mut app = Self {
            store,
            filter,
            selected: None,
            input: String::new(),
            mode: InputMode::Normal,
            status: None,
        };
        app.clamp_selection();
        app
    }

    pub(crate) fn view(&self) -> ListView<'_> {
        self.store.view(self.filter)
    }

    pub(crate) fn status_line(&self) -> Option<(&str, StatusKind)> {
        self.status
            .as_ref()
            .map(|(message, kind)| (message.as_str(), *kind))
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        match self.mode {
            InputMode::Insert => "enter add  esc done",
            InputMode::Normal => {
                "a add  space toggle  d delete  c clear completed  tab filter  q quit"
            }
        }
    }

    fn visible_len(&self) -> usize {
        self.view().tasks.len()
    }

    fn selected_task(&self) -> Option<Task> {
        let index = self.selected?;
        self.view().tasks.get(index).map(|task| (*task).clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected = match (len, self.selected) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(index)) => Some(index.min(len - 1)),
        };
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Info));
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Error));
    }

    fn report_write<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.set_error(format!("not saved: {err}"));
                None
            }
        }
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selected = None;
        self.clamp_selection();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected = Some(next as usize);
    }

    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        match self.store.add(&text) {
            Ok(Some(_)) => {
                self.set_info("task added");
                self.selected = Some(0);
            }
            // Blank input is dropped without a message.
            Ok(None) => {}
            Err(err) => {
                self.set_error(format!("not saved: {err}"));
                self.selected = Some(0);
            }
        }
        self.clamp_selection();
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let result = self.store.toggle(&task.id);
        if let Some(Some(completed)) = self.report_write(result) {
            self.set_info(if completed { "completed" } else { "reopened" });
        }
        self.clamp_selection();
    }

    fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let result = self.store.delete(&task.id);
        if let Some(Some(removed)) = self.report_write(result) {
            self.set_info(format!("deleted \"{}\"", removed.text));
        }
        self.clamp_selection();
    }

    fn clear_completed(&mut self) {
        let result = self.store.clear_completed();
        if let Some(removed) = self.report_write(result) {
            self.set_info(format!("cleared {removed} completed"));
        }
        self.clamp_selection();
    }

    /// Apply one key press; returns true when the viewer should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.mode {
            InputMode::Insert => {
                match key.code {
                    KeyCode::Enter => self.submit_input(),
                    KeyCode::Esc => self.mode = InputMode::Normal,
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Char(ch) => self.input.push(ch),
                    _ => {}
                }
                false
            }
            InputMode::Normal => {
                self.status = None;
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return true,
                    KeyCode::Char('a') | KeyCode::Char('i') => self.mode = InputMode::Insert,
                    KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
                    KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
                    KeyCode::Home | KeyCode::Char('g') => self.move_selection(isize::MIN / 2),
                    KeyCode::End | KeyCode::Char('G') => self.move_selection(isize::MAX / 2),
                    KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
                    KeyCode::Char('c') => self.clear_completed(),
                    KeyCode::Tab => self.set_filter(self.filter.next()),
                    KeyCode::Char('1') => self.set_filter(Filter::All),
                    KeyCode::Char('2') => self.set_filter(Filter::Active),
                    KeyCode::Char('3') => self.set_filter(Filter::Completed),
                    _ => {}
                }
                false
            }
        }
    }
}

pub fn run<P: TaskPersistence>(store: TaskStore<P>, filter: Filter) -> Result<()> {
    let mut app = AppState::new(store, filter);
    run_terminal(&mut app)
}

fn run_terminal<P: TaskPersistence>(app: &mut AppState<P>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err.into());
        }
    };

    let result = run_loop(&mut terminal, app);
    let restored = restore_terminal(&mut terminal);

    result?;
    restored?;
    Ok(())
}

/// Run every restore step even if an earlier one fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    first_failure([raw, screen, cursor])
}

fn first_failure(steps: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    steps.into_iter().collect()
}

fn run_loop<P: TaskPersistence>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<P>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
