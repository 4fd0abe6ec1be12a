//! Ratatui-based terminal UI.
//!
//! Two tabs mirror the two ways of asking for a prediction: a form with all
//! nine attributes, and the fixed example product. Results stay on screen
//! until a later prediction succeeds; failures only touch the status line.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};
use tracing::{info, warn};

use crate::app::Session;
use crate::domain::{Prediction, RawAttributes};
use crate::error::{AppError, EXIT_INPUT};

mod form;

use form::FormField;

/// How many past predictions the history panel keeps.
const HISTORY_LEN: usize = 5;

/// Start the TUI.
pub fn run(session: Session) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| terminal_error("Failed to initialize terminal", e))?;

    let mut app = App::new(session);
    app.event_loop(&mut terminal)
}

/// Terminal setup and event failures exit as I/O errors.
fn terminal_error(context: &str, err: io::Error) -> AppError {
    AppError::new(EXIT_INPUT, format!("{context}: {err}"))
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| terminal_error("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error("Failed to enter alternate screen", e));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Input,
    Example,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Input => 0,
            Tab::Example => 1,
        }
    }

    fn toggle(self) -> Self {
        match self {
            Tab::Input => Tab::Example,
            Tab::Example => Tab::Input,
        }
    }
}

struct App {
    session: Session,
    tab: Tab,
    form: RawAttributes,
    selected_field: usize,
    /// Text buffer while a numeric field is being typed in.
    editing: Option<String>,
    /// Last successful result per tab.
    input_result: Option<Prediction>,
    example_result: Option<Prediction>,
    history: Vec<Prediction>,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        let status = format!("model: {}", session.describe_model());
        Self {
            session,
            tab: Tab::Input,
            form: RawAttributes::default(),
            selected_field: 0,
            editing: None,
            input_result: None,
            example_result: None,
            history: Vec::new(),
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| terminal_error("Terminal draw error", e))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| terminal_error("Event poll error", e))?
            {
                continue;
            }

            match event::read().map_err(|e| terminal_error("Event read error", e))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.toggle();
                self.status = match self.tab {
                    Tab::Input => "Predict via input.".to_string(),
                    Tab::Example => "Hardcoded example.".to_string(),
                };
            }
            KeyCode::Char('p') => self.predict(),
            _ if self.tab == Tab::Example => {}
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FormField::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                let field = FormField::ALL[self.selected_field];
                if field.is_numeric() {
                    self.editing = Some(field.display_value(&self.form));
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
                }
            }
            KeyCode::Char('r') => {
                self.form = RawAttributes::default();
                self.status = "Form reset.".to_string();
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let text = buffer.trim().to_string();
                self.editing = None;
                let field = FormField::ALL[self.selected_field];
                match field.set_from_text(&mut self.form, &text) {
                    Ok(()) => self.status = format!("{}: {}", field.label(), field.display_value(&self.form)),
                    Err(message) => self.status = message,
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let field = FormField::ALL[self.selected_field];
        field.step(&mut self.form, delta);
        self.status = format!("{}: {}", field.label(), field.display_value(&self.form));
    }

    /// Run the pipeline for the active tab.
    ///
    /// On failure the previous result stays visible and the error goes to the
    /// status line.
    fn predict(&mut self) {
        let raw = match self.tab {
            Tab::Input => self.form.clone(),
            Tab::Example => RawAttributes::reference_example(),
        };

        match self.session.predict(&raw) {
            Ok(prediction) => {
                info!(value = prediction.value, tab = ?self.tab, "prediction");
                self.status = crate::report::format_prediction(&prediction);
                self.history.insert(0, prediction.clone());
                self.history.truncate(HISTORY_LEN);
                match self.tab {
                    Tab::Input => self.input_result = Some(prediction),
                    Tab::Example => self.example_result = Some(prediction),
                }
            }
            Err(err) => {
                warn!(error = %err, "prediction failed");
                self.status = format!("Prediction failed: {err}");
            }
        }
    }

    fn current_result(&self) -> Option<&Prediction> {
        match self.tab {
            Tab::Input => self.input_result.as_ref(),
            Tab::Example => self.example_result.as_ref(),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let scaling = match (self.session.has_scaler(), self.session.scaling()) {
            (false, _) => "none".to_string(),
            (true, policy) => format!("{policy:?}").to_lowercase(),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("bigmart", Style::default().fg(Color::Cyan)),
                Span::raw(" - BigMart Sales Predictor"),
            ]),
            Line::from(Span::styled(
                format!(
                    "model: {} | scaler: {scaling} | ranges: {:?}",
                    self.session.describe_model(),
                    self.session.encoder().range_policy,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs = Tabs::new(vec!["Predict via Input", "Test Hardcoded Example"])
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        match self.tab {
            Tab::Input => self.draw_form(frame, chunks[0]),
            Tab::Example => self.draw_example(frame, chunks[0]),
        }
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FormField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match (&self.editing, i == self.selected_field) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => field.display_value(&self.form),
                };
                let hint = if field.is_numeric() { "" } else { " ◂▸" };
                ListItem::new(format!("{:<26} {value}{hint}", field.label()))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Enter Product and Outlet Details")
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_example(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = crate::report::format_example_input(&RawAttributes::reference_example());
        let p = Paragraph::new(text).block(
            Block::default()
                .title("Hardcoded Example Input")
                .borders(Borders::ALL),
        );
        frame.render_widget(p, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        match self.current_result() {
            Some(prediction) => {
                lines.push(Line::from(Span::styled(
                    crate::report::format_prediction(prediction),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("at {}", prediction.at.format("%H:%M:%S")),
                    Style::default().fg(Color::Gray),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "Press p to predict.",
                Style::default().fg(Color::Yellow),
            ))),
        }

        if !self.history.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("History", Style::default().add_modifier(Modifier::BOLD))));
            for p in &self.history {
                lines.push(Line::raw(format!(
                    "{}  {}",
                    p.at.format("%H:%M:%S"),
                    crate::report::format_currency(p.value)
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Result").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.tab {
            Tab::Input => "Tab switch  ↑/↓ select  ←/→ adjust  Enter type value  p predict  r reset  q quit",
            Tab::Example => "Tab switch  p predict  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
