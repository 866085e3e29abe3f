//! Interactive checklist for choosing which candidates to remove.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;

use crate::cleaner::{Candidate, CleanerError, Selector};

struct Row {
    label: String,
    path: PathBuf,
    checked: bool,
}

/// Checklist state, independent of the terminal.
pub struct PickerState {
    rows: Vec<Row>,
    pub state: ListState,
}

impl PickerState {
    pub fn new(candidates: &[Candidate], default_selected: bool) -> Self {
        let mut state = ListState::default();
        state.select(if candidates.is_empty() { None } else { Some(0) });

        Self {
            rows: candidates
                .iter()
                .map(|c| Row {
                    label: c.label(),
                    path: c.path.clone(),
                    checked: default_selected,
                })
                .collect(),
            state,
        }
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) if i >= self.rows.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Flip the row under the cursor.
    pub fn toggle(&mut self) {
        if let Some(row) = self.state.selected().and_then(|i| self.rows.get_mut(i)) {
            row.checked = !row.checked;
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for row in &mut self.rows {
            row.checked = checked;
        }
    }

    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|r| r.checked).count()
    }

    /// Checked paths in display order.
    pub fn chosen(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|r| r.checked)
            .map(|r| r.path.clone())
            .collect()
    }
}

/// Terminal checklist implementing [`Selector`].
#[derive(Debug, Clone)]
pub struct Picker {
    title: String,
}

impl Picker {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn run(&self, picker: &mut PickerState) -> io::Result<bool> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = self.event_loop(&mut terminal, picker);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Returns `true` when the operator confirmed, `false` when cancelled.
    fn event_loop<B: ratatui::backend::Backend>(
        &self,
        terminal: &mut Terminal<B>,
        picker: &mut PickerState,
    ) -> io::Result<bool> {
        loop {
            terminal.draw(|f| render(f, &self.title, picker))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => picker.select_next(),
                    KeyCode::Up | KeyCode::Char('k') => picker.select_previous(),
                    KeyCode::Char(' ') => picker.toggle(),
                    KeyCode::Char('a') => picker.set_all(true),
                    KeyCode::Char('n') => picker.set_all(false),
                    KeyCode::Enter => return Ok(true),
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new("Select node_modules directories to remove")
    }
}

impl Selector for Picker {
    fn select(
        &mut self,
        candidates: &[Candidate],
        default_selected: bool,
    ) -> Result<Vec<PathBuf>, CleanerError> {
        let mut picker = PickerState::new(candidates, default_selected);
        let confirmed = self.run(&mut picker).map_err(|e| CleanerError::Selection {
            reason: e.to_string(),
        })?;

        if confirmed {
            Ok(picker.chosen())
        } else {
            Ok(Vec::new())
        }
    }
}

fn render(f: &mut Frame, title: &str, picker: &mut PickerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Checklist
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    let items: Vec<ListItem> = picker
        .rows
        .iter()
        .map(|row| {
            let (mark, style) = if row.checked {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::raw(row.label.clone()),
            ]))
        })
        .collect();

    let block_title = format!(
        " {} ({}/{} selected) ",
        title,
        picker.checked_count(),
        picker.rows.len()
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(block_title))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, chunks[0], &mut picker.state);
    render_help_bar(f, chunks[1]);
}

fn render_help_bar(f: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let sep_style = Style::default().fg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let mut spans = Vec::new();
    for (i, (key, action)) in [
        ("↑↓", ":Navigate "),
        (" Space", ":Toggle "),
        (" a/n", ":All/None "),
        (" Enter", ":Confirm "),
        (" Esc", ":Cancel"),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled("│", sep_style));
        }
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(action, text_style));
    }

    let help = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(help, area);
}
