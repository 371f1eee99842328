use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::controller::{ListController, ListEvent, ListState};

use super::helpers::{centered_rect, surface_error};

/// Footer space reserved for the status line and key legend.
const FOOTER_HEIGHT: u16 = 3;
/// Column widths for the product table: Id, Name, Price, Stock.
const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Length(6),
    Constraint::Min(16),
    Constraint::Length(12),
    Constraint::Length(8),
];

/// Severity of the footer message, inferred from its text.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn of(message: &str) -> Self {
        if message.starts_with("Error:") {
            StatusKind::Error
        } else {
            StatusKind::Info
        }
    }

    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal-side view of the controller. The app keeps its own copy of the
/// list state, updated only from controller events, plus the table cursor.
pub struct App {
    controller: ListController,
    events: Receiver<ListEvent>,
    view: ListState,
    selected: usize,
    pending: Vec<JoinHandle<()>>,
}

impl App {
    /// Subscribe to `controller`. Call this before
    /// [`ListController::initialize`] so the first load is not missed.
    pub fn new(controller: ListController) -> Self {
        let events = controller.subscribe();
        let view = controller.snapshot();
        Self {
            controller,
            events,
            view,
            selected: 0,
            pending: Vec::new(),
        }
    }

    /// Apply every event the controller has published since the last tick
    /// and reap finished background commands.
    pub fn pump_events(&mut self) {
        for event in self.events.try_iter() {
            event.apply(&mut self.view);
        }
        self.ensure_in_bounds();
        self.pending.retain(|handle| !handle.is_finished());
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => {
                self.pending.push(self.controller.spawn_refresh());
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.pending.push(self.controller.spawn_export());
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.view.products.len().saturating_sub(1),
            _ => {}
        }
        Ok(false)
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        if self.view.products.is_empty() {
            self.draw_empty(frame, content_area);
        } else {
            self.draw_table(frame, content_area);
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Id", "Name", "Price", "Stock"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let rows = self.view.products.iter().map(|product| {
            Row::new(vec![
                Cell::from(product.id.to_string()),
                // Embedded newlines would break the row layout.
                Cell::from(product.name.replace('\n', " ")),
                Cell::from(Line::from(product.price.to_string()).alignment(Alignment::Right)),
                Cell::from(Line::from(product.stock.to_string()).alignment(Alignment::Right)),
            ])
        });

        let title = format!(" Products ({}) ", self.view.products.len());
        let table = Table::new(rows, COLUMN_WIDTHS)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut table_state = TableState::default();
        table_state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn draw_empty(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Products ");
        frame.render_widget(block.clone(), area);

        let message = centered_rect(60, 30, block.inner(area));
        let paragraph = Paragraph::new(vec![
            Line::from("No products loaded."),
            Line::from("Press [r] to load from the store."),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, message);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status = &self.view.status_message;
        let status_line = Line::from(vec![Span::styled(
            status.clone(),
            StatusKind::of(status).style(),
        )]);

        let paragraph =
            Paragraph::new(vec![status_line, footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn open_last_export(&mut self) {
        let Some(path) = self.controller.last_export() else {
            self.view.status_message = "Nothing exported yet.".to_string();
            return;
        };

        if let Err(err) = open_path(&path) {
            let err = anyhow::Error::new(err).context(format!("failed to open {}", path.display()));
            warn!(error = %err, "could not open export");
            self.view.status_message = format!("Error: {}", surface_error(&err));
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.view.products.len();
        if len == 0 {
            return;
        }
        let target = self.selected as isize + offset;
        self.selected = target.clamp(0, len as isize - 1) as usize;
    }

    fn ensure_in_bounds(&mut self) {
        let len = self.view.products.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

fn footer_instructions() -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("[↑↓]", key_style),
        Span::raw(" Navigate   "),
        Span::styled("[r]", key_style),
        Span::raw(" Refresh   "),
        Span::styled("[e]", key_style),
        Span::raw(" Export CSV   "),
        Span::styled("[o]", key_style),
        Span::raw(" Open Export   "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit"),
    ])
}
