//! Collection screen — the card grid of dog records.
//!
//! Selection moves through the grid with vim keys or arrows; `a` opens
//! the add form, `Enter`/`e` edits the selected dog, `d` asks to remove
//! it, `f` toggles its favorite flag, `r` forces a refresh.

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use kennel_core::DogRecord;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::card;

/// Minimum card width; the grid fits as many columns as the terminal
/// allows at this width.
const CARD_MIN_WIDTH: u16 = 30;

/// Columns the grid can fit at the given content width.
fn grid_columns(width: u16) -> usize {
    usize::from((width / CARD_MIN_WIDTH).max(1))
}

pub struct CollectionScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    dogs: Arc<Vec<Arc<DogRecord>>>,
    loading: bool,
    selected: usize,
    /// First visible grid row, kept so the selection stays on screen.
    scroll_row: Cell<usize>,
    /// Grid geometry from the last render, for key navigation.
    last_cols: Cell<usize>,
    last_visible_rows: Cell<usize>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl CollectionScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            dogs: Arc::new(Vec::new()),
            // The data bridge issues the initial refresh right away, so
            // start in the loading state like the web UI did.
            loading: true,
            selected: 0,
            scroll_row: Cell::new(0),
            last_cols: Cell::new(1),
            last_visible_rows: Cell::new(1),
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn selected_dog(&self) -> Option<&Arc<DogRecord>> {
        self.dogs.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        if self.dogs.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.dogs.len() - 1);
        }
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn move_selection(&mut self, delta: isize) {
        if self.dogs.is_empty() {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, self.dogs.len() as isize - 1);
        self.selected = next as usize;
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let count = self.dogs.len();
        let line = Line::from(vec![
            Span::styled("  🐕 My Dog Collection", theme::title_style()),
            Span::styled(
                format!(
                    "  ·  {count} dog{}",
                    if count == 1 { "" } else { "s" }
                ),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        let throbber = throbber_widgets_tui::Throbber::default()
            .label("Loading dogs...")
            .style(Style::default().fg(theme::HONEY));

        frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled("No dogs yet!", theme::title_style()))
                .alignment(Alignment::Center),
            layout[1],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press a to add your first dog",
                theme::key_hint(),
            ))
            .alignment(Alignment::Center),
            layout[2],
        );
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let cols = grid_columns(area.width);
        let visible_rows = usize::from((area.height / card::CARD_HEIGHT).max(1));
        self.last_cols.set(cols);
        self.last_visible_rows.set(visible_rows);

        // Keep the selected card's row in view.
        let selected_row = self.selected / cols;
        let mut scroll = self.scroll_row.get();
        if selected_row < scroll {
            scroll = selected_row;
        } else if selected_row >= scroll + visible_rows {
            scroll = selected_row + 1 - visible_rows;
        }
        self.scroll_row.set(scroll);

        let col_constraints: Vec<Constraint> =
            std::iter::repeat_n(Constraint::Ratio(1, cols as u32), cols).collect();

        for row in 0..visible_rows {
            let dog_row = scroll + row;
            let first = dog_row * cols;
            if first >= self.dogs.len() {
                break;
            }

            let row_area = Rect::new(
                area.x,
                area.y + u16::try_from(row).unwrap_or(0) * card::CARD_HEIGHT,
                area.width,
                card::CARD_HEIGHT.min(area.height.saturating_sub(
                    u16::try_from(row).unwrap_or(0) * card::CARD_HEIGHT,
                )),
            );
            if row_area.height < 3 {
                break;
            }

            let cells = Layout::horizontal(col_constraints.clone()).split(row_area);
            for (col, cell) in cells.iter().enumerate() {
                let idx = first + col;
                let Some(dog) = self.dogs.get(idx) else {
                    break;
                };
                card::render(frame, *cell, dog, self.focused && idx == self.selected);
            }
        }
    }
}

impl Component for CollectionScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let cols = self.last_cols.get();

        match key.code {
            // Grid navigation
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            #[allow(clippy::cast_possible_wrap)]
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-(cols as isize)),
            #[allow(clippy::cast_possible_wrap)]
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(cols as isize),
            KeyCode::Char('g') => self.selected = 0,
            KeyCode::Char('G') => self.selected = self.dogs.len().saturating_sub(1),

            // Intents
            KeyCode::Char('a') => return Ok(Some(Action::OpenCreateForm)),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(dog) = self.selected_dog() {
                    return Ok(Some(Action::OpenEditForm(dog.id.clone())));
                }
            }
            KeyCode::Char('d') => {
                if let Some(dog) = self.selected_dog() {
                    return Ok(Some(Action::RequestRemove(dog.id.clone())));
                }
            }
            KeyCode::Char('f') => {
                if let Some(dog) = self.selected_dog() {
                    return Ok(Some(Action::RequestToggleFavorite(dog.id.clone())));
                }
            }
            KeyCode::Char('r') => return Ok(Some(Action::RequestRefresh)),

            _ => {}
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DogsUpdated(dogs) => {
                self.dogs = Arc::clone(dogs);
                self.clamp_selection();
            }
            Action::LoadingChanged(loading) => {
                self.loading = *loading;
            }
            Action::Tick => {
                if self.loading {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // grid
        ])
        .split(area);

        self.render_header(frame, layout[0]);

        let content = layout[2];
        if self.dogs.is_empty() {
            if self.loading {
                self.render_loading(frame, content);
            } else {
                self.render_empty(frame, content);
            }
        } else {
            self.render_grid(frame, content);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
