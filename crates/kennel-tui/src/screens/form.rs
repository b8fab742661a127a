//! Record form — the add/edit modal over the collection grid.
//!
//! A thin shell around `kennel_core::FormModel`: the state machine and
//! validation live in core, this component just edits the draft buffer
//! and renders it. Captures all keys while open; Esc cancels without
//! side effects.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use kennel_core::{DogRecord, Field, FormMode, FormModel};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

// ── Field focus ──────────────────────────────────────────────────────

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Breed,
    Age,
    Color,
    ImageUrl,
    Description,
    Favorite,
}

impl FormField {
    /// All fields in tab order.
    const ALL: [FormField; 7] = [
        Self::Name,
        Self::Breed,
        Self::Age,
        Self::Color,
        Self::ImageUrl,
        Self::Description,
        Self::Favorite,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Name => "  Name *",
            Self::Breed => "  Breed *",
            Self::Age => "  Age",
            Self::Color => "  Color",
            Self::ImageUrl => "  Photo URL",
            Self::Description => "  Description",
            Self::Favorite => "Mark as favorite",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "e.g., Buddy",
            Self::Breed => "e.g., Golden Retriever",
            Self::Age => "Age in years (0-30)",
            Self::Color => "e.g., Brown, Black, White",
            Self::ImageUrl => "https://example.com/dog-photo.jpg",
            Self::Description => "Tell us about this dog...",
            Self::Favorite => "",
        }
    }

    /// The validation field this input corresponds to, if it has rules.
    fn validation_field(self) -> Option<Field> {
        match self {
            Self::Name => Some(Field::Name),
            Self::Breed => Some(Field::Breed),
            Self::Age => Some(Field::Age),
            Self::ImageUrl => Some(Field::ImageUrl),
            Self::Color | Self::Description | Self::Favorite => None,
        }
    }
}

// ── Component ────────────────────────────────────────────────────────

pub struct FormScreen {
    action_tx: Option<UnboundedSender<Action>>,
    model: FormModel,
    active_field: FormField,
    /// Error from a failed remote call, shown on the same line as
    /// validation errors. Cleared on the next keystroke.
    remote_error: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl FormScreen {
    /// Form opened for a new record.
    pub fn create() -> Self {
        let mut model = FormModel::new();
        model.open_for_create();
        Self::with_model(model)
    }

    /// Form opened pre-filled with an existing record.
    pub fn edit(record: &DogRecord) -> Self {
        let mut model = FormModel::new();
        model.open_for_edit(record);
        Self::with_model(model)
    }

    fn with_model(model: FormModel) -> Self {
        Self {
            action_tx: None,
            model,
            active_field: FormField::Name,
            remote_error: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn title(&self) -> &'static str {
        match self.model.mode() {
            Some(FormMode::Edit(_)) => "Edit Dog",
            _ => "Add New Dog",
        }
    }

    // ── Field navigation ─────────────────────────────────────────────

    fn focus_next(&mut self) {
        let pos = FormField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field = FormField::ALL[(pos + 1) % FormField::ALL.len()];
    }

    fn focus_prev(&mut self) {
        let pos = FormField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field =
            FormField::ALL[(pos + FormField::ALL.len() - 1) % FormField::ALL.len()];
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        let field = self.active_field;
        let draft = self.model.draft_mut();
        match field {
            FormField::Name => Some(&mut draft.name),
            FormField::Breed => Some(&mut draft.breed),
            FormField::Age => Some(&mut draft.age),
            FormField::Color => Some(&mut draft.color),
            FormField::ImageUrl => Some(&mut draft.image_url),
            FormField::Description => Some(&mut draft.description),
            FormField::Favorite => None,
        }
    }

    // ── Submission plumbing (driven by App) ──────────────────────────

    /// The remote call failed: reopen for editing, values intact.
    pub fn submit_failed(&mut self, message: String) {
        self.model.submit_failed();
        self.remote_error = Some(message);
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_centered_panel(&self, frame: &mut Frame, area: Rect) -> Rect {
        let panel_w = 64u16.min(area.width.saturating_sub(4));
        let panel_h = 34u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(panel_w)) / 2;
        let y = (area.height.saturating_sub(panel_h)) / 2;
        let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    self.title(),
                    Style::default()
                        .fg(theme::HONEY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        inner
    }

    fn render_input_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: FormField,
        value: &str,
    ) {
        if area.height < 3 {
            return;
        }

        let active = self.active_field == field;
        let errored = self
            .model
            .error()
            .is_some_and(|e| field.validation_field() == Some(e.field));

        let label_style = if errored {
            Style::default().fg(theme::ERROR_RED)
        } else {
            theme::field_label(active)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(field.label(), label_style)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let border_style = if errored {
            Style::default().fg(theme::ERROR_RED)
        } else {
            theme::field_border(active)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
        let inner = block.inner(block_area);
        frame.render_widget(block, block_area);

        let text = if value.is_empty() && !active {
            Line::from(Span::styled(field.placeholder(), theme::key_hint()))
        } else if active {
            Line::from(Span::styled(
                format!("{value}█"),
                Style::default().fg(theme::SKY_BLUE),
            ))
        } else {
            Line::from(Span::styled(
                value.to_owned(),
                Style::default().fg(theme::SKY_BLUE),
            ))
        };
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_favorite_toggle(&self, frame: &mut Frame, area: Rect) {
        if area.height < 1 {
            return;
        }
        let active = self.active_field == FormField::Favorite;
        let value = self.model.draft().is_favorite;

        let marker = if value { "[♥]" } else { "[ ]" };
        let marker_style = if active {
            Style::default().fg(theme::HONEY)
        } else if value {
            theme::heart_style()
        } else {
            Style::default().fg(theme::BORDER_GRAY)
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("  {marker} "), marker_style),
                Span::styled(FormField::Favorite.label(), theme::field_label(active)),
            ])),
            area,
        );
    }

    fn render_editing(&self, frame: &mut Frame, area: Rect) {
        let draft = self.model.draft();

        let fields_area = Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height);
        let chunks = Layout::vertical([
            Constraint::Length(4), // Name
            Constraint::Length(4), // Breed
            Constraint::Length(4), // Age
            Constraint::Length(4), // Color
            Constraint::Length(4), // Photo URL
            Constraint::Length(4), // Description
            Constraint::Length(1), // Favorite toggle
            Constraint::Min(0),    // Spacer
        ])
        .split(fields_area);

        self.render_input_field(frame, chunks[0], FormField::Name, &draft.name);
        self.render_input_field(frame, chunks[1], FormField::Breed, &draft.breed);
        self.render_input_field(frame, chunks[2], FormField::Age, &draft.age);
        self.render_input_field(frame, chunks[3], FormField::Color, &draft.color);
        self.render_input_field(frame, chunks[4], FormField::ImageUrl, &draft.image_url);
        self.render_input_field(frame, chunks[5], FormField::Description, &draft.description);
        self.render_favorite_toggle(frame, chunks[6]);
    }

    fn render_submitting(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        let throbber = throbber_widgets_tui::Throbber::default()
            .label("  Saving...")
            .style(Style::default().fg(theme::HONEY));

        frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
    }

    fn render_error_line(&self, frame: &mut Frame, area: Rect) {
        let message = self
            .model
            .error()
            .map(ToString::to_string)
            .or_else(|| self.remote_error.clone());

        if let Some(msg) = message {
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(theme::ERROR_RED)))
                    .alignment(Alignment::Center),
                area,
            );
        }
    }

    fn render_key_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.model.is_submitting() {
            "waiting for the store..."
        } else if self.active_field == FormField::Favorite {
            "Space toggle  Tab next  Enter save  Esc cancel"
        } else {
            "Tab next  Shift+Tab prev  Enter save  Esc cancel"
        };

        frame.render_widget(
            Paragraph::new(Span::styled(hints, theme::key_hint())).alignment(Alignment::Center),
            area,
        );
    }
}

impl Component for FormScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // No input while a submit is in flight — no cancellation of
        // in-flight requests is modeled.
        if self.model.is_submitting() {
            return Ok(None);
        }

        self.remote_error = None;

        match self.active_field {
            FormField::Favorite => match key.code {
                KeyCode::Char(' ') => {
                    let draft = self.model.draft_mut();
                    draft.is_favorite = !draft.is_favorite;
                }
                KeyCode::Tab => self.focus_next(),
                KeyCode::BackTab => self.focus_prev(),
                KeyCode::Enter => {
                    if let Some((mode, fields)) = self.model.begin_submit() {
                        return Ok(Some(Action::SubmitForm { mode, fields }));
                    }
                }
                KeyCode::Esc => return Ok(Some(Action::CloseForm)),
                _ => {}
            },
            // Text input fields
            _ => match key.code {
                KeyCode::Tab => self.focus_next(),
                KeyCode::BackTab => self.focus_prev(),
                KeyCode::Enter => {
                    if let Some((mode, fields)) = self.model.begin_submit() {
                        return Ok(Some(Action::SubmitForm { mode, fields }));
                    }
                }
                KeyCode::Esc => return Ok(Some(Action::CloseForm)),
                KeyCode::Backspace => {
                    if let Some(input) = self.active_input_mut() {
                        input.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(input) = self.active_input_mut() {
                        input.push(c);
                    }
                }
                _ => {}
            },
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FormSubmitResult(result) => match result {
                Ok(_) => {
                    // App tears this component down right after; this just
                    // settles the state machine.
                    self.model.submit_succeeded();
                }
                Err(msg) => self.submit_failed(msg.clone()),
            },
            Action::Tick => {
                if self.model.is_submitting() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let inner = self.render_centered_panel(frame, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // content
            Constraint::Length(1), // error line
            Constraint::Length(1), // hints
        ])
        .split(inner);

        if self.model.is_submitting() {
            self.render_submitting(frame, layout[1]);
        } else {
            self.render_editing(frame, layout[1]);
        }

        self.render_error_line(frame, layout[2]);
        self.render_key_hints(frame, layout[3]);
    }
}
