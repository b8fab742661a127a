//! Application core — event loop, overlay management, action dispatch.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use kennel_core::{Controller, DogFields, FormMode, RecordId};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::collection::CollectionScreen;
use crate::screens::form::FormScreen;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// The one primary screen: the card grid.
    collection: CollectionScreen,
    /// Modal form overlay, present while open.
    form: Option<FormScreen>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Whether a refresh is in flight (status bar indicator).
    loading: bool,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Collection controller for live data.
    controller: Controller,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            collection: CollectionScreen::new(),
            form: None,
            running: true,
            help_visible: false,
            loading: true,
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.collection.init(self.action_tx.clone())?;
        self.collection.set_focused(true);

        // Spawn the data bridge
        {
            let controller = self.controller.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Cancel the data bridge and clean up
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active overlay or the grid.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // The form captures all keys while open
        if let Some(ref mut form) = self.form {
            return form.handle_key_event(key);
        }

        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        // Delegate to the grid
        self.collection.handle_key_event(key)
    }

    /// Process a single action — update app state and propagate to
    /// components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(..) | Action::Render => {}

            Action::Tick => {
                // Auto-dismiss notifications
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                self.collection.update(action)?;
                if let Some(ref mut form) = self.form {
                    form.update(action)?;
                }
            }

            // ── Data updates ──────────────────────────────────────────
            Action::DogsUpdated(_) => {
                self.collection.update(action)?;
            }

            Action::LoadingChanged(loading) => {
                self.loading = *loading;
                self.collection.update(action)?;
            }

            // ── Form lifecycle ────────────────────────────────────────
            Action::OpenCreateForm => {
                let mut form = FormScreen::create();
                form.init(self.action_tx.clone())?;
                self.form = Some(form);
            }

            Action::OpenEditForm(id) => {
                if let Some(record) = self.controller.store().dog_by_id(id) {
                    let mut form = FormScreen::edit(&record);
                    form.init(self.action_tx.clone())?;
                    self.form = Some(form);
                } else {
                    // Refresh raced the selection away
                    self.action_tx
                        .send(Action::Notify(Notification::warning("Dog is gone")))?;
                }
            }

            Action::CloseForm => {
                self.form = None;
            }

            Action::SubmitForm { mode, fields } => {
                self.spawn_submit(mode.clone(), fields.clone());
            }

            Action::FormSubmitResult(result) => {
                if let Some(ref mut form) = self.form {
                    form.update(action)?;
                }
                if let Ok(msg) = result {
                    self.form = None;
                    self.action_tx
                        .send(Action::Notify(Notification::success(msg.clone())))?;
                }
                // On error the form stays open with the entered values
                // and shows the message inline.
            }

            // ── Collection commands ───────────────────────────────────
            Action::RequestRemove(id) => {
                let name = self.resolve_dog_name(id);
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::RemoveDog {
                        id: id.clone(),
                        name,
                    }))?;
            }

            Action::RequestToggleFavorite(id) => {
                if let Some(record) = self.controller.store().dog_by_id(id) {
                    let controller = self.controller.clone();
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = controller.toggle_favorite(&record).await {
                            warn!(error = %e, "favorite toggle failed");
                            let _ = tx.send(Action::Notify(Notification::error(format!(
                                "Failed to update favorite status: {e}"
                            ))));
                        }
                    });
                }
            }

            Action::RequestRefresh => {
                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = controller.refresh().await {
                        warn!(error = %e, "manual refresh failed");
                        let _ = tx.send(Action::Notify(Notification::error(format!(
                            "Failed to load dogs: {e}"
                        ))));
                    }
                });
            }

            // ── Confirmation dialog ───────────────────────────────────
            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            // ── Overlays ──────────────────────────────────────────────
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }
        }

        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn resolve_dog_name(&self, id: &RecordId) -> String {
        self.controller
            .store()
            .dog_by_id(id)
            .map_or_else(|| id.to_string(), |d| d.name.clone())
    }

    /// Run the validated form submission against the store.
    fn spawn_submit(&self, mode: FormMode, fields: DogFields) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match mode {
                FormMode::Create => controller
                    .create(&fields)
                    .await
                    .map(|_| "Dog added successfully".to_owned())
                    .map_err(|e| format!("Failed to save dog: {e}")),
                FormMode::Edit(id) => controller
                    .update(&id, &fields)
                    .await
                    .map(|_| "Dog updated successfully".to_owned())
                    .map_err(|e| format!("Failed to save dog: {e}")),
            };
            let _ = tx.send(Action::FormSubmitResult(result));
        });
    }

    /// Map a confirmed action to its controller call and execute it.
    fn execute_confirm(&self, action: ConfirmAction) {
        match action {
            ConfirmAction::RemoveDog { id, name } => {
                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match controller.remove(&id).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Notify(Notification::success(
                                "Dog removed successfully",
                            )));
                        }
                        Err(e) => {
                            warn!(error = %e, "remove failed");
                            let _ = tx.send(Action::Notify(Notification::error(format!(
                                "Failed to remove {name}: {e}"
                            ))));
                        }
                    }
                });
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [grid] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Grid content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.collection.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        // Render overlays on top (order matters: last = topmost)
        if let Some(ref form) = self.form {
            form.render(frame, area);
        }

        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }

        if let Some(ref confirm) = self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the bottom status bar with sync state and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let sync_indicator = if self.loading {
            Span::styled("◐ syncing", Style::default().fg(theme::AMBER))
        } else {
            Span::styled("● synced", Style::default().fg(theme::GRASS_GREEN))
        };

        let hints = Span::styled(
            " │ a add  e edit  d remove  f favorite  r refresh  ? help  q quit",
            theme::key_hint(),
        );

        let line = Line::from(vec![Span::raw(" "), sync_indicator, hints]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 52u16.min(area.width.saturating_sub(4));
        let help_height = 16u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let key = theme::key_hint_key();
        let hint = theme::key_hint();
        let help_text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  h/j/k/l ←↓↑→  ", key),
                Span::styled("Move through the grid", hint),
            ]),
            Line::from(vec![
                Span::styled("  g/G           ", key),
                Span::styled("First / last dog", hint),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  a             ", key),
                Span::styled("Add a new dog", hint),
            ]),
            Line::from(vec![
                Span::styled("  e / Enter     ", key),
                Span::styled("Edit the selected dog", hint),
            ]),
            Line::from(vec![
                Span::styled("  d             ", key),
                Span::styled("Remove the selected dog", hint),
            ]),
            Line::from(vec![
                Span::styled("  f             ", key),
                Span::styled("Toggle favorite", hint),
            ]),
            Line::from(vec![
                Span::styled("  r             ", key),
                Span::styled("Refresh from the store", hint),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  q             ", key),
                Span::styled("Quit", hint),
            ]),
            Line::from(""),
            Line::from(Span::styled("            Esc or ? to close", hint)),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render a centered confirmation dialog.
    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 5u16;

        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    #[allow(clippy::unused_self)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.len()).unwrap_or(u16::MAX);
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::GRASS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::AMBER, "!"),
            NotificationLevel::Info => (theme::SKY_BLUE, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
