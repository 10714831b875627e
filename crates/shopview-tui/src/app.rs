//! Application core: event loop, key routing, action dispatch, overlays.

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
use tracing::{debug, info};

use shopview_core::{Catalogue, CatalogueState, HttpSource, ProductSource};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::catalogue::CatalogueScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::search_box::SearchBox;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App<S: ProductSource = HttpSource> {
    /// Handed to the data bridge when the loop starts.
    catalogue: Option<Catalogue<S>>,
    screen: CatalogueScreen,
    search: SearchBox,
    running: bool,
    help_visible: bool,
    /// Last state published by the catalogue, for the status bar.
    status: CatalogueState,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl<S: ProductSource> App<S> {
    pub fn new(catalogue: Catalogue<S>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            catalogue: Some(catalogue),
            screen: CatalogueScreen::new(),
            search: SearchBox::new(),
            running: true,
            help_visible: false,
            status: CatalogueState::default(),
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;
        self.screen.set_focused(true);

        if let Some(catalogue) = self.catalogue.take() {
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(catalogue, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(100), // throbber / toast tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. The focused search box sees keys first, then
    /// the help overlay, then global bindings, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search.is_focused() {
            return Ok(self.search.handle_key(key));
        }

        if self.help_visible {
            return Ok(match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
                (_, KeyCode::Esc | KeyCode::Char('?')) => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => return Ok(self.search.clear()),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),

            Action::OpenSearch => {
                self.search.set_focused(true);
                self.screen.set_focused(false);
            }

            Action::CloseSearch => {
                self.search.set_focused(false);
                self.screen.set_focused(true);
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::CatalogueUpdated(state) => {
                self.status = state.clone();
                self.forward(action)?;
            }

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.forward(action)?;
            }

            Action::SearchInput(query) => {
                debug!(query = %query, "search query changed");
                self.forward(action)?;
            }

            Action::Render => {}
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(3), // Search box
            Constraint::Min(1),    // Catalogue
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.search.render(frame, layout[0]);
        self.screen.render(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notification, _)) = self.notification {
            Self::render_notification(frame, area, notification);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.status.is_loading() {
            Span::styled("◐ loading", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else if self.status.has_error() {
            Span::styled("✗ load failed", Style::default().fg(theme::ERROR_RED))
        } else {
            Span::styled(
                format!("● {} products", self.status.products().len()),
                Style::default().fg(theme::SUCCESS_GREEN),
            )
        };

        let hints = if self.search.is_focused() {
            " │ Esc done  Ctrl+U clear"
        } else {
            " │ ? help  / search  Ctrl+U clear  q quit"
        };

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(hints, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 48u16.min(area.width.saturating_sub(4));
        let help_height = 18u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

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

        let section = |name: &'static str| {
            Line::from(Span::styled(name, Style::default().fg(theme::NEON_CYAN)))
        };
        let binding = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(keys, theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("  Products"),
            binding("  j/k ↑/↓    ", "Move up/down"),
            binding("  g/G        ", "Top / bottom"),
            binding("  PgUp/PgDn  ", "Page up / down"),
            binding("  Enter      ", "Toggle detail"),
            binding("  Esc        ", "Close detail"),
            Line::from(""),
            section("  Search"),
            binding("  /          ", "Focus search box"),
            binding("  Esc        ", "Leave box, keep query"),
            binding("  Ctrl+U     ", "Clear query"),
            Line::from(""),
            section("  Global"),
            binding("  ?          ", "This help"),
            binding("  q Ctrl+C   ", "Quit"),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
        let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height.min(area.height));

        let (border_color, icon) = match notification.level {
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
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
            Span::styled(&notification.message, Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
