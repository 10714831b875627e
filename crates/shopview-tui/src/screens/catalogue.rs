//! Catalogue screen: product table over the search projection, with the
//! loading, error and empty states and an optional detail panel.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use shopview_core::{CatalogueView, Presentation, Product};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::price_fmt;

pub const LOADING_MESSAGE: &str = "Loading products...";
pub const ERROR_MESSAGE: &str = "Failed to load products.";
pub const EMPTY_MESSAGE: &str = "No products found.";

const PAGE: isize = 10;

pub struct CatalogueScreen {
    view: CatalogueView,
    table_state: TableState,
    detail_open: bool,
    focused: bool,
    throbber_state: ThrobberState,
}

impl CatalogueScreen {
    pub fn new() -> Self {
        Self {
            view: CatalogueView::new(),
            table_state: TableState::default(),
            detail_open: false,
            focused: true,
            throbber_state: ThrobberState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_product(&self) -> Option<&Arc<Product>> {
        self.table_state
            .selected()
            .and_then(|idx| self.view.projected().get(idx))
    }

    /// Select `idx`, clamped to the projection. An empty projection clears
    /// the selection and closes the detail panel.
    fn select(&mut self, idx: usize) {
        let len = self.view.projected().len();
        if len == 0 {
            self.table_state.select(None);
            self.detail_open = false;
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        self.select(self.selected_index().saturating_add_signed(delta));
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
        let rows = Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(area);
        frame.render_widget(Paragraph::new(Span::styled(message, style)).centered(), rows[1]);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(area);
        let width = u16::try_from(LOADING_MESSAGE.len() + 4).unwrap_or(area.width);
        let cols = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(rows[1]);

        let throbber = Throbber::default()
            .label(LOADING_MESSAGE)
            .style(theme::message())
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, cols[1], &mut self.throbber_state.clone());
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, products: &[Arc<Product>]) {
        let header = Row::new(["ID", "Title", "Category", "Price", "Rating"])
            .style(theme::table_header());

        let rows: Vec<Row> = products
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.id.to_string()),
                    Cell::from(p.title.as_str()),
                    Cell::from(p.category.as_deref().unwrap_or("─")).style(theme::category()),
                    Cell::from(price_fmt::fmt_price(p.price)).style(theme::price()),
                    Cell::from(p.rating.as_ref().map_or_else(|| "─".into(), price_fmt::fmt_rating))
                        .style(theme::rating()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Fill(3),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, product: &Product) {
        let block = Block::default()
            .title(format!(" {}  ·  #{} ", product.title, product.id))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme::DIM_WHITE));

        let mut lines = vec![
            Line::from(vec![
                label("  Price      "),
                Span::styled(price_fmt::fmt_price(product.price), theme::price()),
            ]),
            Line::from(vec![
                label("  Category   "),
                Span::styled(product.category.as_deref().unwrap_or("─"), theme::category()),
            ]),
        ];
        if let Some(ref rating) = product.rating {
            lines.push(Line::from(vec![
                label("  Rating     "),
                Span::styled(price_fmt::fmt_stars(rating.rate), theme::rating()),
                Span::styled(
                    format!("  {:.1} from {} reviews", rating.rate, rating.count),
                    theme::table_row(),
                ),
            ]));
        }
        lines.push(Line::from(vec![
            label("  Image      "),
            Span::styled(
                if product.image.is_empty() { "─" } else { product.image.as_str() },
                Style::default().fg(theme::NEON_CYAN),
            ),
        ]));
        if let Some(ref description) = product.description {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {description}"),
                theme::table_row(),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_hints(frame: &mut Frame, area: Rect, detail_open: bool) {
        let detail = if detail_open { "close detail  " } else { "detail  " };
        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("g/G ", theme::key_hint_key()),
            Span::styled("top/bottom  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled(detail, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}

impl Default for CatalogueScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CatalogueScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_product().is_some();
            }
            KeyCode::Esc => self.detail_open = false,
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CatalogueUpdated(state) => {
                self.view.on_state_changed(state.clone());
                self.select(self.selected_index());
            }
            Action::SearchInput(query) => {
                self.view.on_query_changed(query.as_str());
                self.select(0);
            }
            Action::Tick => {
                if self.view.state().is_loading() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let snapshot = self.view.snapshot();
        let title = if snapshot.query.is_empty() {
            format!(" Products ({}/{}) ", snapshot.products.len(), snapshot.total)
        } else {
            format!(
                " Products ({}/{}) · \"{}\" ",
                snapshot.products.len(),
                snapshot.total,
                snapshot.query
            )
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.view.presentation() {
            Presentation::Loading => self.render_loading(frame, inner),
            Presentation::Failed => {
                Self::render_message(frame, inner, ERROR_MESSAGE, theme::error_message());
            }
            Presentation::NoResults => {
                Self::render_message(frame, inner, EMPTY_MESSAGE, theme::message());
            }
            Presentation::Products(products) => {
                let layout =
                    Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
                let detail = self.selected_product().filter(|_| self.detail_open);

                if let Some(product) = detail {
                    let halves =
                        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                            .split(layout[0]);
                    self.render_table(frame, halves[0], products);
                    self.render_detail(frame, halves[1], product);
                } else {
                    self.render_table(frame, layout[0], products);
                }
                Self::render_hints(frame, layout[1], self.detail_open);
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
