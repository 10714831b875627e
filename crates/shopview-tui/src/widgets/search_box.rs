//! Single-line search box backed by `tui-input`.
//!
//! Typing updates the query immediately; there is no submit step.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, InputRequest};

use crate::action::Action;
use crate::theme;

#[derive(Debug, Default)]
pub struct SearchBox {
    input: Input,
    focused: bool,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Empty the box. Returns the query change, if there was one.
    pub fn clear(&mut self) -> Option<Action> {
        if self.input.value().is_empty() {
            return None;
        }
        self.input.reset();
        Some(Action::SearchInput(String::new()))
    }

    /// Edit the query while focused.
    ///
    /// `Esc` and `Enter` leave the box without touching the query,
    /// `Ctrl+U` clears it, `Ctrl+C` still quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let request = match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Enter) => return Some(Action::CloseSearch),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(Action::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => return self.clear(),
            (m, KeyCode::Char(c))
                if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                InputRequest::InsertChar(c)
            }
            (_, KeyCode::Backspace) => InputRequest::DeletePrevChar,
            (_, KeyCode::Delete) => InputRequest::DeleteNextChar,
            (_, KeyCode::Left) => InputRequest::GoToPrevChar,
            (_, KeyCode::Right) => InputRequest::GoToNextChar,
            (_, KeyCode::Home) => InputRequest::GoToStart,
            (_, KeyCode::End) => InputRequest::GoToEnd,
            _ => return None,
        };

        let before = self.input.value().to_owned();
        self.input.handle(request);
        (self.input.value() != before).then(|| Action::SearchInput(self.input.value().to_owned()))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Search ")
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

        if self.input.value().is_empty() && !self.focused {
            let placeholder = Line::from(vec![
                Span::styled("/ ", theme::key_hint_key()),
                Span::styled("to search titles", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(placeholder), inner);
            return;
        }

        // Keep the cursor inside the box by scrolling long queries.
        let width = usize::from(inner.width.saturating_sub(1));
        let scroll = self.input.visual_scroll(width);
        let paragraph = Paragraph::new(Span::styled(self.input.value(), theme::search_text()))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)));
        frame.render_widget(paragraph, inner);

        if self.focused {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            let x = inner.x + u16::try_from(offset).unwrap_or(inner.width);
            frame.set_cursor_position((x, inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(search: &mut SearchBox, text: &str) -> Option<Action> {
        text.chars()
            .map(|c| search.handle_key(key(KeyCode::Char(c))))
            .last()
            .flatten()
    }

    #[test]
    fn typing_reports_every_change() {
        let mut search = SearchBox::new();
        assert_eq!(
            search.handle_key(key(KeyCode::Char('b'))),
            Some(Action::SearchInput("b".into()))
        );
        assert_eq!(
            type_str(&mut search, "lue"),
            Some(Action::SearchInput("blue".into()))
        );
        assert_eq!(
            search.handle_key(key(KeyCode::Backspace)),
            Some(Action::SearchInput("blu".into()))
        );
    }

    #[test]
    fn shifted_letters_are_inserted() {
        let mut search = SearchBox::new();
        let upper = KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert_eq!(search.handle_key(upper), Some(Action::SearchInput("B".into())));
    }

    #[test]
    fn cursor_moves_do_not_change_the_query() {
        let mut search = SearchBox::new();
        type_str(&mut search, "hat");
        assert_eq!(search.handle_key(key(KeyCode::Left)), None);
        assert_eq!(search.handle_key(key(KeyCode::Home)), None);
        assert_eq!(
            search.handle_key(key(KeyCode::Delete)),
            Some(Action::SearchInput("at".into()))
        );
    }

    #[test]
    fn escape_leaves_but_keeps_query() {
        let mut search = SearchBox::new();
        type_str(&mut search, "red");
        assert_eq!(search.handle_key(key(KeyCode::Esc)), Some(Action::CloseSearch));
        assert_eq!(search.value(), "red");
    }

    #[test]
    fn ctrl_u_clears_once() {
        let mut search = SearchBox::new();
        type_str(&mut search, "red");
        assert_eq!(search.handle_key(ctrl('u')), Some(Action::SearchInput(String::new())));
        assert_eq!(search.value(), "");
        assert_eq!(search.handle_key(ctrl('u')), None);
    }

    #[test]
    fn ctrl_c_quits_from_the_box() {
        let mut search = SearchBox::new();
        assert_eq!(search.handle_key(ctrl('c')), Some(Action::Quit));
    }
}
