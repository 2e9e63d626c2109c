//! Help dialog listing key bindings

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// (section, [(keys, description)])
const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "List",
        &[
            ("j / ↓", "Next customer"),
            ("k / ↑", "Previous customer"),
            ("g / Home", "First customer"),
            ("G / End", "Last customer"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Type in the search box"),
            ("Esc / Enter", "Leave the search box"),
            ("Backspace", "Delete last character"),
            ("Ctrl+u", "Clear the search"),
            ("Esc", "Clear the search (outside the box)"),
        ],
    ),
    (
        "Data",
        &[("r / F5", "Fetch customers again")],
    ),
    (
        "App",
        &[
            ("?", "Show this help"),
            ("q", "Quit"),
            ("Ctrl+c", "Quit immediately"),
        ],
    ),
];

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = build_help_content();
        let total = content.len();

        let height = u16::try_from(total + 2).unwrap_or(u16::MAX);
        let dialog_area = centered_popup(area, 56, height);
        frame.render_widget(Clear, dialog_area);

        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((u16::try_from(self.scroll_offset).unwrap_or(u16::MAX), 0));

        frame.render_widget(paragraph, dialog_area);

        if max_scroll > 0 {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (section, shortcuts) in SHORTCUTS {
        lines.push(Line::from(Span::styled(
            format!(" {}", section),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (keys, description) in *shortcuts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {:14}", keys),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*description),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        " Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_content_lists_every_shortcut() {
        let shortcut_count: usize = SHORTCUTS.iter().map(|(_, s)| s.len()).sum();
        let content = build_help_content();
        // header + blank per section, plus the closing hint
        assert_eq!(content.len(), shortcut_count + SHORTCUTS.len() * 2 + 1);
    }

    #[test]
    fn test_help_scrolling_and_close() {
        let mut dialog = HelpDialog::default();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(dialog.handle_key_event(press(KeyCode::Char('j'))).unwrap(), None);
        assert_eq!(dialog.scroll_offset, 1);
        dialog.handle_key_event(press(KeyCode::Up)).unwrap();
        dialog.handle_key_event(press(KeyCode::Up)).unwrap();
        assert_eq!(dialog.scroll_offset, 0);

        assert_eq!(
            dialog.handle_key_event(press(KeyCode::Char('?'))).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
