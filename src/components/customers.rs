//! Customers component - the main screen
//!
//! Header with counts, search box, the list body (or the loading, error or
//! empty state) and a footer. Owns list selection and search focus; the data
//! itself lives in `EntryStore`.

use crate::action::Action;
use crate::component::Component;
use crate::components::calculate_customers_layout;
use crate::model::{DisplayState, Entry, EntryId, EntryStore};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SEARCH_PLACEHOLDER: &str = "Search by name or mobile";
const HIGHLIGHT_SYMBOL: &str = "▶ ";

pub struct CustomersComponent {
    /// Selection in the filtered list
    pub list_state: ListState,

    /// Whether typing goes to the search box
    pub search_mode: bool,

    /// Id of the selected entry, used to keep the selection across refreshes
    selected_id: Option<EntryId>,

    spinner_frame: usize,
}

impl Default for CustomersComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomersComponent {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            search_mode: false,
            selected_id: None,
            spinner_frame: 0,
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    fn select_index(&mut self, index: Option<usize>, filtered: &[&Entry]) {
        self.list_state.select(index);
        self.selected_id = index
            .and_then(|i| filtered.get(i))
            .and_then(|entry| entry.id.clone());
    }

    /// Re-anchor the selection after the list or the query changed
    ///
    /// Keeps the same entry selected when its id is still visible, otherwise
    /// clamps the old position into range.
    pub fn reconcile(&mut self, filtered: &[&Entry]) {
        if filtered.is_empty() {
            self.select_index(None, filtered);
            return;
        }

        let by_id = self.selected_id.as_ref().and_then(|id| {
            filtered
                .iter()
                .position(|entry| entry.id.as_ref() == Some(id))
        });

        let index = by_id.unwrap_or_else(|| {
            self.list_state
                .selected()
                .unwrap_or(0)
                .min(filtered.len() - 1)
        });
        self.select_index(Some(index), filtered);
    }

    /// Select the next row, wrapping to the first
    pub fn next(&mut self, filtered: &[&Entry]) {
        if filtered.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < filtered.len() => i + 1,
            _ => 0,
        };
        self.select_index(Some(next), filtered);
    }

    /// Select the previous row, wrapping to the last
    pub fn previous(&mut self, filtered: &[&Entry]) {
        if filtered.is_empty() {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(i) if i > 0 && i < filtered.len() => i - 1,
            _ => filtered.len() - 1,
        };
        self.select_index(Some(prev), filtered);
    }

    pub fn select_first(&mut self, filtered: &[&Entry]) {
        let index = if filtered.is_empty() { None } else { Some(0) };
        self.select_index(index, filtered);
    }

    pub fn select_last(&mut self, filtered: &[&Entry]) {
        self.select_index(filtered.len().checked_sub(1), filtered);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for CustomersComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ClearSearch)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Esc => Some(Action::ClearSearch),
            KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the store; see draw_customers_screen
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Draw the whole customers screen
pub fn draw_customers_screen(
    frame: &mut Frame,
    area: Rect,
    customers: &mut CustomersComponent,
    store: &EntryStore,
) -> Result<()> {
    let layout = calculate_customers_layout(area);

    render_header(frame, layout.header, store);
    render_search(frame, layout.search, customers, store);
    render_body(frame, layout.body, customers, store);
    render_footer(frame, layout.footer, store);
    render_help_bar(frame, layout.help, customers);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, store: &EntryStore) {
    let pill = |label: &'static str, value: usize| {
        vec![
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} ", value),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]
    };

    let mut meta = pill("Total", store.total());
    meta.push(Span::raw("  "));
    meta.extend(pill("Showing", store.showing()));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                " SLG JOCKEY ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                "Customers",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(meta),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_search(
    frame: &mut Frame,
    area: Rect,
    customers: &CustomersComponent,
    store: &EntryStore,
) {
    let border_color = if customers.search_mode {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let content = if store.query().is_empty() {
        Line::from(Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            store.query().to_string(),
            Style::default().fg(Color::White),
        ))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ⌕ Search ")
        .border_style(Style::default().fg(border_color));

    // Keep the end of a long query and the cursor cell after it in view
    let inner_width = area.width.saturating_sub(2);
    let query_width = u16::try_from(store.query().width()).unwrap_or(u16::MAX);
    let scroll = query_width.saturating_sub(inner_width.saturating_sub(1));

    frame.render_widget(
        Paragraph::new(content).block(block).scroll((0, scroll)),
        area,
    );

    if customers.search_mode {
        let offset = query_width - scroll;
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position(((area.x + 1).saturating_add(offset).min(max_x), area.y + 1));
    }
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    customers: &mut CustomersComponent,
    store: &EntryStore,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    match store.display_state() {
        DisplayState::Loading => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    customers.spinner(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(
                    "Loading customers...",
                    Style::default().fg(Color::Gray),
                )),
            ];
            render_state(frame, area, block, lines);
        }
        DisplayState::Error(message) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    message.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Check your network and try again.",
                    Style::default().fg(Color::Gray),
                )),
            ];
            render_state(frame, area, block, lines);
        }
        DisplayState::Empty => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No customers found",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Try searching something else.",
                    Style::default().fg(Color::Gray),
                )),
            ];
            render_state(frame, area, block, lines);
        }
        DisplayState::List => {
            let row_width = area.width.saturating_sub(2) as usize;
            let row_width = row_width.saturating_sub(HIGHLIGHT_SYMBOL.width());
            let items: Vec<ListItem> = store
                .filtered()
                .into_iter()
                .map(|entry| ListItem::new(customer_row(entry, row_width)))
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(HIGHLIGHT_SYMBOL);

            frame.render_stateful_widget(list, area, &mut customers.list_state);
        }
    }
}

fn render_state(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line<'static>>) {
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// One list row: avatar, name, label, and the mobile number pushed right
pub fn customer_row(entry: &Entry, width: usize) -> Line<'static> {
    let avatar = format!(" {:^1} ", entry.initial());
    let name = entry.name_text().to_string();
    let label = "  Customer";
    let mobile = entry.mobile_text().to_string();

    let used = avatar.width() + 1 + name.width() + label.width() + mobile.width();
    let padding = width.saturating_sub(used).max(1);

    Line::from(vec![
        Span::styled(
            avatar,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            name,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(padding)),
        Span::styled(mobile, Style::default().fg(Color::Yellow)),
    ])
}

fn render_footer(frame: &mut Frame, area: Rect, store: &EntryStore) {
    let brand = " Powered by Jockey Rewards";
    let updated = store
        .last_loaded_at()
        .map(|at| format!("Updated {} ", at.format("%H:%M:%S")))
        .unwrap_or_default();

    let padding = (area.width as usize).saturating_sub(brand.width() + updated.width());

    let line = Line::from(vec![
        Span::styled(brand, Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(padding)),
        Span::styled(updated, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, customers: &CustomersComponent) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let spans = if customers.search_mode {
        vec![
            key(" Esc/Enter ", Color::Yellow),
            Span::raw("Done  "),
            key(" Backspace ", Color::Cyan),
            Span::raw("Delete  "),
            key(" Ctrl-U ", Color::Cyan),
            Span::raw("Clear"),
        ]
    } else {
        vec![
            key(" q ", Color::Yellow),
            Span::raw("Quit "),
            key(" r ", Color::Green),
            Span::raw("Refresh "),
            key(" / ", Color::Cyan),
            Span::raw("Search "),
            key(" j/k ", Color::Cyan),
            Span::raw("Move "),
            key(" ? ", Color::White),
            Span::raw("Help"),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
