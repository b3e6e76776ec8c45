//! UI rendering using ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::App;
use super::routes::{self, NavGroup, LANDING_LINK};
use super::search::highlight_matches;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

const SEARCH_FIELD_WIDTH: u16 = 40;

/// Screen regions, shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLayout {
    pub header: Rect,
    /// Read-only field that opens the palette when clicked
    pub search_field: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn shell_layout(area: Rect) -> ShellLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = chunks[0];
    let width = SEARCH_FIELD_WIDTH.min(header.width.saturating_sub(24));
    let search_field = Rect {
        x: header.x + header.width.saturating_sub(width) / 2,
        y: header.y,
        width,
        height: header.height,
    };

    ShellLayout {
        header,
        search_field,
        body: chunks[1],
        status: chunks[2],
    }
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = shell_layout(frame.area());

    render_header(frame, &layout);
    render_page(frame, app, layout.body);
    render_status_bar(frame, app, layout.status);

    if app.palette.is_open() {
        render_palette(frame, app);
    }
}

fn render_header(frame: &mut Frame, layout: &ShellLayout) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Documents",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(SECONDARY)));
    frame.render_widget(title, layout.header);

    let inner_width = layout.search_field.width.saturating_sub(2) as usize;
    let hint = "⌘K";
    let label = "Search...";
    let padding = inner_width.saturating_sub(label.chars().count() + hint.chars().count() + 1);
    let field = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {}", label), Style::default().fg(DIM)),
        Span::raw(" ".repeat(padding)),
        Span::styled(hint, Style::default().fg(SECONDARY)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(SECONDARY)));

    frame.render_widget(Clear, layout.search_field);
    frame.render_widget(field, layout.search_field);
}

fn render_page(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from("")];

    if app.is_landing() {
        lines.push(Line::from(Span::styled(
            "☺",
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(ACCENT)),
            Span::styled(format!(" → {}", LANDING_LINK), Style::default().fg(DIM)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            routes::page_title(app.location()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            app.location().to_string(),
            Style::default().fg(DIM),
        )));
    }

    let page = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(page, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys = if app.palette.is_open() {
        " ↑↓ select  Enter open  Esc close"
    } else {
        " ^K palette  q quit"
    };

    let mut spans = vec![Span::styled(keys, Style::default().fg(SECONDARY))];
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  {}", status), Style::default().fg(DIM)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the command palette overlay
fn render_palette(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = &app.palette;

    // Matches arrive grouped, so each heading is emitted once
    let mut rows: Vec<ListItem> = Vec::new();
    let mut current_group: Option<NavGroup> = None;
    let mut selected_row = None;

    for (idx, m) in palette.matches().iter().enumerate() {
        if current_group != Some(m.entry.group) {
            current_group = Some(m.entry.group);
            rows.push(ListItem::new(Line::from(Span::styled(
                m.entry.group.heading(),
                Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
            ))));
        }

        let is_selected = idx == palette.selected();
        if is_selected {
            selected_row = Some(rows.len());
        }
        let base = if is_selected {
            Style::default()
                .fg(Color::Black)
                .bg(HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![Span::styled("  ", base)];
        for (segment, matched) in highlight_matches(m.entry.label, &m.match_indices) {
            let style = if matched && !is_selected {
                base.fg(ACCENT)
            } else {
                base
            };
            spans.push(Span::styled(segment, style));
        }
        if let Some(shortcut) = m.entry.shortcut {
            spans.push(Span::styled(format!("  {}", shortcut), base.fg(SECONDARY)));
        }
        rows.push(ListItem::new(Line::from(spans)));
    }

    let width = 50.min(area.width.saturating_sub(4));
    let height = (rows.len().max(1) + 4).min(area.height.saturating_sub(2) as usize) as u16;

    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 3,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Command Palette ")
        .title_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(HIGHLIGHT));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let input = if palette.query().is_empty() {
        Span::styled("Type a command or search...", Style::default().fg(DIM))
    } else {
        Span::styled(palette.query().to_string(), Style::default().fg(Color::White))
    };
    let input_line = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(ACCENT)),
        input,
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(SECONDARY)));
    frame.render_widget(input_line, chunks[0]);

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled("No results found.", Style::default().fg(DIM)))
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        // Scrolls so the selected row stays visible on short terminals
        let mut state = ListState::default().with_selected(selected_row);
        frame.render_stateful_widget(List::new(rows), chunks[1], &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        draw_sized(app, 80, 24)
    }

    fn draw_sized(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_search_field_is_centered() {
        let layout = shell_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.search_field.width, SEARCH_FIELD_WIDTH);
        assert_eq!(layout.search_field.x, 30);
        assert_eq!(layout.status.y, 29);
    }

    #[test]
    fn test_landing_render() {
        let screen = draw(&App::new("/"));
        assert!(screen.contains("Search..."));
        assert!(screen.contains(LANDING_LINK));
        assert!(!screen.contains("Command Palette"));
    }

    #[test]
    fn test_palette_render() {
        let mut app = App::new("/workshop");
        app.palette.open();
        let screen = draw(&app);
        assert!(screen.contains("Command Palette"));
        assert!(screen.contains("Navigation"));
        assert!(screen.contains("Showroom"));
    }

    #[test]
    fn test_selected_row_visible_on_short_terminal() {
        let mut app = App::new("/");
        app.palette.open();
        app.palette.select_prev();
        assert_eq!(app.palette.selected_entry().map(|e| e.label), Some("Profile"));

        let screen = draw_sized(&app, 80, 12);
        assert!(screen.contains("Profile"));
        assert!(!screen.contains("Dashboard"));
    }

    #[test]
    fn test_palette_empty_results() {
        let mut app = App::new("/");
        app.palette.open();
        for c in "qqq".chars() {
            app.palette.push_char(c);
        }
        assert!(draw(&app).contains("No results found."));
    }
}
