use crate::table::{Table, TABLE_TITLE};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget},
    Frame,
};

const BANNER: [&str; 5] = [
    r"           .-'''-.           ",
    r"      .-' .-'''-. '-.      ",
    r"        .' .-'-. '.        ",
    r"           ( o )           ",
    r"        w i f i s c a n       ",
];
const HINT: &str = "Press Ctrl+C (or q) to exit.";
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const MIN_HEIGHT_FOR_BANNER: u16 = 20;

const COLUMN_COLORS: [Color; 8] = [
    Color::White,
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Red,
    Color::White,
];

const COLUMN_WIDTHS: [Constraint; 8] = [
    Constraint::Length(4),
    Constraint::Fill(1),
    Constraint::Length(17),
    Constraint::Length(15),
    Constraint::Length(10),
    Constraint::Length(7),
    Constraint::Length(8),
    Constraint::Length(10),
];

/// What the dashboard body shows
#[derive(Debug, Clone)]
pub enum Screen {
    /// Nothing scanned yet
    Placeholder(String),
    Networks(Table),
}

/// Draw the full dashboard for one frame
pub fn draw(frame: &mut Frame, screen: &Screen, show_banner: bool, tick: usize) {
    let area = frame.area();
    let show_banner = show_banner && area.height >= MIN_HEIGHT_FOR_BANNER;

    let mut constraints = Vec::with_capacity(4);
    if show_banner {
        constraints.push(Constraint::Length(BANNER.len() as u16));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(3));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let offset = if show_banner { 1 } else { 0 };

    if show_banner {
        frame.render_widget(banner(), chunks[0]);
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(HINT, Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)))),
        chunks[offset],
    );

    let body = chunks[offset + 1];
    let status = chunks[offset + 2];

    match screen {
        Screen::Placeholder(message) => {
            render_placeholder(frame, body, message, tick);
        }
        Screen::Networks(table) => {
            frame.render_widget(network_table(table), body);
            if let Some(caption) = &table.caption {
                frame.render_widget(
                    Paragraph::new(Span::styled(caption.as_str(), Style::default().fg(Color::Gray))),
                    status,
                );
            }
        }
    }
}

fn banner() -> Paragraph<'static> {
    let lines: Vec<Line> = BANNER
        .iter()
        .map(|line| Line::from(Span::styled(*line, Style::default().fg(Color::Cyan))))
        .collect();

    Paragraph::new(lines).alignment(Alignment::Center)
}

fn render_placeholder(frame: &mut Frame, area: Rect, message: &str, tick: usize) {
    let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
    let block = Block::default()
        .title(TABLE_TITLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let line = Line::from(vec![
        Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
        Span::styled(message.to_string(), Style::default().fg(Color::White)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn network_table(table: &Table) -> TableWidget<'static> {
    let header = Row::new(
        table
            .header
            .iter()
            .zip(COLUMN_COLORS)
            .map(|(title, color)| Cell::from(*title).style(Style::default().fg(color).add_modifier(Modifier::BOLD))),
    );

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            Row::new(row.cells().into_iter().zip(COLUMN_COLORS).enumerate().map(|(i, (text, color))| {
                let style = if i == 0 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                Cell::from(text).style(style)
            }))
        })
        .collect();

    TableWidget::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(
            Block::default()
                .title(table.title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::record;
    use crate::inventory::{Inventory, DEFAULT_SIGNAL_FLOOR};
    use crate::table::render;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw_to_string(screen: &Screen, show_banner: bool, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, screen, show_banner, 0)).unwrap();
        terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draw_networks() {
        let mut inventory = Inventory::new();
        inventory.merge(vec![record("11:22:33:44:55:66", "HomeNetwork", -52)], DEFAULT_SIGNAL_FLOOR);
        let table = render(&inventory).with_caption("cycle 3");

        let text = draw_to_string(&Screen::Networks(table), false, 120, 12);
        assert!(text.contains("Wi-Fi Networks"));
        assert!(text.contains("Signal Strength"));
        assert!(text.contains("HomeNetwork"));
        assert!(text.contains("11:22:33:44:55:66"));
        assert!(text.contains("2437 MHz"));
        assert!(text.contains("cycle 3"));
        assert!(text.contains("Ctrl+C"));
    }

    #[test]
    fn test_draw_empty_table_shows_header() {
        let text = draw_to_string(&Screen::Networks(render(&Inventory::new())), false, 120, 10);
        assert!(text.contains("BSSID"));
        assert!(text.contains("Encryption"));
    }

    #[test]
    fn test_draw_placeholder() {
        let screen = Screen::Placeholder("Scanning for networks...".to_string());
        let text = draw_to_string(&screen, false, 80, 10);
        assert!(text.contains("Scanning for networks..."));
    }

    #[test]
    fn test_banner_only_when_tall_enough() {
        let screen = Screen::Placeholder("waiting".to_string());
        assert!(draw_to_string(&screen, true, 80, 30).contains("w i f i s c a n"));
        assert!(!draw_to_string(&screen, true, 80, 10).contains("w i f i s c a n"));
    }
}
