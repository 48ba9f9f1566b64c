use chrono::Local;
use crossterm::cursor::Show;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use tracing::warn;

use crate::render::{
    CellView, Palette, RenderTarget, SparklineChart, SummaryView, TableBody, Tone,
};
use crate::view::{TableView, HEADERS};

const CHART_WIDTH: u16 = 24;
/// Eight bar heights per terminal row.
const CHART_LEVELS: u64 = 8;

const WIDTHS: [Constraint; 12] = [
    Constraint::Length(4),
    Constraint::Min(18),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(10),
    Constraint::Length(12),
    Constraint::Length(18),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(10),
];

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen and mouse capture for the lifetime of the
/// table. Pair with [`restore`].
pub fn setup() -> io::Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Full-screen rendition: summary on top, the table with a trend pane
/// beside it, and a status line.
pub struct TerminalTarget<B: Backend> {
    terminal: Terminal<B>,
    view: TableView,
}

impl<B: Backend> TerminalTarget<B> {
    pub fn new(terminal: Terminal<B>, viewport_rows: usize) -> Self {
        Self {
            terminal,
            view: TableView::new(viewport_rows),
        }
    }
}

impl<B: Backend> RenderTarget for TerminalTarget<B> {
    fn replace_rows(&mut self, body: TableBody) {
        self.view.replace_rows(body);
    }

    fn scroll_offset(&self) -> usize {
        self.view.scroll_offset()
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.view.set_scroll_offset(offset);
    }

    fn update_summary(&mut self, summary: SummaryView) {
        self.view.summary = Some(summary);
    }

    fn draw_chart(&mut self, element_id: &str, chart: SparklineChart) {
        self.view.charts.insert(element_id.to_string(), chart);
    }

    fn present(&mut self) {
        let view = &self.view;
        if let Err(e) = self.terminal.draw(|frame| draw_dashboard(frame, view)) {
            warn!("Failed to draw dashboard: {}", e);
        }
    }
}

fn draw_dashboard(frame: &mut Frame, view: &TableView) {
    let [summary_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [table_area, chart_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(CHART_WIDTH + 2)])
            .areas(main_area);

    let summary = Paragraph::new(view.summary_line()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Cryptocurrency Prices by Market Cap "),
    );
    frame.render_widget(summary, summary_area);

    draw_table(frame, view, table_area);
    draw_charts(frame, view, chart_area);

    let status = Line::from(vec![
        Span::styled(
            format!(" Updated {} ", Local::now().format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(view.viewport_label()),
        Span::styled(
            "   / search   ↑↓ scroll   q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}

fn draw_table(frame: &mut Frame, view: &TableView, area: Rect) {
    let header = Row::new(HEADERS[..WIDTHS.len()].iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view
        .visible_rows()
        .iter()
        .map(|row| Row::new(row.cells.iter().map(styled_cell)));

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(1);
    frame.render_widget(table, area);

    // A placeholder spans every column, so it goes over the table body.
    if let TableBody::Placeholder { message, .. } = &view.body {
        let body = area.inner(Margin::new(1, 1));
        if body.height > 1 {
            let line = Rect {
                y: body.y + 1,
                height: 1,
                ..body
            };
            frame.render_widget(Paragraph::new(*message).alignment(Alignment::Center), line);
        }
    }
}

/// One single-height sparkline per visible row, lined up with the table.
fn draw_charts(frame: &mut Frame, view: &TableView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(HEADERS[WIDTHS.len()]);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (i, row) in view.visible_rows().iter().enumerate() {
        let y = inner.y + 1 + i as u16;
        if y >= inner.bottom() {
            break;
        }
        let Some(chart) = view.charts.get(&row.chart_id) else {
            continue;
        };

        let levels = chart_levels(&chart.samples, inner.width as usize);
        let sparkline = Sparkline::default()
            .data(&levels)
            .max(CHART_LEVELS)
            .style(Style::default().fg(palette_color(chart.palette)));
        frame.render_widget(sparkline, Rect { y, height: 1, ..inner });
    }
}

fn styled_cell(view: &CellView) -> Cell<'_> {
    Cell::from(view.text.as_str()).style(tone_style(view.tone))
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::default(),
        Tone::Positive => Style::default().fg(Color::Green),
        Tone::Negative => Style::default().fg(Color::Red),
        Tone::Flash => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    }
}

fn palette_color(palette: Palette) -> Color {
    match palette {
        Palette::Positive => Color::Green,
        Palette::Negative => Color::Red,
    }
}

/// Averages samples into at most `width` buckets and scales them between the
/// lowest and highest bucket. A flat series sits at half height.
pub fn chart_levels(samples: &[f64], width: usize) -> Vec<u64> {
    if samples.is_empty() || width == 0 {
        return Vec::new();
    }

    let buckets = width.min(samples.len());
    let points: Vec<f64> = (0..buckets)
        .map(|b| {
            let from = b * samples.len() / buckets;
            let to = ((b + 1) * samples.len() / buckets).max(from + 1);
            let chunk = &samples[from..to];
            chunk.iter().sum::<f64>() / chunk.len() as f64
        })
        .collect();

    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= 0.0 || !range.is_finite() {
        return vec![CHART_LEVELS / 2; points.len()];
    }

    points
        .iter()
        .map(|p| ((p - min) / range * CHART_LEVELS as f64).round() as u64)
        .collect()
}
