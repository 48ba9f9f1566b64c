use prettytable::{format, Cell, Row, Table};
use tickerglass_engine::format::format_percentage;
use tracing::warn;

use crate::render::{
    CellView, Palette, RenderTarget, RowView, SparklineChart, SummaryView, TableBody, Tone,
};
use crate::view::{TableView, HEADERS};

/// Plain stdout rendition for a one-shot snapshot. The trend column holds
/// the first-to-last change of the sparkline.
pub struct PrintTarget {
    view: TableView,
}

impl PrintTarget {
    pub fn new(rows: usize) -> Self {
        Self {
            view: TableView::new(rows),
        }
    }

    pub fn build_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(HEADERS.iter().map(|h| Cell::new(h)).collect()));

        if let TableBody::Placeholder { message, colspan } = &self.view.body {
            table.add_row(Row::new(vec![Cell::new(message)
                .with_hspan(*colspan)
                .style_spec("c")]));
        }
        for row in self.view.visible_rows() {
            table.add_row(self.table_row(row));
        }

        table
    }

    fn table_row(&self, row: &RowView) -> Row {
        let mut cells: Vec<Cell> = row.cells.iter().map(styled_cell).collect();

        let trend = match self.view.charts.get(&row.chart_id) {
            Some(chart) => {
                let style = match chart.palette {
                    Palette::Positive => "Fg",
                    Palette::Negative => "Fr",
                };
                Cell::new(&chart_trend(chart)).style_spec(style)
            }
            None => Cell::new(""),
        };
        cells.push(trend);

        Row::new(cells)
    }
}

fn styled_cell(view: &CellView) -> Cell {
    let cell = Cell::new(&view.text);
    match view.tone {
        Tone::Plain => cell,
        Tone::Positive => cell.style_spec("Fg"),
        Tone::Negative => cell.style_spec("Fr"),
        Tone::Flash => cell.style_spec("bFy"),
    }
}

/// Change from the first to the last sample; `--` when it cannot be told.
pub fn chart_trend(chart: &SparklineChart) -> String {
    match (chart.samples.first(), chart.samples.last()) {
        (Some(first), Some(last)) if *first != 0.0 => {
            format_percentage(Some((last - first) / first * 100.0))
        }
        _ => "--".to_string(),
    }
}

impl RenderTarget for PrintTarget {
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
        println!("{}", self.view.summary_line());
        println!("{}", self.view.viewport_label());
        if let Err(e) = self.build_table().print_tty(false) {
            warn!("Failed to print dashboard table: {}", e);
        }
    }
}
