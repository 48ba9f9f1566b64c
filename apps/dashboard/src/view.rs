//! What a target currently shows: the table body, the summary, charts keyed
//! by element id and the scroll window over the rows.

use std::collections::HashMap;

use crate::render::{RowView, SparklineChart, SummaryView, TableBody};

pub const HEADERS: [&str; 13] = [
    "#",
    "Coin",
    "Price",
    "1h",
    "24h",
    "7d",
    "Market Cap",
    "Volume (24h)",
    "Circulating Supply",
    "Max Supply",
    "ATH",
    "ATH Change",
    "Last 7 Days",
];

#[derive(Debug)]
pub struct TableView {
    pub body: TableBody,
    pub summary: Option<SummaryView>,
    pub charts: HashMap<String, SparklineChart>,
    scroll_offset: usize,
    viewport_rows: usize,
}

impl TableView {
    pub fn new(viewport_rows: usize) -> Self {
        Self {
            body: TableBody::Rows(Vec::new()),
            summary: None,
            charts: HashMap::new(),
            scroll_offset: 0,
            viewport_rows: viewport_rows.max(1),
        }
    }

    pub fn replace_rows(&mut self, body: TableBody) {
        self.body = body;
        self.charts.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Clamped so the last row can still reach the top of the window.
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.body.row_count().saturating_sub(1));
    }

    /// Data rows inside the scroll window; empty for a placeholder.
    pub fn visible_rows(&self) -> &[RowView] {
        match &self.body {
            TableBody::Rows(rows) => {
                let end = (self.scroll_offset + self.viewport_rows).min(rows.len());
                &rows[self.scroll_offset.min(end)..end]
            }
            TableBody::Placeholder { .. } => &[],
        }
    }

    pub fn summary_line(&self) -> String {
        match &self.summary {
            Some(summary) => format!(
                "Market Cap: {}   24h Volume: {}   Dominance: {}",
                summary.market_cap, summary.volume, summary.dominance
            ),
            None => "Market Cap: --   24h Volume: --   Dominance: --".to_string(),
        }
    }

    pub fn viewport_label(&self) -> String {
        let total = match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder { .. } => 0,
        };
        viewport_label(self.scroll_offset, self.viewport_rows, total)
    }
}

/// One-based, inclusive row range; `rows 0-0 of 0` when nothing is listed.
pub fn viewport_label(offset: usize, viewport_rows: usize, total: usize) -> String {
    if total == 0 {
        return "rows 0-0 of 0".to_string();
    }

    let start = offset.min(total - 1);
    let end = (start + viewport_rows).min(total);
    format!("rows {}-{} of {}", start + 1, end, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CellView, Tone};

    fn rows(n: usize) -> TableBody {
        TableBody::Rows(
            (1..=n)
                .map(|i| RowView {
                    icon: String::new(),
                    cells: vec![CellView {
                        text: i.to_string(),
                        tone: Tone::Plain,
                    }],
                    chart_id: format!("chart-{i}"),
                })
                .collect(),
        )
    }

    #[test]
    fn window_starts_at_scroll_offset() {
        let mut view = TableView::new(5);
        view.replace_rows(rows(20));
        view.set_scroll_offset(7);

        let visible = view.visible_rows();
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[0].chart_id, "chart-8");
        assert_eq!(view.viewport_label(), "rows 8-12 of 20");
    }

    #[test]
    fn replacing_rows_resets_and_offset_clamps() {
        let mut view = TableView::new(5);
        view.replace_rows(rows(20));
        view.set_scroll_offset(7);

        view.replace_rows(rows(3));
        assert_eq!(view.scroll_offset(), 0);

        view.set_scroll_offset(7);
        assert_eq!(view.scroll_offset(), 2);
        assert_eq!(view.visible_rows().len(), 1);
    }

    #[test]
    fn empty_listings_read_zero_to_zero() {
        let mut view = TableView::new(5);
        assert_eq!(view.viewport_label(), "rows 0-0 of 0");

        view.replace_rows(TableBody::no_results());
        assert!(view.visible_rows().is_empty());
        assert_eq!(view.viewport_label(), "rows 0-0 of 0");

        assert_eq!(viewport_label(0, 12, 3), "rows 1-3 of 3");
        assert_eq!(viewport_label(9, 12, 3), "rows 3-3 of 3");
    }

    #[test]
    fn summary_line_before_and_after_update() {
        let mut view = TableView::new(5);
        assert!(view.summary_line().contains("--"));

        view.summary = Some(SummaryView {
            market_cap: "$2.40T".to_string(),
            volume: "$85.00B".to_string(),
            dominance: "54.32%".to_string(),
        });
        assert_eq!(
            view.summary_line(),
            "Market Cap: $2.40T   24h Volume: $85.00B   Dominance: 54.32%"
        );
    }
}
