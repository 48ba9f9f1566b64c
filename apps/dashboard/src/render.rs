//! Turns coin records into row views and pushes them to a render target.

use tickerglass_engine::format::{
    format_dominance, format_number, format_percentage, format_price, Sign,
};
use tickerglass_models::{CoinRecord, GlobalSnapshot, PreviousPriceIndex};

pub const TABLE_COLUMNS: usize = 13;
pub const NO_RESULTS_MESSAGE: &str = "No cryptocurrencies found matching your search.";
pub const ERROR_MESSAGE: &str = "Error loading data. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Positive,
    Negative,
    Flash,
}

impl From<Sign> for Tone {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::Positive => Tone::Positive,
            Sign::Negative => Tone::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub text: String,
    pub tone: Tone,
}

impl CellView {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// One table row. `cells` holds every column except the trailing chart,
/// which is addressed by `chart_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub icon: String,
    pub cells: Vec<CellView>,
    pub chart_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Rows(Vec<RowView>),
    Placeholder { message: &'static str, colspan: usize },
}

impl TableBody {
    pub fn no_results() -> Self {
        TableBody::Placeholder {
            message: NO_RESULTS_MESSAGE,
            colspan: TABLE_COLUMNS,
        }
    }

    pub fn load_error() -> Self {
        TableBody::Placeholder {
            message: ERROR_MESSAGE,
            colspan: TABLE_COLUMNS,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub market_cap: String,
    pub volume: String,
    pub dominance: String,
}

impl From<&GlobalSnapshot> for SummaryView {
    fn from(snapshot: &GlobalSnapshot) -> Self {
        Self {
            market_cap: format!("${}", format_number(snapshot.total_market_cap)),
            volume: format!("${}", format_number(snapshot.total_volume)),
            dominance: format_dominance(snapshot.dominance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparklineChart {
    pub samples: Vec<f64>,
    pub palette: Palette,
}

impl SparklineChart {
    pub fn new(samples: &[f64]) -> Self {
        let palette = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) if first > last => Palette::Negative,
            _ => Palette::Positive,
        };

        Self {
            samples: samples.to_vec(),
            palette,
        }
    }
}

/// Where rendered rows end up. Charts are decorative trend lines: no axes,
/// legend, tooltip or animation. The scroll offset is owned by the target; the
/// caller saves and restores it around a content replacement.
pub trait RenderTarget {
    fn replace_rows(&mut self, body: TableBody);
    fn scroll_offset(&self) -> usize;
    fn set_scroll_offset(&mut self, offset: usize);
    fn update_summary(&mut self, summary: SummaryView);
    fn draw_chart(&mut self, element_id: &str, chart: SparklineChart);
    fn present(&mut self);
}

pub fn build_row(rank: usize, coin: &CoinRecord, previous: &PreviousPriceIndex) -> RowView {
    let symbol = coin.display_symbol();
    let changed = price_changed(coin, previous);
    let flash = if changed { Tone::Flash } else { Tone::Plain };

    let max_supply = coin
        .max_supply
        .filter(|supply| *supply != 0.0)
        .map(format_number)
        .unwrap_or_else(|| "∞".to_string());

    let cells = vec![
        CellView::plain(rank.to_string()),
        CellView::plain(format!("{} {}", coin.name, symbol)),
        CellView::toned(format_price(coin.current_price), flash),
        change_cell(coin.price_change_percentage_1h),
        change_cell(coin.price_change_percentage_24h),
        change_cell(coin.price_change_percentage_7d),
        CellView::plain(format!("${}", format_number(coin.market_cap))),
        CellView::toned(format!("${}", format_number(coin.total_volume)), flash),
        CellView::plain(format!("{} {}", format_number(coin.circulating_supply), symbol)),
        CellView::plain(max_supply),
        CellView::plain(format!("${}", format_number(coin.ath))),
        change_cell(coin.ath_change_percentage),
    ];

    RowView {
        icon: coin.image.clone(),
        cells,
        chart_id: coin.chart_element_id(),
    }
}

fn change_cell(percent: f64) -> CellView {
    CellView::toned(format_percentage(Some(percent)), Sign::of(percent).into())
}

fn price_changed(coin: &CoinRecord, previous: &PreviousPriceIndex) -> bool {
    previous
        .get(&coin.id)
        .is_some_and(|prev| *prev != 0.0 && *prev != coin.current_price)
}

/// Draws `records` in order: rows first, then the summary, then one chart
/// per record that carries a sparkline. Ranks follow the given order.
pub fn render_records<T: RenderTarget>(
    target: &mut T,
    records: &[CoinRecord],
    previous: &PreviousPriceIndex,
    snapshot: &GlobalSnapshot,
) {
    if records.is_empty() {
        target.replace_rows(TableBody::no_results());
        return;
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, coin)| build_row(i + 1, coin, previous))
        .collect();
    target.replace_rows(TableBody::Rows(rows));
    target.update_summary(SummaryView::from(snapshot));

    for coin in records.iter().filter(|coin| !coin.sparkline.is_empty()) {
        target.draw_chart(&coin.chart_element_id(), SparklineChart::new(&coin.sparkline));
    }
}
