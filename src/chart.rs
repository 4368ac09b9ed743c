//! Gantt-style timeline charts
//!
//! Builds timeline bars from task rows or projected spans and draws them as
//! a standalone SVG document.

use crate::projection::{ModuleOrdering, ProjectedSpan};
use crate::tracker::TaskRow;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const LABEL_WIDTH: f64 = 260.0;
const PLOT_WIDTH: f64 = 900.0;
const ROW_HEIGHT: f64 = 26.0;
const BAR_HEIGHT: f64 = 18.0;
const HEADER_HEIGHT: f64 = 56.0;
const AXIS_HEIGHT: f64 = 40.0;
const LEGEND_ROW_HEIGHT: f64 = 20.0;

const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

/// One horizontal bar on a timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBar {
    /// Row label drawn left of the plot
    pub label: String,
    /// Module the bar belongs to (drives its colour)
    pub module: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Bars for the actual timeline
///
/// # Arguments
/// * `rows` - Rows already filtered for the actual view
/// * `ordering` - Module ordering used to group the bars
/// * `as_of` - End date used for tasks without a completion date
///
/// # Returns
/// One bar per row with a start date, grouped by module in `ordering`
/// order and by start date within a module. Open bars never end before they
/// start.
pub fn actual_bars(
    rows: &[TaskRow],
    ordering: &ModuleOrdering,
    as_of: NaiveDate,
) -> Vec<TimelineBar> {
    let mut bars: Vec<TimelineBar> = rows
        .iter()
        .filter_map(|row| {
            let start = row.date_started?;
            let end = row.date_completed.unwrap_or(as_of).max(start);
            Some(TimelineBar {
                label: row.title.clone(),
                module: row.module_label.clone(),
                start,
                end,
            })
        })
        .collect();

    bars.sort_by(|a, b| {
        ordering
            .compare(&a.module, &b.module)
            .then(a.start.cmp(&b.start))
    });
    bars
}

/// Bars for the projected timeline, one per module span
pub fn projected_bars(spans: &[ProjectedSpan]) -> Vec<TimelineBar> {
    spans
        .iter()
        .map(|span| TimelineBar {
            label: span.module.clone(),
            module: span.module.clone(),
            start: span.start,
            end: span.end,
        })
        .collect()
}

/// Draw bars as an SVG document
///
/// # Arguments
/// * `title` - Chart title
/// * `bars` - Bars in display order, top to bottom
///
/// # Returns
/// The SVG text. An empty bar list yields a small chart saying "No data".
pub fn render_svg(title: &str, bars: &[TimelineBar]) -> String {
    let (Some(first), Some(last)) = (
        bars.iter().map(|bar| bar.start).min(),
        bars.iter().map(|bar| bar.end).max(),
    ) else {
        return render_empty(title);
    };

    let modules = legend_modules(bars);
    let span_days = (last - first).num_days().max(1) as f64;
    let x_of = |date: NaiveDate| {
        LABEL_WIDTH + (date - first).num_days() as f64 / span_days * PLOT_WIDTH
    };

    let plot_bottom = HEADER_HEIGHT + bars.len() as f64 * ROW_HEIGHT;
    let width = LABEL_WIDTH + PLOT_WIDTH + 20.0;
    let height = plot_bottom + AXIS_HEIGHT + modules.len() as f64 * LEGEND_ROW_HEIGHT + 10.0;

    let mut svg = svg_open(width, height);
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&title_text(title));

    // Month gridlines
    for tick in month_ticks(first, last) {
        let x = x_of(tick);
        svg.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{HEADER_HEIGHT}" x2="{x:.1}" y2="{plot_bottom}" stroke="#e5e5e5"/>"##
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{}" font-family="sans-serif" font-size="11" fill="#444" text-anchor="middle">{}</text>"##,
            plot_bottom + 16.0,
            tick.format("%b %Y")
        ));
        svg.push('\n');
    }

    for (row, bar) in bars.iter().enumerate() {
        let y = HEADER_HEIGHT + row as f64 * ROW_HEIGHT;
        let x = x_of(bar.start);
        // Same-day bars still get a visible sliver
        let w = (x_of(bar.end) - x).max(2.0);
        let colour = modules
            .get(bar.module.as_str())
            .copied()
            .unwrap_or(PALETTE[0]);
        svg.push_str(&format!(
            r##"<text x="{}" y="{}" font-family="sans-serif" font-size="12" fill="#222" text-anchor="end">{}</text>"##,
            LABEL_WIDTH - 8.0,
            y + ROW_HEIGHT / 2.0 + 4.0,
            escape_xml(&bar.label)
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{:.1}" width="{w:.1}" height="{BAR_HEIGHT}" rx="3" fill="{colour}"><title>{}: {} to {}</title></rect>"#,
            y + (ROW_HEIGHT - BAR_HEIGHT) / 2.0,
            escape_xml(&bar.label),
            bar.start,
            bar.end
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r##"<line x1="{LABEL_WIDTH}" y1="{plot_bottom}" x2="{}" y2="{plot_bottom}" stroke="#444"/>"##,
        LABEL_WIDTH + PLOT_WIDTH
    ));
    svg.push('\n');

    let mut legend_y = plot_bottom + AXIS_HEIGHT;
    let mut ordered: Vec<(&str, &str)> = modules.iter().map(|(m, c)| (*m, *c)).collect();
    ordered.sort_by_key(|(module, _)| first_row_of(bars, module));
    for (module, colour) in ordered {
        svg.push_str(&format!(
            r#"<rect x="{LABEL_WIDTH}" y="{:.1}" width="12" height="12" fill="{colour}"/>"#,
            legend_y - 10.0
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"<text x="{}" y="{legend_y:.1}" font-family="sans-serif" font-size="12" fill="#222">{}</text>"##,
            LABEL_WIDTH + 18.0,
            escape_xml(module)
        ));
        svg.push('\n');
        legend_y += LEGEND_ROW_HEIGHT;
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_empty(title: &str) -> String {
    let width = LABEL_WIDTH + PLOT_WIDTH;
    let height = HEADER_HEIGHT + 3.0 * ROW_HEIGHT;
    let mut svg = svg_open(width, height);
    svg.push_str(&title_text(title));
    svg.push_str(&format!(
        r##"<text x="{}" y="{}" font-family="sans-serif" font-size="14" fill="#666" text-anchor="middle">No data</text>"##,
        width / 2.0,
        HEADER_HEIGHT + ROW_HEIGHT
    ));
    svg.push('\n');
    svg.push_str("</svg>\n");
    svg
}

fn svg_open(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ) + "\n"
}

fn title_text(title: &str) -> String {
    format!(
        r##"<text x="{}" y="28" font-family="sans-serif" font-size="18" font-weight="bold" fill="#222">{}</text>"##,
        LABEL_WIDTH / 4.0,
        escape_xml(title)
    ) + "\n"
}

/// Colour assignment per module, in order of first appearance
fn legend_modules(bars: &[TimelineBar]) -> BTreeMap<&str, &'static str> {
    let mut modules: BTreeMap<&str, &'static str> = BTreeMap::new();
    for bar in bars {
        let next = modules.len();
        modules
            .entry(bar.module.as_str())
            .or_insert(PALETTE[next % PALETTE.len()]);
    }
    modules
}

fn first_row_of(bars: &[TimelineBar], module: &str) -> usize {
    bars.iter()
        .position(|bar| bar.module == module)
        .unwrap_or(usize::MAX)
}

/// First day of every month in `(first, last]`, plus `first` itself
fn month_ticks(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut ticks = vec![first];
    let mut cursor = first.with_day(1);
    while let Some(month_start) = cursor {
        let next = if month_start.month() == 12 {
            NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
        };
        match next {
            Some(tick) if tick <= last => ticks.push(tick),
            _ => break,
        }
        cursor = next;
    }
    ticks
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
