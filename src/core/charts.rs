//! Bar-chart figures built from frequency tables.
//!
//! The figure shape follows the charting service's trace/layout JSON, so a
//! [`Figure`] can be posted as-is.

use crate::core::aggregate::FrequencyRow;
use crate::core::breakdown::Breakdown;
use crate::core::month::YearMonth;
use serde::Serialize;

const BLUE: (u8, u8, u8) = (55, 128, 191);
const ORANGE: (u8, u8, u8) = (255, 153, 51);
const RED: (u8, u8, u8) = (255, 0, 0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLine {
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    pub line: MarkerLine,
}

impl Marker {
    fn rgb((r, g, b): (u8, u8, u8)) -> Self {
        Self {
            color: format!("rgba({}, {}, {}, 0.6)", r, g, b),
            line: MarkerLine {
                color: format!("rgba({}, {}, {}, 1.0)", r, g, b),
                width: 1,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: Marker,
    pub name: String,
    pub orientation: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl BarTrace {
    fn vertical(name: String, x: Vec<String>, y: Vec<f64>, color: (u8, u8, u8)) -> Self {
        Self {
            x,
            y,
            marker: Marker::rgb(color),
            name,
            orientation: "v",
            kind: "bar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

fn labels(rows: &[FrequencyRow]) -> Vec<String> {
    rows.iter().map(|r| r.label.clone()).collect()
}

fn counts(rows: &[FrequencyRow]) -> Vec<f64> {
    rows.iter().map(|r| r.count as f64).collect()
}

/// Stacked count and share bars for one breakdown
pub fn breakdown_figure(breakdown: Breakdown, month: &YearMonth, rows: &[FrequencyRow]) -> Figure {
    let subject = breakdown.subject();
    let x = labels(rows);

    let count_trace = BarTrace::vertical(
        format!("{} Count During {}", subject, month),
        x.clone(),
        counts(rows),
        BLUE,
    );
    let share_trace = BarTrace::vertical(
        format!("{} Percentages During {}", subject, month),
        x,
        rows.iter().map(|r| r.share).collect(),
        ORANGE,
    );

    Figure {
        data: vec![count_trace, share_trace],
        layout: Layout {
            title: format!("{} During {}", subject, month),
            barmode: Some("stack".to_string()),
        },
    }
}

/// Side-by-side counts for location subtype, crime category and outcome
pub fn combined_figure(
    month: &YearMonth,
    locations: &[FrequencyRow],
    categories: &[FrequencyRow],
    outcomes: &[FrequencyRow],
) -> Figure {
    let trace = |name: &str, rows: &[FrequencyRow], color| {
        BarTrace::vertical(
            format!("{} Count During {}", name, month),
            labels(rows),
            counts(rows),
            color,
        )
    };

    Figure {
        data: vec![
            trace("Crime Sub_Location", locations, BLUE),
            trace("Crime Crime_Category", categories, RED),
            trace("Crime Consequences", outcomes, ORANGE),
        ],
        layout: Layout {
            title: format!("Crime All Stats During {}", month),
            barmode: None,
        },
    }
}
