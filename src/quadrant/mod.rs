//! Four-quadrant classification for two-axis charts (stakeholder map,
//! materiality matrix).
//!
//! A value is "high" on an axis when it is at least `HIGH_THRESHOLD`; the
//! boundary itself counts as high. Buckets are emitted in a fixed order and
//! empty buckets are left out.

pub mod report;

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::grouped::GroupedView;
use crate::model::{HIGH_THRESHOLD, RatingPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    HighHigh,
    HighLow,
    LowHigh,
    LowLow,
}

impl Quadrant {
    /// Output order of the series.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighHigh,
        Quadrant::HighLow,
        Quadrant::LowHigh,
        Quadrant::LowLow,
    ];

    pub fn of(axis1: f64, axis2: f64) -> Self {
        match (axis1 >= HIGH_THRESHOLD, axis2 >= HIGH_THRESHOLD) {
            (true, true) => Self::HighHigh,
            (true, false) => Self::HighLow,
            (false, true) => Self::LowHigh,
            (false, false) => Self::LowLow,
        }
    }

    /// Human label, e.g. "High Influence / Low Impact".
    pub fn label(self, axis1: &str, axis2: &str) -> String {
        let (a, b) = match self {
            Self::HighHigh => ("High", "High"),
            Self::HighLow => ("High", "Low"),
            Self::LowHigh => ("Low", "High"),
            Self::LowLow => ("Low", "Low"),
        };
        format!("{a} {axis1} / {b} {axis2}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub x: f64,
    pub y: f64,
    pub entity_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub id: String,
    pub quadrant: Quadrant,
    pub data: Vec<Datum>,
}

/// Partition `points` into non-empty quadrant series labelled with the given
/// axis names. Every point lands in exactly one series, in input order.
pub fn classify(points: &[RatingPoint], axis_labels: (&str, &str)) -> Vec<Series> {
    let data = points.iter().map(|p| Datum {
        x: p.axis1,
        y: p.axis2,
        entity_id: p.entity_id.clone(),
        label: p.entity_name.clone(),
    });
    bucket(data, axis_labels)
}

fn bucket(data: impl Iterator<Item = Datum>, (axis1, axis2): (&str, &str)) -> Vec<Series> {
    let mut buckets: HashMap<Quadrant, Vec<Datum>> = HashMap::new();
    for d in data {
        buckets.entry(Quadrant::of(d.x, d.y)).or_default().push(d);
    }
    Quadrant::ALL
        .iter()
        .filter_map(|q| {
            let data = buckets.remove(q)?;
            Some(Series {
                id: q.label(axis1, axis2),
                quadrant: *q,
                data,
            })
        })
        .collect()
}

/// Classify the points of one data source: a respondent label as printed in
/// the grouped tables, `"Average"` for the computed average, or a submission id.
pub fn classify_source(view: &GroupedView, source: &str) -> Result<Vec<Series>> {
    let entry = view.by_source(source).ok_or_else(|| {
        Error::NotFound(format!(
            "data source {source:?} (available: {})",
            view.source_labels().join(", ")
        ))
    })?;
    Ok(classify(entry.points(), view.rating_type.axis_labels()))
}

/// Materiality matrix: each topic's impact score on x against its financial
/// score on y. Topics rated in only one lens are skipped.
pub fn materiality_matrix(impact: &[RatingPoint], financial: &[RatingPoint]) -> Vec<Series> {
    let financial_by_id: HashMap<&str, &RatingPoint> = financial
        .iter()
        .map(|p| (p.entity_id.as_str(), p))
        .collect();
    let data = impact.iter().filter_map(|i| {
        let f = financial_by_id.get(i.entity_id.as_str())?;
        Some(Datum {
            x: i.score(),
            y: f.score(),
            entity_id: i.entity_id.clone(),
            label: i.entity_name.clone(),
        })
    });
    bucket(data, ("Impact", "Financial"))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
