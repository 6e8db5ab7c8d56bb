//! Grouped view of real submissions plus the computed average.
//!
//! Internally the average is a distinct variant, never a submission with a
//! magic id. The sentinel-keyed map only exists at the wire boundary
//! (`to_wire_json` / `from_wire_json`).

pub mod report;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::Average;
use crate::error::{Error, Result};
use crate::model::{AVERAGE_ID, RatingPoint, RatingType, Submission, SubmissionType};

#[derive(Debug, Clone, PartialEq)]
pub enum GroupedEntry {
    Real {
        submission_id: String,
        respondent_id: String,
        respondent_name: String,
        kind: SubmissionType,
        created_at: Option<DateTime<Utc>>,
        points: Vec<RatingPoint>,
    },
    Average {
        points: Vec<RatingPoint>,
    },
}

impl GroupedEntry {
    pub fn respondent_name(&self) -> &str {
        match self {
            Self::Real {
                respondent_name, ..
            } => respondent_name,
            Self::Average { .. } => AVERAGE_ID,
        }
    }

    pub fn points(&self) -> &[RatingPoint] {
        match self {
            Self::Real { points, .. } | Self::Average { points } => points,
        }
    }

    pub fn is_average(&self) -> bool {
        matches!(self, Self::Average { .. })
    }
}

/// Real entries in store order, followed by the average when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedView {
    pub rating_type: RatingType,
    pub entries: Vec<GroupedEntry>,
}

/// One simplified table row. Free-text fields are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub entity_id: String,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub axis1: f64,
    pub axis2: f64,
    pub score: f64,
}

impl From<&RatingPoint> for TableRow {
    fn from(p: &RatingPoint) -> Self {
        Self {
            entity_id: p.entity_id.clone(),
            entity_name: p.entity_name.clone(),
            dimension: p.dimension.as_ref().map(|d| d.name.clone()),
            axis1: p.axis1,
            axis2: p.axis2,
            score: p.score(),
        }
    }
}

/// Rows of one grouped entry, labelled with a unique display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondentTable {
    pub respondent_name: String,
    /// `None` for the average, which has no deletable submission behind it.
    pub submission_id: Option<String>,
    pub rows: Vec<TableRow>,
}

pub fn build_grouped(
    rating_type: RatingType,
    submissions: &[Submission],
    average: Option<&Average>,
) -> GroupedView {
    let mut entries: Vec<GroupedEntry> = submissions
        .iter()
        .map(|s| GroupedEntry::Real {
            submission_id: s.id.clone(),
            respondent_id: s.respondent_id.clone(),
            respondent_name: s.respondent_name.clone(),
            kind: s.kind,
            created_at: s.created_at,
            points: s.rating_points.clone(),
        })
        .collect();
    if let Some(avg) = average {
        entries.push(GroupedEntry::Average {
            points: avg.rating_points(),
        });
    }
    GroupedView {
        rating_type,
        entries,
    }
}

impl GroupedView {
    pub fn average(&self) -> Option<&[RatingPoint]> {
        self.entries
            .iter()
            .find(|e| e.is_average())
            .map(|e| e.points())
    }

    /// Display label of every entry, in entry order. Names shared by several
    /// real submissions, and a real respondent named "Average", get the
    /// submission id appended so every label is unique.
    pub fn source_labels(&self) -> Vec<String> {
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for e in self.entries.iter().filter(|e| !e.is_average()) {
            *name_counts.entry(e.respondent_name()).or_default() += 1;
        }

        self.entries
            .iter()
            .map(|entry| match entry {
                GroupedEntry::Real {
                    submission_id,
                    respondent_name,
                    ..
                } => {
                    let shared = name_counts
                        .get(respondent_name.as_str())
                        .is_some_and(|n| *n > 1);
                    if shared || respondent_name == AVERAGE_ID {
                        format!("{respondent_name} ({submission_id})")
                    } else {
                        respondent_name.clone()
                    }
                }
                GroupedEntry::Average { .. } => AVERAGE_ID.to_string(),
            })
            .collect()
    }

    /// Resolve a data source: a label as printed by `tables` (`"Average"`
    /// selects the computed average), or a real submission id.
    pub fn by_source(&self, source: &str) -> Option<&GroupedEntry> {
        self.source_labels()
            .iter()
            .position(|l| l == source)
            .and_then(|i| self.entries.get(i))
            .or_else(|| {
                self.entries.iter().find(|e| {
                    matches!(e, GroupedEntry::Real { submission_id, .. } if submission_id == source)
                })
            })
    }

    /// Table rows per entry, labelled as in `source_labels`.
    pub fn tables(&self) -> Vec<RespondentTable> {
        self.entries
            .iter()
            .zip(self.source_labels())
            .map(|(entry, label)| RespondentTable {
                respondent_name: label,
                submission_id: match entry {
                    GroupedEntry::Real { submission_id, .. } => Some(submission_id.clone()),
                    GroupedEntry::Average { .. } => None,
                },
                rows: entry.points().iter().map(TableRow::from).collect(),
            })
            .collect()
    }

    /// The same tables keyed by display name.
    pub fn rows_by_respondent(&self) -> BTreeMap<String, Vec<TableRow>> {
        self.tables()
            .into_iter()
            .map(|t| (t.respondent_name, t.rows))
            .collect()
    }

    /// respondentId → submissionId for real submissions. When a respondent has
    /// several submissions the latest inserted one wins.
    pub fn submission_ids_by_respondent(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                GroupedEntry::Real {
                    submission_id,
                    respondent_id,
                    ..
                } => Some((respondent_id.clone(), submission_id.clone())),
                GroupedEntry::Average { .. } => None,
            })
            .collect()
    }

    /// Flatten into the sentinel-keyed JSON map used on the wire.
    pub fn to_wire_json(&self) -> Result<String> {
        let mut map: BTreeMap<String, WireEntry> = BTreeMap::new();
        for entry in &self.entries {
            let (key, wire) = match entry {
                GroupedEntry::Real {
                    submission_id,
                    respondent_id,
                    respondent_name,
                    kind,
                    created_at,
                    points,
                } => {
                    if submission_id == AVERAGE_ID {
                        return Err(Error::invariant(
                            "real submission id collides with the average key",
                        ));
                    }
                    (
                        submission_id.clone(),
                        WireEntry {
                            respondent_id: respondent_id.clone(),
                            respondent_name: respondent_name.clone(),
                            kind: Some(*kind),
                            rating_points: points.clone(),
                            created_at: *created_at,
                        },
                    )
                }
                GroupedEntry::Average { points } => (
                    AVERAGE_ID.to_string(),
                    WireEntry {
                        respondent_id: AVERAGE_ID.to_string(),
                        respondent_name: AVERAGE_ID.to_string(),
                        kind: None,
                        rating_points: points.clone(),
                        created_at: None,
                    },
                ),
            };
            map.insert(key, wire);
        }
        Ok(serde_json::to_string(&map)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    respondent_id: String,
    respondent_name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<SubmissionType>,
    #[serde(default)]
    rating_points: Vec<RatingPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

/// Parse a grouped wire map into real submissions.
///
/// Any `"Average"` key is dropped: the average is always recomputed locally.
/// Entries without a `type` take the lens default; entries whose type does not
/// belong to `rating_type` reject the whole payload.
pub fn from_wire_json(json: &str, rating_type: RatingType) -> Result<Vec<Submission>> {
    let map: BTreeMap<String, WireEntry> = serde_json::from_str(json)?;
    let mut submissions = Vec::with_capacity(map.len());

    for (id, entry) in map {
        if id == AVERAGE_ID {
            warn!("ignoring average entry received from the wire");
            continue;
        }
        let kind = entry
            .kind
            .unwrap_or_else(|| rating_type.default_submission_type());
        if !rating_type.accepts(kind) {
            return Err(Error::validation(format!(
                "submission {id} has type {kind}, which does not belong to {rating_type} ratings"
            )));
        }
        let rating_points = entry
            .rating_points
            .into_iter()
            .map(|mut p| {
                if p.submission_id.is_empty() {
                    p.submission_id = id.clone();
                }
                p
            })
            .collect();
        let submission = Submission {
            id,
            respondent_id: entry.respondent_id,
            respondent_name: entry.respondent_name,
            kind,
            rating_points,
            created_at: entry.created_at,
        };
        submission.validate()?;
        submissions.push(submission);
    }

    Ok(submissions)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
