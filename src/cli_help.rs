//! Long help text constants for CLI subcommands.
//!
//! Kept out of `cli.rs` so the argument definitions stay short.

/// Average: full recomputation from a grouped payload.
pub const AVERAGE: &str = "\
Recompute the average and print every respondent's ratings.

The input is the grouped submissions JSON returned by the API: an object
keyed by submission id. Any \"Average\" entry in the file is ignored; the
average is always rebuilt from the real submissions.

For each rated entity:
  axis1   = round2(mean of axis1 over every rating of the entity)
  axis2   = round2(mean of axis2 over every rating of the entity)
  score   = round2((axis1 + axis2) / 2)

Axis names depend on --rating-type:
  stakeholder  Influence / Impact
  impact       Relevance / Magnitude
  financial    Likelihood / Magnitude";

/// Matrix: quadrant thresholds.
pub const MATRIX: &str = "\
Classify one data source into the four quadrants of a two-axis chart.

A rating is high on an axis when it is 3 or more (3.0 itself is high):
  High / High    axis1 >= 3 and axis2 >= 3
  High / Low     axis1 >= 3 and axis2 <  3
  Low  / High    axis1 <  3 and axis2 >= 3
  Low  / Low     axis1 <  3 and axis2 <  3

Empty quadrants are not listed. Use --source to pick a respondent by the label
printed by `dm average` (respondents sharing a name show as \"Ana (S2)\") or by
submission id; the default is the computed Average.";

/// Import: CSV layout per lens.
pub const IMPORT: &str = "\
Parse a filled rating CSV into a submission.

Expected columns (header matched case-insensitively, extra columns and a
leading byte order mark ignored):
  stakeholder    id, Name, Influence, Impact
  impact         id, Topic, Dimension, Relevance, Magnitude
  financial      id, Topic, Dimension, Likelihood, Magnitude

Fields containing commas or quotes must be double-quoted (\"\" escapes a quote).
The whole file is rejected on the first bad row; errors name the row and
column. Without --into or --submit, the createSubmission input is printed as
JSON.

Examples:
  dm template stakeholders.json -o ratings.csv
  dm import ratings.csv --respondent-id r1 --uploader Ana --into grouped.json
  dm import ratings.csv --respondent-id r1 --uploader Ana --submit";
