use serde::Serialize;

use super::{GroupedView, RespondentTable};
use crate::error::Result;
use crate::report_helpers::{self, pad};

/// Print one table per respondent, the average last.
pub fn print_report(view: &GroupedView) {
    let tables = view.tables();
    if tables.is_empty() {
        println!("No submissions found.");
        return;
    }

    let (axis1, axis2) = view.rating_type.axis_labels();
    let name_width = report_helpers::max_label_width(
        tables
            .iter()
            .flat_map(|t| t.rows.iter().map(|r| r.entity_name.as_str())),
        6,
    );
    // 1 (leading space) + name + 2 + 10 + 1 + 10 + 1 + 6 = name + 31
    let separator = report_helpers::separator((name_width + 31).max(50));

    let real = view.entries.iter().filter(|e| !e.is_average()).count();
    println!("{} ratings ({real} submissions)", view.rating_type);
    for table in &tables {
        println!();
        match &table.submission_id {
            Some(id) => println!(" {} [{id}]", table.respondent_name),
            None => println!(" {}", table.respondent_name),
        }
        println!("{separator}");
        println!(
            " {}  {:>10} {:>10} {:>6}",
            pad("Entity", name_width),
            axis1,
            axis2,
            "Score"
        );
        println!("{separator}");
        for row in &table.rows {
            println!(
                " {}  {:>10.2} {:>10.2} {:>6.2}",
                pad(&row.entity_name, name_width),
                row.axis1,
                row.axis2,
                row.score
            );
        }
        println!("{separator}");
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rating_type: &'a str,
    axis1: &'a str,
    axis2: &'a str,
    tables: Vec<RespondentTable>,
}

pub fn print_json(view: &GroupedView) -> Result<()> {
    let (axis1, axis2) = view.rating_type.axis_labels();
    report_helpers::print_json_stdout(&JsonReport {
        rating_type: view.rating_type.as_str(),
        axis1,
        axis2,
        tables: view.tables(),
    })
}
