use serde::Serialize;

use super::Series;
use crate::error::Result;
use crate::report_helpers::{self, pad};

pub fn print_report(series: &[Series], title: &str) {
    if series.is_empty() {
        println!("No rated entities for {title}.");
        return;
    }

    let name_width = report_helpers::max_label_width(
        series
            .iter()
            .flat_map(|s| s.data.iter().map(|d| d.label.as_str())),
        6,
    );
    let separator = report_helpers::separator((name_width + 19).max(40));

    println!("{title}");
    for s in series {
        println!();
        println!(" {} ({})", s.id, s.data.len());
        println!("{separator}");
        for d in &s.data {
            println!(" {}  {:>7.2} {:>7.2}", pad(&d.label, name_width), d.x, d.y);
        }
        println!("{separator}");
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    series: &'a [Series],
}

pub fn print_json(series: &[Series], source: &str) -> Result<()> {
    report_helpers::print_json_stdout(&JsonReport { source, series })
}
