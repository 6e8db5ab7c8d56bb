//! Handlers behind each `dm` subcommand.
//!
//! Local commands work from grouped JSON files; remote ones go through a
//! `Session` over the GraphQL transport.

use std::path::Path;

use tracing::info;

use materiality::config::Config;
use materiality::context::AggregationContext;
use materiality::csv::rows::{
    self, EntityRef, FinancialRatingRow, RatingRow, StakeholderRatingRow, TopicRatingRow,
};
use materiality::error::{Error, Result};
use materiality::grouped::{self, GroupedView, from_wire_json};
use materiality::model::{RatingType, SubmissionType};
use materiality::quadrant::{self, classify_source, materiality_matrix};
use materiality::report_helpers::print_json_stdout;
use materiality::transport::Session;
use materiality::transport::graphql::GraphqlTransport;

/// Report id used for contexts built from local files.
const LOCAL_REPORT: &str = "local";

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}

fn load_context(path: &Path, rating_type: RatingType) -> Result<AggregationContext> {
    let json = read_file(path)?;
    let submissions = from_wire_json(&json, rating_type)?;
    info!(path = %path.display(), submissions = submissions.len(), "loaded grouped file");
    AggregationContext::from_submissions(LOCAL_REPORT, rating_type, submissions)
}

fn print_view(view: &GroupedView, json: bool) -> Result<()> {
    if json {
        grouped::report::print_json(view)
    } else {
        grouped::report::print_report(view);
        Ok(())
    }
}

pub fn average(path: &Path, rating_type: RatingType, json: bool) -> Result<()> {
    let ctx = load_context(path, rating_type)?;
    print_view(&ctx.grouped(), json)
}

pub fn matrix(path: &Path, rating_type: RatingType, source: &str, json: bool) -> Result<()> {
    let ctx = load_context(path, rating_type)?;
    let series = classify_source(&ctx.grouped(), source)?;
    if json {
        quadrant::report::print_json(&series, source)
    } else {
        let (a1, a2) = rating_type.axis_labels();
        quadrant::report::print_report(&series, &format!("{source}: {a1} vs {a2}"));
        Ok(())
    }
}

pub fn double_materiality(impact: &Path, financial: &Path, json: bool) -> Result<()> {
    let impact = load_context(impact, RatingType::Impact)?;
    let financial = load_context(financial, RatingType::Financial)?;
    let impact_points = impact
        .average()
        .map(|a| a.rating_points())
        .unwrap_or_default();
    let financial_points = financial
        .average()
        .map(|a| a.rating_points())
        .unwrap_or_default();
    let series = materiality_matrix(&impact_points, &financial_points);
    if json {
        quadrant::report::print_json(&series, "Average")
    } else {
        quadrant::report::print_report(&series, "Double materiality: Impact vs Financial");
        Ok(())
    }
}

pub fn template(rating_type: RatingType, entities: &Path, output: Option<&Path>) -> Result<()> {
    let entities: Vec<EntityRef> = serde_json::from_str(&read_file(entities)?)?;
    let csv = match rating_type {
        RatingType::Stakeholder => rows::write_template::<StakeholderRatingRow>(&entities),
        RatingType::Impact => rows::write_template::<TopicRatingRow>(&entities),
        RatingType::Financial => rows::write_template::<FinancialRatingRow>(&entities),
    };
    match output {
        Some(path) => {
            std::fs::write(path, csv)?;
            info!(path = %path.display(), entities = entities.len(), "template written");
        }
        None => print!("{csv}"),
    }
    Ok(())
}

/// Where an imported CSV ends up.
pub enum ImportTarget<'a> {
    /// Print the `createSubmission` input.
    Print,
    /// Add to a local grouped file, rewriting it.
    Local {
        path: &'a Path,
        submission_id: Option<&'a str>,
    },
    /// Send to the API.
    Remote(&'a Config),
}

pub struct ImportArgs<'a> {
    pub file: &'a Path,
    pub respondent_id: &'a str,
    pub uploader: &'a str,
    pub kind: Option<SubmissionType>,
}

pub fn import(rating_type: RatingType, args: &ImportArgs, target: ImportTarget) -> Result<()> {
    match rating_type {
        RatingType::Stakeholder => import_rows::<StakeholderRatingRow>(rating_type, args, target),
        RatingType::Impact => import_rows::<TopicRatingRow>(rating_type, args, target),
        RatingType::Financial => import_rows::<FinancialRatingRow>(rating_type, args, target),
    }
}

fn import_rows<R: RatingRow>(
    rating_type: RatingType,
    args: &ImportArgs,
    target: ImportTarget,
) -> Result<()> {
    let kind = args
        .kind
        .unwrap_or_else(|| rating_type.default_submission_type());
    if !rating_type.accepts(kind) {
        return Err(Error::validation(format!(
            "a {kind} submission cannot be added to {rating_type} ratings"
        )));
    }
    let rows = rows::parse_rows::<R>(&read_file(args.file)?, args.uploader)?;
    info!(file = %args.file.display(), rows = rows.len(), "parsed upload");

    match target {
        ImportTarget::Print => {
            let input = rows::create_input(args.respondent_id, LOCAL_REPORT, kind, &rows);
            print_json_stdout(&input)
        }
        ImportTarget::Local {
            path,
            submission_id,
        } => {
            let mut ctx = if path.exists() {
                load_context(path, rating_type)?
            } else {
                AggregationContext::new(LOCAL_REPORT, rating_type)
            };
            let id = submission_id
                .map(str::to_string)
                .unwrap_or_else(|| format!("local-{}", ctx.submissions().len() + 1));
            let submission =
                rows::into_submission(&id, args.respondent_id, args.uploader, kind, &rows)?;
            ctx.apply_created(submission)?;
            let view = ctx.grouped();
            std::fs::write(path, view.to_wire_json()?)?;
            println!("added submission {id} to {}", path.display());
            Ok(())
        }
        ImportTarget::Remote(config) => {
            let mut session = open_session(config)?;
            session.refresh()?;
            let input = rows::create_input(
                args.respondent_id,
                config.require_report_id()?,
                kind,
                &rows,
            );
            let view = session.create(&input)?;
            grouped::report::print_report(&view);
            Ok(())
        }
    }
}

fn open_session(config: &Config) -> Result<Session<GraphqlTransport>> {
    let transport =
        GraphqlTransport::new(config.require_endpoint()?, config.token(), config.timeout())?;
    let context = AggregationContext::new(config.require_report_id()?, config.rating_type);
    Ok(Session::new(transport, context))
}

pub fn fetch(config: &Config, json: bool, output: Option<&Path>) -> Result<()> {
    let mut session = open_session(config)?;
    let view = session.refresh()?;
    if let Some(path) = output {
        std::fs::write(path, view.to_wire_json()?)?;
        info!(path = %path.display(), "grouped payload saved");
    }
    print_view(&view, json)
}

pub fn delete(config: &Config, id: &str) -> Result<()> {
    let mut session = open_session(config)?;
    session.refresh()?;
    let view = session.delete(id)?;
    println!("deleted submission {id}");
    grouped::report::print_report(&view);
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
