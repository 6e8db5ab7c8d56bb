use std::path::PathBuf;

use super::*;

const RATINGS: &str = "id,Name,Influence,Impact\nA,Supplier A,4,2\nB,\"Bank, Local\",1,5\n";

fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn import_local(
    csv: &Path,
    grouped: &Path,
    respondent: &str,
    submission_id: Option<&str>,
) -> Result<()> {
    let args = ImportArgs {
        file: csv,
        respondent_id: respondent,
        uploader: respondent,
        kind: None,
    };
    import(
        RatingType::Stakeholder,
        &args,
        ImportTarget::Local {
            path: grouped,
            submission_id,
        },
    )
}

#[test]
fn import_into_new_file_creates_grouped_payload() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "ratings.csv", RATINGS);
    let grouped = dir.path().join("grouped.json");

    import_local(&csv, &grouped, "Ana", None).unwrap();

    let ctx = load_context(&grouped, RatingType::Stakeholder).unwrap();
    assert_eq!(ctx.submissions().len(), 1);
    assert_eq!(ctx.submissions()[0].id, "local-1");
    let avg = ctx.average().unwrap();
    assert_eq!(avg.get("B").unwrap().entity_name, "Bank, Local");
}

#[test]
fn second_import_updates_the_average() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "ratings.csv", RATINGS);
    let other = write(&dir, "other.csv", "id,Name,Influence,Impact\nA,Supplier A,2,4\n");
    let grouped = dir.path().join("grouped.json");

    import_local(&csv, &grouped, "Ana", Some("S1")).unwrap();
    import_local(&other, &grouped, "Bea", Some("S2")).unwrap();

    let ctx = load_context(&grouped, RatingType::Stakeholder).unwrap();
    let a = ctx.average().unwrap().get("A").unwrap().clone();
    assert_eq!((a.axis1, a.axis2, a.score, a.count), (3.0, 3.0, 3.0, 2));
}

#[test]
fn duplicate_submission_id_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "ratings.csv", RATINGS);
    let grouped = dir.path().join("grouped.json");

    import_local(&csv, &grouped, "Ana", Some("S1")).unwrap();
    let before = std::fs::read_to_string(&grouped).unwrap();
    let err = import_local(&csv, &grouped, "Bea", Some("S1")).unwrap_err();
    assert!(matches!(err, Error::DuplicateSubmission(_)));
    assert_eq!(std::fs::read_to_string(&grouped).unwrap(), before);
}

#[test]
fn bad_csv_is_rejected_before_touching_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "bad.csv", "id,Name,Influence\nA,Supplier A,4\n");
    let grouped = dir.path().join("grouped.json");

    let err = import_local(&csv, &grouped, "Ana", None).unwrap_err();
    assert!(err.to_string().contains("Impact"), "got {err}");
    assert!(!grouped.exists());
}

#[test]
fn import_rejects_type_from_another_lens() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "ratings.csv", RATINGS);
    let args = ImportArgs {
        file: &csv,
        respondent_id: "r1",
        uploader: "Ana",
        kind: Some(SubmissionType::Financial),
    };
    assert!(matches!(
        import(RatingType::Stakeholder, &args, ImportTarget::Print),
        Err(Error::Validation(_))
    ));
}

#[test]
fn template_follows_the_lens() {
    let dir = tempfile::tempdir().unwrap();
    let entities = write(
        &dir,
        "topics.json",
        r#"[{"id": "T1", "name": "Water use", "dimension": "Environmental"}]"#,
    );
    let out = dir.path().join("template.csv");

    template(RatingType::Impact, &entities, Some(&out)).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "id,Topic,Dimension,Relevance,Magnitude\nT1,Water use,Environmental,,\n"
    );
}

#[test]
fn financial_template_and_import_use_likelihood() {
    let dir = tempfile::tempdir().unwrap();
    let entities = write(&dir, "topics.json", r#"[{"id": "T1", "name": "Water use"}]"#);
    let out = dir.path().join("template.csv");
    template(RatingType::Financial, &entities, Some(&out)).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text, "id,Topic,Dimension,Likelihood,Magnitude\nT1,Water use,,,\n");

    let csv = write(&dir, "filled.csv", &text.replace("Water use,,,", "Water use,,4,2"));
    let grouped = dir.path().join("financial.json");
    let args = ImportArgs {
        file: &csv,
        respondent_id: "r1",
        uploader: "CFO",
        kind: None,
    };
    import(
        RatingType::Financial,
        &args,
        ImportTarget::Local {
            path: &grouped,
            submission_id: None,
        },
    )
    .unwrap();

    let ctx = load_context(&grouped, RatingType::Financial).unwrap();
    let t1 = ctx.average().unwrap().get("T1").unwrap().clone();
    assert_eq!((t1.axis1, t1.axis2), (4.0, 2.0));
}

#[test]
fn matrix_for_unknown_source_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "ratings.csv", RATINGS);
    let grouped = dir.path().join("grouped.json");
    import_local(&csv, &grouped, "Ana", None).unwrap();

    assert!(matrix(&grouped, RatingType::Stakeholder, "Ana", false).is_ok());
    assert!(matches!(
        matrix(&grouped, RatingType::Stakeholder, "Nobody", false),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn missing_input_file_names_the_path() {
    let err = average(Path::new("/nonexistent/grouped.json"), RatingType::Stakeholder, false)
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/grouped.json"), "got {err}");
}
