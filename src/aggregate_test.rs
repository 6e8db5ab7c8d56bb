use super::*;
use crate::fixtures::submission;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn round2_half_up() {
    assert!(close(round2(1.125), 1.13));
    assert!(close(round2(2.0 / 3.0), 0.67));
    assert!(close(round2(1.0 / 3.0), 0.33));
    assert!(close(round2(4.0), 4.0));
}

#[test]
fn round2_halves_below_representation_still_round_up() {
    assert!(close(round2(41.0 / 40.0), 1.03));
    assert!(close(round2((1.03 + 1.0) / 2.0), 1.02));
    assert!(close(round2(2.675), 2.68));
    assert!(close(round2(-1.005), -1.01));
}

#[test]
fn mean_of_many_ratings_rounds_half_up() {
    let mut subs: Vec<Submission> = (0..39)
        .map(|i| submission(&format!("S{i:02}"), "Ana", &[("A", "Alpha", 1.0, 1.0)]))
        .collect();
    subs.push(submission("S39", "Bea", &[("A", "Alpha", 2.0, 1.0)]));

    let avg = compute_average(&subs).unwrap();
    let a = avg.get("A").unwrap();
    assert_eq!(a.count, 40);
    assert!(close(a.axis1, 1.03), "axis1 = {}", a.axis1);
    assert!(close(a.axis2, 1.0));
    assert!(close(a.score, 1.02), "score = {}", a.score);
}

#[test]
fn opposite_ratings_average_to_three() {
    let subs = vec![
        submission("S1", "Ana", &[("A", "Supplier A", 4.0, 2.0)]),
        submission("S2", "Bea", &[("A", "Supplier A", 2.0, 4.0)]),
    ];
    let avg = compute_average(&subs).unwrap();
    let a = avg.get("A").unwrap();
    assert!(close(a.axis1, 3.0));
    assert!(close(a.axis2, 3.0));
    assert!(close(a.score, 3.0));
    assert_eq!(a.count, 2);
}

#[test]
fn no_submissions_means_no_average() {
    assert!(compute_average(&[]).is_none());
}

#[test]
fn submissions_without_points_mean_no_average() {
    let subs = vec![submission("S1", "Ana", &[]), submission("S2", "Bea", &[])];
    assert!(compute_average(&subs).is_none());
}

#[test]
fn mean_is_rounded_to_two_decimals() {
    let subs = vec![
        submission("S1", "Ana", &[("A", "Alpha", 1.0, 5.0)]),
        submission("S2", "Bea", &[("A", "Alpha", 2.0, 5.0)]),
        submission("S3", "Cy", &[("A", "Alpha", 2.0, 4.0)]),
    ];
    let a = compute_average(&subs).unwrap().entities[0].clone();
    assert!(close(a.axis1, 1.67), "got {}", a.axis1);
    assert!(close(a.axis2, 4.67), "got {}", a.axis2);
    assert!(close(a.score, 3.17), "got {}", a.score);
}

#[test]
fn insertion_order_does_not_matter() {
    let s1 = submission("S1", "Ana", &[("A", "Alpha", 1.1, 3.3), ("B", "Beta", 5.0, 1.0)]);
    let s2 = submission("S2", "Bea", &[("B", "Beta", 2.2, 4.4), ("A", "Alpha", 2.7, 1.9)]);
    let s3 = submission("S3", "Cy", &[("A", "Alpha", 4.9, 0.3)]);

    let forward = compute_average(&[s1.clone(), s2.clone(), s3.clone()]).unwrap();
    let backward = compute_average(&[s3, s2, s1]).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn add_then_remove_matches_never_added() {
    let s1 = submission("S1", "Ana", &[("A", "Alpha", 4.0, 2.0)]);
    let s2 = submission("S2", "Bea", &[("A", "Alpha", 2.0, 4.0), ("B", "Beta", 1.0, 1.0)]);

    let before = compute_average(&[s1.clone()]).unwrap();
    let mut all = vec![s1, s2];
    let _ = compute_average(&all);
    all.retain(|s| s.id != "S2");
    let after = compute_average(&all).unwrap();

    assert_eq!(before, after);
    let a = after.get("A").unwrap();
    assert!(close(a.axis1, 4.0));
    assert!(close(a.axis2, 2.0));
    assert!(after.get("B").is_none());
}

#[test]
fn duplicate_entity_in_one_submission_counts_twice() {
    let subs = vec![
        submission("S1", "Ana", &[("A", "Alpha", 5.0, 5.0), ("A", "Alpha", 1.0, 1.0)]),
        submission("S2", "Bea", &[("A", "Alpha", 3.0, 3.0)]),
    ];
    let a = compute_average(&subs).unwrap().entities[0].clone();
    assert_eq!(a.count, 3);
    assert!(close(a.axis1, 3.0));
}

#[test]
fn previous_average_entry_is_ignored() {
    let mut stale = submission("S0", "Average", &[("A", "Alpha", 5.0, 5.0)]);
    stale.id = AVERAGE_ID.to_string();
    let subs = vec![submission("S1", "Ana", &[("A", "Alpha", 1.0, 1.0)]), stale];
    let a = compute_average(&subs).unwrap().entities[0].clone();
    assert_eq!(a.count, 1);
    assert!(close(a.axis1, 1.0));
}

#[test]
fn metadata_comes_from_first_submission_by_id() {
    let subs = vec![
        submission("S2", "Bea", &[("A", "Alpha (renamed)", 1.0, 1.0)]),
        submission("S1", "Ana", &[("A", "Alpha", 1.0, 1.0)]),
    ];
    let avg = compute_average(&subs).unwrap();
    assert_eq!(avg.entities[0].entity_name, "Alpha");
}

#[test]
fn average_points_use_sentinel_ids() {
    let subs = vec![submission("S1", "Ana", &[("A", "Alpha", 4.0, 2.0)])];
    let points = compute_average(&subs).unwrap().rating_points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].submission_id, AVERAGE_ID);
    assert_eq!(points[0].id, "Average-A");
    assert_eq!(points[0].score, Some(3.0));
}
