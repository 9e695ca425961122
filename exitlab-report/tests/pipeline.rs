//! End-to-end: load the backtest fixture, build reports, check the numbers.

use std::io::Write;
use std::path::PathBuf;

use exitlab_report::{load_and_build, ReportConfig, ReportError, Verdict, REJECT_SCORE};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../exitlab-core/tests/fixtures/backtest_result.json")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn roi_ladder_report() {
    let loaded = load_and_build(&fixture(), &ReportConfig::default(), Some("RoiLadder")).unwrap();
    assert_eq!(loaded.reports.len(), 1);
    let report = &loaded.reports[0];

    assert_eq!(report.closed_trades, 7);
    assert_eq!(report.zero_duration, 2);
    assert_eq!(report.tree.len(), 3);

    let roi = report.tree.get("roi").unwrap();
    assert_eq!(roi.exits, 4);
    assert!(approx(roi.total_profit, 32.5));
    assert!(approx(roi.avg_profit, 8.125));
    assert_eq!(roi.avg_duration, 33);
    assert!(approx(roi.total_profit_pct, 32.5 / 49.5 * 100.0));

    let stop_loss = report.tree.get("stop_loss").unwrap();
    assert!(approx(stop_loss.total_profit, -14.0));
    assert_eq!(stop_loss.avg_duration, 80);
    assert!(approx(stop_loss.std_dev_duration, 40.0));

    let exit_signal = report.tree.get("exit_signal").unwrap();
    assert!(approx(exit_signal.total_profit, 3.0));
    assert!(report.tree.get("force_exit").is_none());
}

#[test]
fn roi_ladder_tiers() {
    let loaded = load_and_build(&fixture(), &ReportConfig::default(), Some("RoiLadder")).unwrap();
    let roi = loaded.reports[0].tree.get("roi").unwrap();

    let labels: Vec<&str> = roi.children.nodes().iter().map(|n| n.reason.as_str()).collect();
    assert_eq!(labels, vec!["roi 0:0.100", "roi 60:0.020", "roi inf+"]);

    let top = roi.children.get("roi 0:0.100").unwrap();
    assert_eq!(top.exits, 2);
    assert!(approx(top.total_profit, 27.0));
    assert_eq!(top.avg_duration, 15);
    assert!(approx(top.total_profit_pct, 27.0 / 32.5 * 100.0));

    let low = roi.children.get("roi 60:0.020").unwrap();
    assert_eq!(low.exits, 1);
    assert!(approx(low.total_profit, 5.0));

    let catch_all = roi.children.get("roi inf+").unwrap();
    assert_eq!(catch_all.exits, 1);
    assert!(approx(catch_all.total_profit, 0.5));
    assert_eq!(catch_all.avg_duration, 0);
}

#[test]
fn roi_ladder_score_is_baseline() {
    let loaded = load_and_build(&fixture(), &ReportConfig::default(), Some("RoiLadder")).unwrap();
    let score = &loaded.reports[0].score;
    assert_eq!(score.verdict, Verdict::Scored);
    assert!((score.score - std::f64::consts::LN_2 * 0.985).abs() < 1e-6);
}

#[test]
fn losing_strategy_is_rejected() {
    let loaded = load_and_build(&fixture(), &ReportConfig::default(), Some("Losing")).unwrap();
    let report = &loaded.reports[0];
    assert_eq!(report.score.score, REJECT_SCORE);
    assert_eq!(report.score.verdict, Verdict::Unprofitable);
    assert!(report.roi_table.is_empty());
    assert!(approx(report.tree.get("stop_loss").unwrap().total_profit_pct, -100.0));
}

#[test]
fn all_strategies_in_name_order() {
    let loaded = load_and_build(&fixture(), &ReportConfig::default(), None).unwrap();
    let names: Vec<&str> = loaded.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Losing", "RoiLadder"]);
    for report in &loaded.reports {
        assert_eq!(loaded.strategy(report).unwrap().stake_currency, "USDT");
    }
}

#[test]
fn unknown_strategy_is_an_error() {
    let err = load_and_build(&fixture(), &ReportConfig::default(), Some("Nope")).unwrap_err();
    assert!(matches!(err, ReportError::UnknownStrategy(_)));
}

#[test]
fn config_file_drives_the_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[score.expectancy]\nbaseline = 0.2\nsensitivity = 2.0\nweight = 0.0").unwrap();
    let config = ReportConfig::from_file(file.path()).unwrap();

    let loaded = load_and_build(&fixture(), &config, Some("RoiLadder")).unwrap();
    let expected = std::f64::consts::LN_2 * (0.985 - 0.30 * 2.0);
    assert!((loaded.reports[0].score.score - expected).abs() < 1e-6);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = load_and_build(&fixture().with_file_name("absent.json"), &ReportConfig::default(), None)
        .unwrap_err();
    assert!(matches!(err, ReportError::Load(_)));
}
