mod common;
use common::*;

use gcscope::{parse_and_analyze, CollectorFamily, ConfigFile, EventKind, Evidence};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_drives_parsing_and_analysis() {
    let file = create_temp_file(
        "[parser]\ncollector = serial\n\n[analysis]\nmax_pause_ms = 50\n",
    );
    let config = ConfigFile::load_from_path(file.path())
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(config.parser.collector, Some(CollectorFamily::Serial));

    let input = "\
0.100: [GC (Allocation Failure)  8192K->1024K(31744K), 0.0050000 secs]
0.900: [Full GC (Allocation Failure)  30000K->20000K(31744K), 0.0800000 secs]";
    let (log, report) = parse_and_analyze(input, &config).unwrap();

    assert_eq!(kinds(&log), vec![EventKind::SerialNew, EventKind::SerialOld]);
    let finding = report.finding("pause.max.exceeded").expect("pause finding");
    assert!(finding.evidence.contains(&Evidence::Event { index: 1 }));
    assert!(!finding.evidence.contains(&Evidence::Event { index: 0 }));
}

#[test]
fn test_jvm_start_anchors_datestamp_only_logs() {
    let file = create_temp_file("[parser]\njvm_start = 2016-10-10T18:39:37.244-07:00\n");
    let config = ConfigFile::load_from_path(file.path())
        .unwrap()
        .resolve()
        .unwrap();

    let input = "\
2016-10-10T18:43:49.025-0700: [GC pause (G1 Evacuation Pause) (young) 30M->10M(256M), 0.0050000 secs]
2016-10-10T18:43:50.025-0700: [GC pause (G1 Evacuation Pause) (young) 31M->11M(256M), 0.0060000 secs]";
    let (log, _) = parse_and_analyze(input, &config).unwrap();

    let stamps: Vec<u64> = log.events.iter().map(|e| e.timestamp_ms).collect();
    assert_eq!(stamps, vec![251_781, 252_781]);
    assert_eq!(log.metadata.anchor, config.parser.jvm_start);
}

#[test]
fn test_without_jvm_start_first_datestamp_is_zero() {
    let input = "\
2016-10-10T18:43:49.025-0700: [GC pause (G1 Evacuation Pause) (young) 30M->10M(256M), 0.0050000 secs]
2016-10-10T18:43:50.025-0700: [GC pause (G1 Evacuation Pause) (young) 31M->11M(256M), 0.0060000 secs]";
    let log = parse(input);

    let stamps: Vec<u64> = log.events.iter().map(|e| e.timestamp_ms).collect();
    assert_eq!(stamps, vec![0, 1000]);
    assert!(log.metadata.anchor.is_some());
}

#[test]
fn test_project_config_found_from_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("logs").join("2024");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        temp_dir.path().join(".gcscoperc"),
        "[analysis]\nthroughput_threshold = 0.5\n",
    )
    .unwrap();

    let found = ConfigFile::find_project_config_from(&nested).expect("project config");
    let config = ConfigFile::load_from_path(&found).unwrap().resolve().unwrap();
    assert_eq!(config.analysis.throughput_threshold, 0.5);
}

#[test]
fn test_bad_config_reports_the_file() {
    let file = create_temp_file("[parser]\njvm_start = yesterday\n");
    let err = ConfigFile::load_from_path(file.path())
        .unwrap()
        .resolve()
        .unwrap_err();
    assert!(format!("{:#}", err).contains("jvm_start"));

    let file = create_temp_file("[analysis]\nthis line has no separator\n");
    let err = ConfigFile::load_from_path(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid config file"));
}
