use std::{fs, path::Path};

use energy_monitors::{
    report, AnomalyFlagger, ConsumptionError, ConsumptionLoader, LoaderError, ReportOptions,
};

/// 2 hours of 15-minute readings of 1 kWh starting at `start_hour`
fn quarter_hourly(dir: &Path, name: &str, start_hour: u32) {
    let mut contents = String::from("TxnDate,TxnTime,Consumption\n");
    for k in 0..8 {
        let (h, m) = (start_hour + k / 4, (k % 4) * 15);
        contents.push_str(&format!("03 Jan 2022,{:02}:{:02}:00,1.0\n", h, m));
    }
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn three_contiguous_exports() {
    let dir = tempfile::tempdir().unwrap();
    quarter_hourly(dir.path(), "KwhConsumptionBlower78_1.csv", 0);
    quarter_hourly(dir.path(), "KwhConsumptionBlower78_2.csv", 2);
    quarter_hourly(dir.path(), "KwhConsumptionBlower78_3.csv", 4);
    let output = dir.path().join("processed_results.csv");

    let table = report::run(
        ConsumptionLoader::default().data_path(dir.path()),
        &AnomalyFlagger::default(),
        &ReportOptions::default().output(&output).no_plot(),
    )
    .unwrap();

    assert_eq!(table.len(), 6);
    assert!(table.records().iter().all(|r| r.consumption == 4.));
    assert_eq!(table.average_consumption(), 4.);
    assert_eq!(table.anomaly_count(), 0);
    assert!(table.results().contains("Avg Consumption: 4.00 kWh"));

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 7);
    assert!(contents
        .lines()
        .nth(1)
        .unwrap()
        .starts_with("2022-01-03 00:00:00,4.0,0,0,False,2022-01-03,,Off-Peak,False"));
}

#[test]
fn gap_hours_are_zero_filled() {
    let dir = tempfile::tempdir().unwrap();
    quarter_hourly(dir.path(), "a.csv", 6);
    quarter_hourly(dir.path(), "b.csv", 9);
    quarter_hourly(dir.path(), "c.csv", 0);
    let output = dir.path().join("out.csv");

    let table = report::run(
        ConsumptionLoader::default()
            .files(["a.csv", "b.csv", "c.csv"])
            .data_path(dir.path()),
        &AnomalyFlagger::default(),
        &ReportOptions::default().output(&output).no_plot(),
    )
    .unwrap();

    let consumption = table.consumption();
    assert_eq!(
        consumption,
        vec![4., 4., 0., 0., 0., 0., 4., 4., 0., 4., 4.]
    );
    assert_eq!(table.gaps(), 5);
    assert_eq!(table.average_consumption(), 24. / 11.);
    let hours: Vec<u32> = table.records().iter().map(|r| r.hour).collect();
    assert_eq!(hours, (0..11).collect::<Vec<u32>>());
}

#[test]
fn missing_export_aborts_the_report() {
    let dir = tempfile::tempdir().unwrap();
    quarter_hourly(dir.path(), "KwhConsumptionBlower78_1.csv", 0);
    quarter_hourly(dir.path(), "KwhConsumptionBlower78_3.csv", 4);
    let output = dir.path().join("processed_results.csv");

    let result = report::run(
        ConsumptionLoader::default().data_path(dir.path()),
        &AnomalyFlagger::default(),
        &ReportOptions::default()
            .output(&output)
            .plot_dir(dir.path()),
    );

    match result {
        Err(ConsumptionError::Loader(LoaderError::MissingFiles(files))) => {
            assert_eq!(files, vec![dir.path().join("KwhConsumptionBlower78_2.csv")]);
            let message = LoaderError::MissingFiles(files).to_string();
            assert!(message.contains("KwhConsumptionBlower78_2.csv"));
        }
        other => panic!("expected missing files, got {:?}", other.map(|t| t.len())),
    }
    assert!(!output.exists());
    assert!(!dir.path().join("consumption.svg").exists());
    assert!(!dir.path().join("heatmap.svg").exists());
}

#[test]
fn duplicated_readings_across_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.csv"),
        "TxnDate,TxnTime,Consumption\n2022-01-03,10:15:00,2.5\n2022-01-03,11:00:00,1.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.csv"),
        "TxnDate,TxnTime,Consumption\n2022-01-03,10:15:00,99\n2022-01-03,10:45:00,0.5\n",
    )
    .unwrap();
    let table = report::run(
        ConsumptionLoader::default()
            .files(["a.csv", "b.csv"])
            .data_path(dir.path()),
        &AnomalyFlagger::default(),
        &ReportOptions::default()
            .output(dir.path().join("out.csv"))
            .no_plot(),
    )
    .unwrap();
    assert_eq!(table.consumption(), vec![3., 1.]);
}

#[test]
fn nan_reading_aborts_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut contents = String::from("TxnDate,TxnTime,Consumption\n");
    for h in 0..30 {
        contents.push_str(&format!("{:02} Jan 2022,{:02}:00:00,1.0\n", 3 + h / 24, h % 24));
    }
    contents.push_str("2022-01-04,10:00:00,NaN\n2022-01-04,11:00:00,500\n");
    fs::write(dir.path().join("a.csv"), contents).unwrap();
    let output = dir.path().join("out.csv");

    let result = report::run(
        ConsumptionLoader::default()
            .files(["a.csv"])
            .data_path(dir.path()),
        &AnomalyFlagger::default(),
        &ReportOptions::default().output(&output).no_plot(),
    );

    assert!(matches!(
        result,
        Err(ConsumptionError::Loader(LoaderError::NonFinite { line: 32, .. }))
    ));
    assert!(!output.exists());
}
