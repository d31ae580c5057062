use firemap::stats::{
    load_dataset, parse_default_geo_data, parse_geo_data, AggregationResult, ConfidenceCounts,
    DailyCount, DayNightCounts, FrpDistribution,
};
use serde_json::{json, Value};
use std::io::Write;

fn create_test_feature(conf: &str, date: &str, time: &str, daynight: &str, frp: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "conf": conf,
            "acq_date": date,
            "acq_time": time,
            "daynight": daynight,
            "frp": frp,
        },
        "geometry": { "type": "Point", "coordinates": [100.5, 25.25] }
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

#[test]
fn test_two_record_example() {
    let data = collection(vec![
        create_test_feature("low", "2024-03-01", "0100", "N", "75"),
        create_test_feature("high", "2024-03-01", "1230", "D", "15"),
    ]);

    let result = parse_geo_data(Some(&data));

    assert_eq!(
        result.confidence_counts,
        ConfidenceCounts { low: 1, nominal: 0, high: 1 }
    );
    assert_eq!(
        result.daily_counts,
        vec![DailyCount { name: "2024-03-01".to_owned(), value: 2 }]
    );
    assert_eq!(result.day_night_counts, DayNightCounts { day: 1, night: 1 });
    assert_eq!(
        result.frp_distribution,
        FrpDistribution { up_to_20: 1, up_to_50: 0, up_to_100: 1, over_100: 0 }
    );

    let times: Vec<&str> = result
        .raw_features
        .iter()
        .map(|record| record["acq_time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["1230", "0100"]);
    assert_eq!(result.raw_features[0]["longitude"], json!("100.500"));
    assert_eq!(result.raw_features[0]["latitude"], json!("25.250"));
}

#[test]
fn test_invalid_collections_give_empty_result() {
    let cases = [
        None,
        Some(json!(null)),
        Some(json!({})),
        Some(json!({ "features": null })),
        Some(json!({ "features": "many" })),
        Some(json!({ "features": { "0": {} } })),
        Some(json!([1, 2, 3])),
    ];
    for data in &cases {
        let result = parse_geo_data(data.as_ref());
        assert_eq!(result, AggregationResult::empty());
        assert!(result.is_empty());
    }
}

#[test]
fn test_broken_feature_collapses_whole_result() {
    let data = collection(vec![
        create_test_feature("high", "2024-03-01", "1230", "D", "15"),
        Value::Null,
    ]);
    assert!(parse_geo_data(Some(&data)).is_empty());

    let data = collection(vec![json!({ "geometry": { "coordinates": ["a", "b"] } })]);
    assert!(parse_geo_data(Some(&data)).is_empty());
}

#[test]
fn test_missing_fields_only_skip_their_distribution() {
    let data = collection(vec![
        json!({ "properties": { "acq_date": "2024-03-02", "acq_time": "0800" } }),
        json!({ "properties": { "conf": "nominal", "daynight": "X", "frp": "n/a" } }),
        json!({ "properties": { "conf": "extreme", "frp": 250 } }),
        json!({}),
    ]);

    let result = parse_geo_data(Some(&data));

    // Absent and unknown confidence both count as low
    assert_eq!(
        result.confidence_counts,
        ConfidenceCounts { low: 3, nominal: 1, high: 0 }
    );
    assert_eq!(result.confidence_counts.total(), 4);
    assert_eq!(
        result.daily_counts,
        vec![DailyCount { name: "2024-03-02".to_owned(), value: 1 }]
    );
    assert_eq!(result.day_night_counts, DayNightCounts::default());
    assert_eq!(result.frp_distribution.over_100, 1);
    assert_eq!(result.frp_distribution.total(), 1);
    assert_eq!(result.raw_features.len(), 4);
}

#[test]
fn test_frp_bucket_bounds_are_inclusive() {
    let data = collection(
        ["20", "20.01", "50", "100", "100.5", "-1"]
            .iter()
            .map(|frp| json!({ "properties": { "frp": frp } }))
            .collect(),
    );

    let result = parse_geo_data(Some(&data));
    assert_eq!(
        result.frp_distribution,
        FrpDistribution { up_to_20: 2, up_to_50: 2, up_to_100: 1, over_100: 1 }
    );
}

#[test]
fn test_daily_counts_ascend_and_records_descend() {
    let data = collection(vec![
        create_test_feature("high", "2024-03-03", "0500", "D", "1"),
        create_test_feature("high", "2024-03-01", "2300", "N", "1"),
        create_test_feature("high", "2024-03-02", "0000", "N", "1"),
        create_test_feature("high", "2024-03-03", "0459", "D", "1"),
        create_test_feature("high", "2024-03-01", "0000", "N", "1"),
    ]);

    let result = parse_geo_data(Some(&data));

    let names: Vec<&str> = result.daily_counts.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    let total: usize = result.daily_counts.iter().map(|d| d.value).sum();
    assert_eq!(total, 5);

    let stamps: Vec<String> = result
        .raw_features
        .iter()
        .map(|r| format!("{} {}", r["acq_date"].as_str().unwrap(), r["acq_time"].as_str().unwrap()))
        .collect();
    assert_eq!(
        stamps,
        vec![
            "2024-03-03 0500",
            "2024-03-03 0459",
            "2024-03-02 0000",
            "2024-03-01 2300",
            "2024-03-01 0000",
        ]
    );
}

#[test]
fn test_input_is_not_mutated() {
    let data = collection(vec![create_test_feature("high", "2024-03-01", "1230", "D", "15")]);
    let before = data.clone();
    let _ = parse_geo_data(Some(&data));
    assert_eq!(data, before);
}

#[test]
fn test_result_serializes_with_dashboard_keys() {
    let data = collection(vec![create_test_feature("high", "2024-03-01", "1230", "D", "15")]);
    let value = serde_json::to_value(parse_geo_data(Some(&data))).unwrap();

    assert_eq!(value["confidenceCounts"]["high"], json!(1));
    assert_eq!(value["dayNightCounts"]["D"], json!(1));
    assert_eq!(value["frpDistribution"]["0-20"], json!(1));
    assert_eq!(value["frpDistribution"][">100"], json!(0));
    assert_eq!(value["dailyCounts"][0]["name"], json!("2024-03-01"));
    assert_eq!(value["rawFeatures"].as_array().unwrap().len(), 1);
}

#[test]
fn test_bundled_dataset_is_consistent() {
    let result = parse_default_geo_data();
    let count = result.raw_features.len();
    assert!(count > 0);

    assert_eq!(result.confidence_counts.total(), count);
    assert!(result.frp_distribution.total() <= count);
    assert!(result.day_night_counts.day + result.day_night_counts.night <= count);
    assert_eq!(result.daily_counts.iter().map(|d| d.value).sum::<usize>(), count);
}

#[test]
fn test_load_dataset_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let data = collection(vec![create_test_feature("nominal", "2024-03-09", "1111", "D", "42")]);
    write!(file, "{}", data).unwrap();

    let loaded = load_dataset(file.path()).unwrap();
    let result = parse_geo_data(Some(&loaded));
    assert_eq!(result.confidence_counts.nominal, 1);
    assert_eq!(result.frp_distribution.up_to_50, 1);

    assert!(load_dataset(&file.path().with_extension("missing")).is_err());
}

#[test]
fn test_blank_dates_are_not_days() {
    let data = collection(vec![
        json!({ "properties": { "acq_date": 0 } }),
        json!({ "properties": { "acq_date": "" } }),
        json!({ "properties": { "acq_date": 20240301 } }),
    ]);

    let result = parse_geo_data(Some(&data));
    assert_eq!(
        result.daily_counts,
        vec![DailyCount { name: "20240301".to_owned(), value: 1 }]
    );
    assert_eq!(result.raw_features.len(), 3);
}
