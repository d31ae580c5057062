//! Dashboard statistics for fire detection datasets.
//!
//! [`parse_geo_data`] turns a GeoJSON feature collection into the newest-first
//! record list plus four independent distributions: confidence level, daily
//! frequency, day/night split and fire radiative power buckets. A record that
//! lacks the field one distribution needs is left out of that distribution only.

mod dataset;
mod normalize;

pub use dataset::{default_dataset, load_dataset, DatasetError};

use crate::util::time::parse_date;
use normalize::{normalize_and_sort, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Feature properties plus derived `longitude`/`latitude` strings
pub type NormalizedRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub low: usize,
    pub nominal: usize,
    pub high: usize,
}

impl ConfidenceCounts {
    pub fn total(&self) -> usize {
        self.low + self.nominal + self.high
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNightCounts {
    #[serde(rename = "D")]
    pub day: usize,
    #[serde(rename = "N")]
    pub night: usize,
}

/// Detections per fire radiative power range, upper bounds inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrpDistribution {
    #[serde(rename = "0-20")]
    pub up_to_20: usize,
    #[serde(rename = "20-50")]
    pub up_to_50: usize,
    #[serde(rename = "50-100")]
    pub up_to_100: usize,
    #[serde(rename = ">100")]
    pub over_100: usize,
}

impl FrpDistribution {
    pub fn total(&self) -> usize {
        self.up_to_20 + self.up_to_50 + self.up_to_100 + self.over_100
    }

    fn add(&mut self, frp: f64) {
        if frp <= 20.0 {
            self.up_to_20 += 1;
        } else if frp <= 50.0 {
            self.up_to_50 += 1;
        } else if frp <= 100.0 {
            self.up_to_100 += 1;
        } else {
            self.over_100 += 1;
        }
    }
}

/// Number of detections on one acquisition date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Normalized records, newest acquisition first
    pub raw_features: Vec<NormalizedRecord>,
    pub confidence_counts: ConfidenceCounts,
    /// Oldest date first
    pub daily_counts: Vec<DailyCount>,
    pub day_night_counts: DayNightCounts,
    pub frp_distribution: FrpDistribution,
}

impl AggregationResult {
    /// The result reported for invalid input: all counts zero, no records
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

/// Running counts for one pass over the records
#[derive(Debug, Default)]
struct Tally {
    confidence: ConfidenceCounts,
    daily: BTreeMap<String, usize>,
    day_night: DayNightCounts,
    frp: FrpDistribution,
}

impl Tally {
    fn record(mut self, props: &NormalizedRecord) -> Self {
        // Missing or unrecognised confidence counts as low
        match props.get("conf").and_then(Value::as_str) {
            Some("nominal") => self.confidence.nominal += 1,
            Some("high") => self.confidence.high += 1,
            _ => self.confidence.low += 1,
        }

        if let Some(date) = props.get("acq_date").and_then(date_key) {
            *self.daily.entry(date).or_default() += 1;
        }

        match props.get("daynight").and_then(Value::as_str) {
            Some("D") => self.day_night.day += 1,
            Some("N") => self.day_night.night += 1,
            _ => {}
        }

        if let Some(frp) = props.get("frp").and_then(parse_number) {
            self.frp.add(frp);
        }

        self
    }

    fn finish(self, raw_features: Vec<NormalizedRecord>) -> AggregationResult {
        let mut daily_counts: Vec<DailyCount> = self
            .daily
            .into_iter()
            .map(|(name, value)| DailyCount { name, value })
            .collect();
        // Dates that do not parse keep their name order after the valid ones
        daily_counts.sort_by_key(|day| {
            let date = parse_date(&day.name);
            (date.is_none(), date)
        });

        AggregationResult {
            raw_features,
            confidence_counts: self.confidence,
            daily_counts,
            day_night_counts: self.day_night,
            frp_distribution: self.frp,
        }
    }
}

/// Daily bucket name; empty strings and zero are not dates
fn date_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|n| n != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Aggregate a fire detection feature collection for the dashboard.
///
/// Never fails: a missing collection, a `features` member that is absent or not
/// an array, or a feature that cannot be normalized all yield
/// [`AggregationResult::empty`].
pub fn parse_geo_data(geo_data: Option<&Value>) -> AggregationResult {
    let Some(features) = geo_data
        .and_then(|data| data.get("features"))
        .and_then(Value::as_array)
    else {
        log::warn!("Fire dataset is invalid or empty");
        return AggregationResult::empty();
    };

    match normalize_and_sort(features) {
        Ok(records) => {
            let tally = records.iter().fold(Tally::default(), Tally::record);
            tally.finish(records)
        }
        Err(err) => {
            log::error!("Error aggregating fire dataset: {}", err);
            AggregationResult::empty()
        }
    }
}

/// Aggregate the bundled dataset
pub fn parse_default_geo_data() -> AggregationResult {
    match default_dataset() {
        Ok(data) => parse_geo_data(Some(&data)),
        Err(err) => {
            log::error!("Bundled fire dataset is unreadable: {}", err);
            AggregationResult::empty()
        }
    }
}
