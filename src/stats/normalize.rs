use super::NormalizedRecord;
use crate::util::time::acquisition_timestamp;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures that collapse an aggregation to the empty result
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum AggregateError {
    #[error("feature {0} is null")]
    NullFeature(usize),
    #[error("feature {0} has properties that are not an object")]
    InvalidProperties(usize),
    #[error("feature {0} has coordinates that are not a [lon, lat] pair")]
    InvalidCoordinates(usize),
}

/// Copy a feature's properties and add `longitude`/`latitude` with three decimals
pub(crate) fn normalize_feature(
    index: usize,
    feature: &Value,
) -> Result<NormalizedRecord, AggregateError> {
    if feature.is_null() {
        return Err(AggregateError::NullFeature(index));
    }

    let mut props = match feature.get("properties") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(props)) => props.clone(),
        Some(_) => return Err(AggregateError::InvalidProperties(index)),
    };

    let coordinates = feature
        .get("geometry")
        .and_then(|geometry| geometry.get("coordinates"))
        .filter(|coordinates| !coordinates.is_null());

    if let Some(coordinates) = coordinates {
        let (lon, lat) = match coordinates.as_array().map(Vec::as_slice) {
            Some([lon, lat, ..]) => lon.as_f64().zip(lat.as_f64()),
            _ => None,
        }
        .ok_or(AggregateError::InvalidCoordinates(index))?;

        props.insert("longitude".to_owned(), Value::String(format_fixed3(lon)));
        props.insert("latitude".to_owned(), Value::String(format_fixed3(lat)));
    }

    Ok(props)
}

/// Three-decimal text for a coordinate, rounding exact halfway values away from zero.
///
/// `{:.3}` alone rounds those to even (`100.0625` would become `100.062`).
pub(crate) fn format_fixed3(value: f64) -> String {
    // Halfway values have exactly four decimals ending in 5: odd multiples of 1/16
    let sixteenths = value * 16.0;
    if sixteenths.fract() != 0.0 || sixteenths % 2.0 == 0.0 {
        return format!("{:.3}", value);
    }
    // value * 1000 is exact here, and round() goes away from zero
    format!("{:.3}", (value * 1000.0).round() / 1000.0)
}

/// Acquisition time of a record, `None` if `acq_date`/`acq_time` are missing or malformed
pub(crate) fn record_timestamp(props: &NormalizedRecord) -> Option<NaiveDateTime> {
    let date = props.get("acq_date")?.as_str()?;
    let time = props.get("acq_time")?.as_str()?;
    acquisition_timestamp(date, time)
}

/// Normalize every feature and order the records newest first.
///
/// Records without a usable timestamp go last, in input order.
pub(crate) fn normalize_and_sort(
    features: &[Value],
) -> Result<Vec<NormalizedRecord>, AggregateError> {
    let mut keyed = features
        .iter()
        .enumerate()
        .map(|(index, feature)| -> Result<_, AggregateError> {
            let props = normalize_feature(index, feature)?;
            Ok((record_timestamp(&props), props))
        })
        .collect::<Result<Vec<_>, AggregateError>>()?;

    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    Ok(keyed.into_iter().map(|(_, props)| props).collect())
}

/// Number from a JSON value, reading strings by their leading numeric prefix
pub(crate) fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
    .filter(|n| !n.is_nan())
}

/// Parse the longest leading decimal number of `input`, ignoring what follows
/// (`"15.3 MW"` reads as 15.3). Leading whitespace is skipped.
pub(crate) fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_digits = count_digits(end);
    end += int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    } else if int_digits == 0 {
        return None;
    }
    if end == 0 || !bytes[..end].iter().any(u8::is_ascii_digit) {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}
