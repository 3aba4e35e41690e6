//! Feed normalization
//!
//! Turns a raw NeoWs feed into one [`NeoSummary`] per object listed for the
//! target date. This never fails: missing or malformed upstream values fall
//! back to defaults or `NaN` for the affected field only.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::feed::{CloseApproach, FeedResponse, NeoObject};
use super::parse::{
    cmp_nan_last, default_if_blank, from_epoch_millis, parse_close_approach_full,
    parse_f64_or_nan, start_of_day,
};
use super::{NeoSummary, DEFAULT_ORBITING_BODY, LUNAR_DISTANCE_KM};

/// Normalizes the objects listed under `date` in `feed`
///
/// Returns an empty list when the feed, its date map, or the date's entry is
/// missing. The result is sorted by close-approach time, then by miss
/// distance with unknown distances last.
///
/// # Arguments
/// * `feed` - The upstream payload, if any
/// * `date` - Target calendar date
/// * `zone` - Zone used for textual timestamps and the midnight fallback
pub fn normalize_for_date(feed: Option<&FeedResponse>, date: NaiveDate, zone: Tz) -> Vec<NeoSummary> {
    let date_key = date.to_string();
    let Some(objects) = feed.and_then(|f| f.objects_for(&date_key)) else {
        return Vec::new();
    };

    let mut summaries: Vec<NeoSummary> = objects
        .iter()
        .map(|neo| to_summary(neo, &date_key, date, zone))
        .collect();

    // Stable sort keeps input order for full ties
    summaries.sort_by(|a, b| {
        a.close_approach_time
            .cmp(&b.close_approach_time)
            .then_with(|| cmp_nan_last(a.miss_distance_km, b.miss_distance_km))
    });
    summaries
}

fn to_summary(neo: &NeoObject, date_key: &str, date: NaiveDate, zone: Tz) -> NeoSummary {
    let meters = neo
        .estimated_diameter
        .as_ref()
        .and_then(|d| d.meters.as_ref());
    let approach = choose_close_approach(&neo.close_approach_data, date_key);

    let miss = approach.and_then(|a| a.miss_distance.as_ref());
    let miss_distance_km = parse_f64_or_nan(miss.and_then(|m| m.kilometers.as_deref()));
    let mut miss_distance_lunar = parse_f64_or_nan(miss.and_then(|m| m.lunar.as_deref()));
    if miss_distance_lunar.is_nan() && !miss_distance_km.is_nan() {
        miss_distance_lunar = miss_distance_km / LUNAR_DISTANCE_KM;
    }

    let relative_velocity_km_per_sec = parse_f64_or_nan(
        approach
            .and_then(|a| a.relative_velocity.as_ref())
            .and_then(|v| v.kilometers_per_second.as_deref()),
    );

    NeoSummary {
        id: neo.id.clone().unwrap_or_default(),
        name: neo.name.clone().unwrap_or_default(),
        is_hazardous: neo.is_potentially_hazardous_asteroid.unwrap_or(false),
        diameter_min_meters: meters
            .and_then(|m| m.estimated_diameter_min)
            .unwrap_or(f64::NAN),
        diameter_max_meters: meters
            .and_then(|m| m.estimated_diameter_max)
            .unwrap_or(f64::NAN),
        close_approach_time: resolve_close_approach_time(approach, date, zone),
        orbiting_body: default_if_blank(
            approach.and_then(|a| a.orbiting_body.as_deref()),
            DEFAULT_ORBITING_BODY,
        ),
        miss_distance_km,
        miss_distance_lunar,
        relative_velocity_km_per_sec,
    }
}

/// Picks the approach relevant to the target date
///
/// Among approaches dated `date_key`, the smallest parsed kilometer miss
/// distance wins (unparsable distances lose to any number; earlier entries
/// win ties). With no dated match, the earliest epoch timestamp wins, else
/// the first entry.
pub fn choose_close_approach<'a>(
    approaches: &'a [CloseApproach],
    date_key: &str,
) -> Option<&'a CloseApproach> {
    let mut best_matching: Option<(&CloseApproach, f64)> = None;
    for approach in approaches
        .iter()
        .filter(|a| a.close_approach_date.as_deref() == Some(date_key))
    {
        let miss_km = parse_f64_or_nan(
            approach
                .miss_distance
                .as_ref()
                .and_then(|m| m.kilometers.as_deref()),
        );
        let better = match best_matching {
            None => true,
            Some((_, best_km)) => cmp_nan_last(miss_km, best_km).is_lt(),
        };
        if better {
            best_matching = Some((approach, miss_km));
        }
    }
    if let Some((approach, _)) = best_matching {
        return Some(approach);
    }

    let mut soonest: Option<(&CloseApproach, i64)> = None;
    for approach in approaches {
        if let Some(epoch) = approach.epoch_date_close_approach {
            if soonest.map_or(true, |(_, best)| epoch < best) {
                soonest = Some((approach, epoch));
            }
        }
    }
    soonest.map(|(approach, _)| approach).or(approaches.first())
}

/// Epoch timestamp, then the textual timestamp in `zone`, then midnight of
/// `date` in `zone`
fn resolve_close_approach_time(
    approach: Option<&CloseApproach>,
    date: NaiveDate,
    zone: Tz,
) -> DateTime<Utc> {
    approach
        .and_then(|a| {
            a.epoch_date_close_approach
                .and_then(from_epoch_millis)
                .or_else(|| {
                    a.close_approach_date_full
                        .as_deref()
                        .and_then(|full| parse_close_approach_full(full, zone))
                })
        })
        .unwrap_or_else(|| start_of_day(date, zone))
}
