//! Grouping observations per symbol and turning them into table rows.

use crate::analytics::{change_pct, expiry_delivery, rollover_pct, DeltaClassifier};
use crate::models::{CellValue, Observation, ObservationPair};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::warn;

/// Observations grouped by symbol, in first-seen order
pub fn group_by_symbol(observations: &[Observation]) -> Vec<(String, Vec<&Observation>)> {
    let mut groups: Vec<(String, Vec<&Observation>)> = Vec::new();
    for observation in observations {
        match groups.iter().position(|(s, _)| *s == observation.symbol) {
            Some(i) => groups[i].1.push(observation),
            None => groups.push((observation.symbol.clone(), vec![observation])),
        }
    }
    for (_, group) in groups.iter_mut() {
        group.sort_by_key(|o| o.timestamp);
    }
    groups
}

/// Front-month contract: the earliest expiry on or after the latest reading.
/// Observations without an expiry form their own series.
fn front_month<'a>(group: &[&'a Observation]) -> Vec<&'a Observation> {
    let latest = match group.last() {
        Some(o) => o.date(),
        None => return Vec::new(),
    };
    let front = group
        .iter()
        .filter_map(|o| o.expiry)
        .filter(|e| *e >= latest)
        .min();
    group
        .iter()
        .copied()
        .filter(|o| match front {
            Some(expiry) => o.expiry == Some(expiry),
            None => o.expiry.is_none(),
        })
        .collect()
}

/// Earliest and latest front-month readings for each symbol.
///
/// Symbols with fewer than two readings are skipped.
pub fn pair_by_symbol(observations: &[Observation]) -> Vec<ObservationPair> {
    let mut pairs = Vec::new();
    for (symbol, group) in group_by_symbol(observations) {
        let series = front_month(&group);
        match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => {
                match ObservationPair::new((*first).clone(), (*last).clone()) {
                    Ok(pair) => pairs.push(pair),
                    Err(e) => warn!("Skipping {}: {}", symbol, e),
                }
            }
            _ => warn!("Skipping {}: need two readings, found {}", symbol, series.len()),
        }
    }
    pairs
}

/// `eod_summary` rows, one per pair
pub fn eod_summary_rows(classifier: &DeltaClassifier, pairs: &[ObservationPair]) -> Vec<Vec<CellValue>> {
    pairs
        .iter()
        .map(|pair| {
            let result = classifier.classify_pair(pair);
            vec![
                CellValue::Date(pair.current().date()),
                CellValue::from(pair.symbol()),
                CellValue::quantity(pair.prior().open_interest),
                CellValue::quantity(pair.current().open_interest),
                CellValue::pct(result.oi_change),
                CellValue::price(pair.prior().price),
                CellValue::price(pair.current().price),
                CellValue::pct(result.price_change),
                CellValue::from(result.category.as_str()),
                CellValue::Text(result.annotation_label()),
            ]
        })
        .collect()
}

/// `oi_log` rows: the latest front-month reading per symbol, with OI change
/// against the reading before it on the same contract
pub fn oi_log_rows(observations: &[Observation]) -> Vec<Vec<CellValue>> {
    group_by_symbol(observations)
        .into_iter()
        .filter_map(|(_, group)| {
            let series = front_month(&group);
            let latest = *series.last()?;
            let previous = series.len().checked_sub(2).map(|i| series[i]);
            let oi_change = change_pct(previous.and_then(Observation::oi_f64), latest.oi_f64());
            Some(vec![
                CellValue::DateTime(latest.timestamp),
                CellValue::from(latest.symbol.as_str()),
                CellValue::price(latest.price),
                CellValue::quantity(latest.open_interest),
                CellValue::pct(oi_change),
            ])
        })
        .collect()
}

/// Latest reading per expiry, keyed by expiry
fn latest_per_expiry<'a>(
    group: &[&'a Observation],
    on: impl Fn(&Observation) -> bool,
) -> BTreeMap<NaiveDate, &'a Observation> {
    let mut by_expiry: BTreeMap<NaiveDate, &Observation> = BTreeMap::new();
    for observation in group.iter().copied().filter(|o| on(*o)) {
        if let Some(expiry) = observation.expiry {
            by_expiry.insert(expiry, observation);
        }
    }
    by_expiry
}

/// `rollover` rows: near and far contract OI on each symbol's latest date
pub fn rollover_rows(observations: &[Observation]) -> Vec<Vec<CellValue>> {
    let mut rows = Vec::new();
    for (symbol, group) in group_by_symbol(observations) {
        let latest: NaiveDateTime = match group.last() {
            Some(o) => o.timestamp,
            None => continue,
        };
        let date = latest.date();
        let legs = latest_per_expiry(&group, |o| o.date() == date);
        let mut legs = legs.into_iter();
        let (near, far) = match (legs.next(), legs.next()) {
            (Some(near), Some(far)) => (near, far),
            _ => {
                warn!("Skipping rollover for {}: need near and far contracts on {}", symbol, date);
                continue;
            }
        };

        rows.push(vec![
            CellValue::Date(date),
            CellValue::from(symbol.as_str()),
            CellValue::Date(near.0),
            CellValue::Date(far.0),
            CellValue::quantity(near.1.open_interest),
            CellValue::quantity(far.1.open_interest),
            CellValue::pct(rollover_pct(near.1.open_interest, far.1.open_interest)),
        ]);
    }
    rows
}

/// `expiry_delivery` rows for contracts expiring on `expiry`.
///
/// OI on expiry is the expiring contract's last reading that day; OI next day
/// is the following contract's last reading on the first later date.
pub fn expiry_delivery_rows(observations: &[Observation], expiry: NaiveDate) -> Vec<Vec<CellValue>> {
    let mut rows = Vec::new();
    for (symbol, group) in group_by_symbol(observations) {
        let on_expiry = group
            .iter()
            .rev()
            .find(|o| o.expiry == Some(expiry) && o.date() == expiry);

        let next_day = group.iter().map(|o| o.date()).filter(|d| *d > expiry).min();

        let (on_expiry, next_day) = match (on_expiry, next_day) {
            (Some(o), Some(d)) => (*o, d),
            _ => {
                warn!("Skipping delivery for {}: missing expiry-day or next-day readings", symbol);
                continue;
            }
        };

        let next_contract = latest_per_expiry(&group, |o| o.date() == next_day)
            .into_iter()
            .find(|(e, _)| *e > expiry)
            .map(|(_, o)| o);

        let oi_next_day = next_contract.and_then(|o| o.open_interest);
        let delivery = expiry_delivery(on_expiry.open_interest, oi_next_day);

        rows.push(vec![
            CellValue::Date(next_day),
            CellValue::from(symbol.as_str()),
            CellValue::Date(expiry),
            CellValue::quantity(on_expiry.open_interest),
            CellValue::quantity(oi_next_day),
            CellValue::quantity(delivery.delivery_qty),
            CellValue::pct(delivery.rollover_pct),
            CellValue::pct(delivery.delivery_pct),
        ]);
    }
    rows
}
