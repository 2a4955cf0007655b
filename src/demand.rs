//! Medicine demand over time, read from inventory snapshots.
//!
//! A spike compares the two most recent readings of a medicine. A medicine seen only
//! once has no spike, and a previous quantity of zero has no defined percentage; both
//! are reported as their own states instead of as a number.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InventoryReading {
    pub medicine: String,
    pub quantity: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandPoint {
    pub date: NaiveDate,
    pub demand: u32,
    pub medicine: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MedicineFilter {
    All,
    Only(String),
}

impl MedicineFilter {
    fn accepts(&self, medicine: &str) -> bool {
        match self {
            MedicineFilter::All => true,
            MedicineFilter::Only(name) => name == medicine,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpikeStatus {
    Change { percentage: f64 },
    NoPreviousReading,
    ZeroBaseline,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MedicineSpike {
    pub medicine: String,
    pub current: u32,
    pub previous: Option<u32>,
    pub status: SpikeStatus,
}

impl MedicineSpike {
    pub fn percentage(&self) -> Option<f64> {
        match self.status {
            SpikeStatus::Change { percentage } => Some(percentage),
            _ => None,
        }
    }
}

fn oldest_first(readings: &[InventoryReading]) -> Vec<&InventoryReading> {
    let mut sorted: Vec<&InventoryReading> = readings.iter().collect();
    sorted.sort_by_key(|r| r.last_updated);
    sorted
}

/// Chart series, oldest first.
pub fn demand_trend(readings: &[InventoryReading], filter: &MedicineFilter) -> Vec<DemandPoint> {
    oldest_first(readings)
        .into_iter()
        .filter(|r| filter.accepts(&r.medicine))
        .map(|r| DemandPoint {
            date: r.last_updated.date_naive(),
            demand: r.quantity,
            medicine: r.medicine.clone(),
        })
        .collect()
}

/// Distinct medicine names, in order of first appearance over time.
pub fn available_medicines(readings: &[InventoryReading]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for r in oldest_first(readings) {
        if !names.iter().any(|n| n == &r.medicine) {
            names.push(r.medicine.clone());
        }
    }
    names
}

fn spike(medicine: &str, newest_first: &[&InventoryReading]) -> MedicineSpike {
    let current = newest_first[0].quantity;
    let previous = newest_first.get(1).map(|r| r.quantity);
    let status = match previous {
        None => SpikeStatus::NoPreviousReading,
        Some(0) => SpikeStatus::ZeroBaseline,
        Some(previous) => SpikeStatus::Change {
            percentage: (current as f64 - previous as f64) / previous as f64 * 100.0,
        },
    };
    MedicineSpike {
        medicine: medicine.to_string(),
        current,
        previous,
        status,
    }
}

/// Largest increase first. Medicines without a percentage go last, most recently seen first.
pub fn medicine_spikes(readings: &[InventoryReading]) -> Vec<MedicineSpike> {
    let mut newest_first: Vec<&InventoryReading> = readings.iter().collect();
    newest_first.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&InventoryReading>)> = Vec::new();
    for r in newest_first {
        let slot = *index.entry(r.medicine.as_str()).or_insert_with(|| {
            groups.push((r.medicine.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(r);
    }

    let mut spikes: Vec<MedicineSpike> = groups
        .iter()
        .map(|(medicine, group)| spike(medicine, group))
        .collect();
    spikes.sort_by(|a, b| match (a.percentage(), b.percentage()) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    log::debug!("Computed spikes for {} medicines", spikes.len());
    spikes
}
