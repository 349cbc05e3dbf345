//! Aggregation over the loaded records. Pure functions only.

use std::collections::HashMap;

use anyhow::bail;

use profdash_core::ProfessorRecord;

/// Professors per department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: String,
    pub count: u64,
}

/// Descriptive statistics over professor name lengths.
///
/// The same fields a dataframe `describe()` reports: count, mean, sample
/// standard deviation, min, quartiles (linear interpolation), max.
#[derive(Debug, Clone, PartialEq)]
pub struct NameLengthStats {
    pub count: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NameLengthStats {
    /// Label/value rows in display order, for stdout and the PDF.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Everything the rendering stages need.
#[derive(Debug, Clone)]
pub struct Summary {
    pub departments: Vec<DepartmentCount>,
    pub name_lengths: Vec<usize>,
    pub name_stats: NameLengthStats,
}

/// Aggregate the collection. An empty collection is a job-level error:
/// there is nothing to chart and no report worth emitting.
pub fn summarize(records: &[ProfessorRecord]) -> anyhow::Result<Summary> {
    if records.is_empty() {
        bail!("no professor records to analyze");
    }

    let name_lengths = name_lengths(records);
    let name_stats =
        name_length_stats(&name_lengths).expect("non-empty records yield statistics");

    Ok(Summary {
        departments: department_counts(records),
        name_lengths,
        name_stats,
    })
}

/// Count records per department, most populous first. Ties keep first-seen
/// order (stable sort).
pub fn department_counts(records: &[ProfessorRecord]) -> Vec<DepartmentCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        let entry = counts.entry(record.department.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(record.department.as_str());
        }
        *entry += 1;
    }

    let mut result: Vec<DepartmentCount> = order
        .into_iter()
        .map(|department| DepartmentCount {
            department: department.to_string(),
            count: counts[department],
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

pub fn name_lengths(records: &[ProfessorRecord]) -> Vec<usize> {
    records.iter().map(|r| r.name.chars().count()).collect()
}

/// Descriptive statistics over a sample. `None` for an empty sample.
pub fn name_length_stats(lengths: &[usize]) -> Option<NameLengthStats> {
    if lengths.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = lengths.iter().map(|&v| v as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Some(NameLengthStats {
        count: n as f64,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Quantile with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
