//! Descriptive statistics over optional series.
//!
//! Conventions follow the usual dataframe `describe()`:
//! missing values are excluded, `std` is the sample standard deviation
//! (n − 1), and quartiles use linear interpolation between order statistics.

use nalgebra::DVector;

use crate::domain::Observation;

/// Count/mean/std/min/quartiles/max for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    /// `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    fn empty() -> Self {
        Self {
            count: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        }
    }
}

/// `describe()` for the two measurement columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub temperature: Describe,
    pub humidity: Describe,
}

pub fn summarize(observations: &[Observation]) -> Summary {
    Summary {
        temperature: describe(observations.iter().map(|o| o.temperature)),
        humidity: describe(observations.iter().map(|o| o.humidity)),
    }
}

pub fn describe(values: impl IntoIterator<Item = Option<f64>>) -> Describe {
    let mut present: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    let n = present.len();
    if n == 0 {
        return Describe::empty();
    }

    let v = DVector::from_column_slice(&present);
    let mean = v.mean();
    let std = (n > 1).then(|| {
        let centered = v.add_scalar(-mean);
        (centered.norm_squared() / (n as f64 - 1.0)).sqrt()
    });

    present.sort_by(f64::total_cmp);

    Describe {
        count: n,
        mean: Some(mean),
        std,
        min: Some(present[0]),
        q25: Some(quantile_sorted(&present, 0.25)),
        median: Some(quantile_sorted(&present, 0.5)),
        q75: Some(quantile_sorted(&present, 0.75)),
        max: Some(present[n - 1]),
    }
}

/// Linear-interpolated quantile of a non-empty ascending slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// The `n` rows with the largest humidity. Missing humidity is skipped and
/// ties keep read order.
pub fn top_humidity(observations: &[Observation], n: usize) -> Vec<Observation> {
    let mut ranked: Vec<(f64, &Observation)> = observations
        .iter()
        .filter_map(|o| o.humidity.filter(|h| h.is_finite()).map(|h| (h, o)))
        .collect();
    // `sort_by` is stable, which is what keeps ties in read order.
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().take(n).map(|(_, o)| o.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_matches_dataframe_conventions() {
        let d = describe([Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(d.count, 4);
        assert!(close(d.mean, 2.5));
        // sqrt(5/3)
        assert!(close(d.std, 1.2909944487358056));
        assert!(close(d.min, 1.0));
        assert!(close(d.q25, 1.75));
        assert!(close(d.median, 2.5));
        assert!(close(d.q75, 3.25));
        assert!(close(d.max, 4.0));
    }

    #[test]
    fn describe_edge_sizes() {
        let empty = describe([None, None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);

        let single = describe([Some(7.5)]);
        assert_eq!(single.count, 1);
        assert_eq!(single.std, None);
        assert_eq!(single.median, Some(7.5));
    }

    #[test]
    fn top_humidity_skips_missing_and_keeps_tie_order() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let rows = vec![
            Observation::new(d(1), Some(25.0), Some(80.0)),
            Observation::new(d(2), Some(25.0), None),
            Observation::new(d(3), Some(25.0), Some(90.0)),
            Observation::new(d(4), Some(25.0), Some(80.0)),
            Observation::new(d(5), Some(25.0), Some(70.0)),
        ];

        let top: Vec<_> = top_humidity(&rows, 3).iter().map(|o| o.date).collect();
        assert_eq!(top, vec![d(3), d(1), d(4)]);

        assert_eq!(top_humidity(&rows, 10).len(), 4);
    }
}
