//! Analysis of the stored readings and its terminal formatting.

use crate::domain::Observation;
use crate::math::{CorrelationBand, Summary, summarize, temperature_humidity_correlation, top_humidity};

pub mod format;

pub use format::*;

/// Everything the analysis report prints (plots aside).
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: Summary,
    pub top_humidity: Vec<Observation>,
    pub correlation: Option<f64>,
    pub band: CorrelationBand,
}

/// Compute the summary statistics, the top-`top_n` humid days and the
/// temperature/humidity correlation.
pub fn analyze(observations: &[Observation], top_n: usize) -> Analysis {
    let correlation = temperature_humidity_correlation(observations);
    Analysis {
        summary: summarize(observations),
        top_humidity: top_humidity(observations, top_n),
        correlation,
        band: CorrelationBand::classify(correlation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn hot_days_are_dry_days() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let rows = vec![
            Observation::new(d(1), Some(24.0), Some(90.0)),
            Observation::new(d(2), Some(26.0), Some(84.0)),
            Observation::new(d(3), Some(28.0), Some(79.0)),
            Observation::new(d(4), Some(30.0), Some(71.0)),
        ];

        let analysis = analyze(&rows, 2);
        assert_eq!(analysis.summary.temperature.count, 4);
        assert_eq!(analysis.band, CorrelationBand::MarkedNegative);
        let top: Vec<_> = analysis.top_humidity.iter().map(|o| o.date).collect();
        assert_eq!(top, vec![d(1), d(2)]);
    }
}
