//! Pearson correlation between temperature and humidity.

use nalgebra::DVector;

use crate::domain::Observation;

/// Qualitative reading of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationBand {
    /// `corr <= -0.5`
    MarkedNegative,
    /// `corr >= 0.5`
    MarkedPositive,
    /// Anything in between, or undefined.
    Weak,
}

impl CorrelationBand {
    pub fn classify(corr: Option<f64>) -> Self {
        match corr {
            Some(c) if c <= -0.5 => CorrelationBand::MarkedNegative,
            Some(c) if c >= 0.5 => CorrelationBand::MarkedPositive,
            _ => CorrelationBand::Weak,
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            CorrelationBand::MarkedNegative => "marked negative correlation (higher T, lower RH).",
            CorrelationBand::MarkedPositive => "marked positive correlation (they rise together).",
            CorrelationBand::Weak => "weak or unclear relationship.",
        }
    }
}

/// Temperature vs humidity over the rows where both are present.
pub fn temperature_humidity_correlation(observations: &[Observation]) -> Option<f64> {
    pearson(observations.iter().map(|o| (o.temperature, o.humidity)))
}

/// Pearson's r over complete pairs.
///
/// Returns `None` with fewer than two complete pairs or when either side has
/// zero variance.
pub fn pearson(pairs: impl IntoIterator<Item = (Option<f64>, Option<f64>)>) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .into_iter()
        .filter_map(|(x, y)| Some((x?, y?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unzip();
    if xs.len() < 2 {
        return None;
    }

    let x = DVector::from_vec(xs);
    let y = DVector::from_vec(ys);
    let dx = x.add_scalar(-x.mean());
    let dy = y.add_scalar(-y.mean());

    let denom = dx.norm() * dy.norm();
    if !(denom.is_finite() && denom > 0.0) {
        return None;
    }
    Some((dx.dot(&dy) / denom).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_anti_correlated() {
        let r = pearson([(Some(1.0), Some(9.0)), (Some(2.0), Some(7.0)), (Some(3.0), Some(5.0))]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(CorrelationBand::classify(Some(r)), CorrelationBand::MarkedNegative);
    }

    #[test]
    fn incomplete_pairs_are_ignored() {
        let r = pearson([
            (Some(1.0), Some(2.0)),
            (None, Some(100.0)),
            (Some(2.0), Some(4.0)),
            (Some(50.0), None),
            (Some(3.0), Some(6.5)),
        ])
        .unwrap();
        assert!(r > 0.99);
        assert_eq!(CorrelationBand::classify(Some(r)), CorrelationBand::MarkedPositive);
    }

    #[test]
    fn undefined_correlation_is_weak() {
        assert_eq!(pearson([(Some(20.0), Some(1.0)), (Some(20.0), Some(2.0))]), None);
        assert_eq!(pearson([(Some(1.0), Some(1.0))]), None);
        assert_eq!(CorrelationBand::classify(None), CorrelationBand::Weak);
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(CorrelationBand::classify(Some(-0.5)), CorrelationBand::MarkedNegative);
        assert_eq!(CorrelationBand::classify(Some(0.5)), CorrelationBand::MarkedPositive);
        assert_eq!(CorrelationBand::classify(Some(0.49)), CorrelationBand::Weak);
        assert_eq!(CorrelationBand::classify(Some(-0.3)), CorrelationBand::Weak);
    }
}
