//! Descriptive Statistics
//!
//! Pure helpers shared by the stress analysis and session analytics
//! services: mean, standard deviation, and trend labeling.

use serde::Serialize;

/// Direction of a metric over time.
///
/// For stress-like metrics, a falling value is an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

/// Arithmetic mean. Returns None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation. Returns None for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Label the trend of a stress-like series (lower is better).
///
/// Splits the series in half and compares the recent-half mean against the
/// earlier-half mean. The difference must exceed a quarter of the overall
/// standard deviation (floored at 0.25) to count as a real change; smaller
/// movements are labeled Stable. Series shorter than 4 points are Stable.
pub fn label_trend(values: &[f64]) -> Trend {
    if values.len() < 4 {
        return Trend::Stable;
    }

    let mid = values.len() / 2;
    let earlier = mean(&values[..mid]).unwrap_or(0.0);
    let recent = mean(&values[mid..]).unwrap_or(0.0);
    let threshold = (std_dev(values).unwrap_or(0.0) * 0.25).max(0.25);

    let delta = recent - earlier;
    if delta <= -threshold {
        Trend::Improving
    } else if delta >= threshold {
        Trend::Worsening
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
    }

    #[test]
    fn test_std_dev_constant_series_is_zero() {
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_known_value() {
        // Population stddev of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&values).unwrap();
        assert!((sd - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_is_stable() {
        assert_eq!(label_trend(&[9.0, 1.0, 9.0]), Trend::Stable);
    }

    #[test]
    fn test_falling_stress_is_improving() {
        let values = [8.0, 8.0, 7.0, 7.0, 4.0, 3.0, 3.0, 2.0];
        assert_eq!(label_trend(&values), Trend::Improving);
    }

    #[test]
    fn test_rising_stress_is_worsening() {
        let values = [2.0, 3.0, 3.0, 4.0, 7.0, 7.0, 8.0, 8.0];
        assert_eq!(label_trend(&values), Trend::Worsening);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let values = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        assert_eq!(label_trend(&values), Trend::Stable);
    }
}
