//! Numeric helpers shared by the analyses
//!
//! All arithmetic is f64. Callers guarantee non-empty input where noted.

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n); `None` for an empty slice
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Ordinary least-squares line through (1, y0), (2, y1), ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit scores against their 1-based sequence index; needs at least 2 points
    pub fn fit_sequence(ys: &[f64]) -> Option<Self> {
        if ys.len() < 2 {
            return None;
        }

        let n = ys.len() as f64;
        let x_mean = (n + 1.0) / 2.0;
        let y_mean = mean(ys)?;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, y) in ys.iter().enumerate() {
            let dx = (i + 1) as f64 - x_mean;
            sxy += dx * (y - y_mean);
            sxx += dx * dx;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Weighted mean; `None` when lengths differ or weights sum to zero
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    if values.len() != weights.len() {
        return None;
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return None;
    }
    let weighted: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Some(weighted / total_weight)
}

/// Clamp to the 0-100 score scale
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Round to 2 decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_close;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_close(mean(&[50.0, 60.0, 70.0]).unwrap(), 60.0);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), None);
        assert_close(population_std_dev(&[5.0, 5.0, 5.0]).unwrap(), 0.0);
        // mean 70.25, variance 8.75 / 4
        let sd = population_std_dev(&[70.0, 72.0, 68.0, 71.0]).unwrap();
        assert_close(sd, (8.75f64 / 4.0).sqrt());
        assert_eq!(round2(sd), 1.48);
    }

    #[test]
    fn test_fit_exact_line() {
        let fit = LinearFit::fit_sequence(&[50.0, 60.0, 70.0]).unwrap();
        assert_close(fit.slope, 10.0);
        assert_close(fit.intercept, 40.0);
        assert_close(fit.predict(4.0), 80.0);
    }

    #[test]
    fn test_fit_noisy_points() {
        // y = 1, 3, 2, 4 -> slope 0.8, intercept 0.5
        let fit = LinearFit::fit_sequence(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_close(fit.slope, 0.8);
        assert_close(fit.intercept, 0.5);
    }

    #[test]
    fn test_fit_needs_two_points() {
        assert!(LinearFit::fit_sequence(&[]).is_none());
        assert!(LinearFit::fit_sequence(&[42.0]).is_none());
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.5, 1.5, 0).is_empty());
        assert_eq!(linspace(0.5, 1.5, 1), vec![0.5]);
        assert_eq!(linspace(0.5, 1.5, 2), vec![0.5, 1.5]);
        let w = linspace(0.5, 1.5, 5);
        assert_eq!(w.len(), 5);
        assert_close(w[1], 0.75);
        assert_close(w[4], 1.5);
    }

    #[test]
    fn test_weighted_mean() {
        assert_close(weighted_mean(&[50.0, 70.0], &[0.5, 1.5]).unwrap(), 65.0);
        assert_eq!(weighted_mean(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(weighted_mean(&[1.0], &[0.0]), None);
    }

    #[test]
    fn test_clamp_and_round() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(104.2), 100.0);
        assert_eq!(clamp_score(55.5), 55.5);
        assert_eq!(round2(70.256), 70.26);
        assert_eq!(round2(1.4791), 1.48);
    }
}
