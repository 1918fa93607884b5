use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::dataset::{Observation, Venue};

pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SampleSummary {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WelchTest {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

impl WelchTest {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub mean: f64,
    pub half_width: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeAwayInference {
    pub home: SampleSummary,
    pub away: SampleSummary,
    pub test: WelchTest,
    pub significant: bool,
    pub home_interval: ConfidenceInterval,
    pub away_interval: ConfidenceInterval,
}

pub fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return f64::NAN;
    }
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Unbiased sample variance; NaN below two observations.
pub fn sample_variance(sample: &[f64]) -> f64 {
    if sample.len() < 2 {
        return f64::NAN;
    }
    let m = mean(sample);
    let ss = sample.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    ss / (sample.len() - 1) as f64
}

pub fn summarize(sample: &[f64]) -> SampleSummary {
    SampleSummary {
        n: sample.len(),
        mean: mean(sample),
        std_dev: sample_variance(sample).sqrt(),
    }
}

pub fn standard_error(sample: &[f64]) -> f64 {
    (sample_variance(sample) / sample.len() as f64).sqrt()
}

/// Two-sided Welch test. Inputs with fewer than two values per group, or
/// no spread at all, yield NaN fields instead of an error.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> WelchTest {
    let undefined = WelchTest {
        t_statistic: f64::NAN,
        degrees_of_freedom: f64::NAN,
        p_value: f64::NAN,
    };
    if a.len() < 2 || b.len() < 2 {
        return undefined;
    }

    let va = sample_variance(a) / a.len() as f64;
    let vb = sample_variance(b) / b.len() as f64;
    let se2 = va + vb;
    if se2 <= 0.0 {
        return undefined;
    }

    let t = (mean(a) - mean(b)) / se2.sqrt();
    let df = se2.powi(2)
        / (va.powi(2) / (a.len() - 1) as f64 + vb.powi(2) / (b.len() - 1) as f64);

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    };

    WelchTest {
        t_statistic: t,
        degrees_of_freedom: df,
        p_value,
    }
}

/// Two-sided t critical value for `level` with `df` degrees of freedom.
pub fn t_critical(level: f64, df: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(anyhow!("confidence level must be in (0, 1), got {level}"));
    }
    if !(df > 0.0) {
        return Ok(f64::NAN);
    }
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|err| anyhow!("student t with {df} degrees of freedom: {err}"))?;
    Ok(dist.inverse_cdf((1.0 + level) / 2.0))
}

pub fn confidence_interval(sample: &[f64], level: f64) -> Result<ConfidenceInterval> {
    let m = mean(sample);
    let df = sample.len().saturating_sub(1) as f64;
    let half_width = standard_error(sample) * t_critical(level, df)?;
    Ok(ConfidenceInterval {
        level,
        mean: m,
        half_width,
        lower: m - half_width,
        upper: m + half_width,
    })
}

pub fn ratings_at(rows: &[Observation], venue: Venue) -> Vec<f64> {
    rows.iter()
        .filter(|row| row.venue == Some(venue))
        .filter_map(Observation::rating)
        .collect()
}

pub fn compare_samples(home: &[f64], away: &[f64], level: f64) -> Result<HomeAwayInference> {
    let test = welch_t_test(home, away);
    Ok(HomeAwayInference {
        home: summarize(home),
        away: summarize(away),
        significant: test.is_significant(SIGNIFICANCE_LEVEL),
        test,
        home_interval: confidence_interval(home, level)?,
        away_interval: confidence_interval(away, level)?,
    })
}

/// Home vs. away player ratings of the target team's rows.
pub fn home_away_ratings(rows: &[Observation], level: f64) -> Result<HomeAwayInference> {
    let home = ratings_at(rows, Venue::Home);
    let away = ratings_at(rows, Venue::Away);
    compare_samples(&home, &away, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_uses_n_minus_one() {
        let v = sample_variance(&[7.0, 6.5, 8.0]);
        assert!((v - 0.583_333).abs() < 1e-5);
        assert!(sample_variance(&[1.0]).is_nan());
    }

    #[test]
    fn critical_value_matches_table() {
        // t(0.975, 10) = 2.228
        let t = t_critical(0.95, 10.0).unwrap();
        assert!((t - 2.228).abs() < 1e-3);
    }

    #[test]
    fn identical_constant_samples_are_undefined() {
        let test = welch_t_test(&[5.0, 5.0], &[5.0, 5.0]);
        assert!(test.t_statistic.is_nan());
        assert!(test.p_value.is_nan());
        assert!(!test.is_significant(SIGNIFICANCE_LEVEL));
    }

    #[test]
    fn single_value_interval_is_nan() {
        let ci = confidence_interval(&[7.0], 0.95).unwrap();
        assert_eq!(ci.mean, 7.0);
        assert!(ci.half_width.is_nan());
    }
}
