use num_complex::Complex64;

pub struct StatsHelper;

impl StatsHelper {
    pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }

    pub fn complex_mean(samples: &[Complex64]) -> Complex64 {
        if samples.is_empty() {
            return Complex64::new(0.0, 0.0);
        }
        samples.iter().sum::<Complex64>() / samples.len() as f64
    }

    /// Mean power of the deviation from the complex mean, `E|x - mean|^2`.
    pub fn complex_variance(samples: &[Complex64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::complex_mean(samples);
        samples.iter().map(|&s| (s - mean).norm_sqr()).sum::<f64>() / samples.len() as f64
    }

    pub fn max_abs(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_strided_values() {
        let interleaved = [1.0, 10.0, 3.0, 20.0];
        assert_eq!(StatsHelper::mean(interleaved.iter().step_by(2).copied()), 2.0);
        assert_eq!(StatsHelper::mean(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn complex_variance_ignores_constant_offset() {
        let samples = [
            Complex64::new(2.0, 1.0),
            Complex64::new(4.0, 1.0),
            Complex64::new(2.0, 3.0),
            Complex64::new(4.0, 3.0),
        ];
        assert!((StatsHelper::complex_variance(&samples) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn max_abs_picks_largest_magnitude() {
        assert_eq!(StatsHelper::max_abs(&[0.5, -3.0, 2.0]), 3.0);
        assert_eq!(StatsHelper::max_abs(&[]), 0.0);
    }
}
