//! Thermal noise injection.
//!
//! Noise power follows `k_B * B * R * T / N`. Each complex sample draws its
//! real and imaginary parts independently from `N(0, power / 2)`, so the
//! expected `|n|^2` equals the modelled power.

use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::prelude::{SynthError, SynthResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseModel {
    /// Boltzmann constant, J/K.
    pub boltzmann: f64,
    pub bandwidth_hz: f64,
    pub resistance_ohm: f64,
    /// Averaging divisor of the acquisition chain.
    pub normalization: f64,
    pub temperature_k: f64,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            boltzmann: 1.38e-23,
            bandwidth_hz: 200e6,
            resistance_ohm: 50.0,
            normalization: 8192.0,
            temperature_k: 10.0,
        }
    }
}

impl NoiseModel {
    pub fn with_temperature(self, temperature_k: f64) -> Self {
        Self {
            temperature_k,
            ..self
        }
    }

    /// Complex noise power per sample.
    pub fn variance(&self) -> f64 {
        self.boltzmann * self.bandwidth_hz * self.resistance_ohm * self.temperature_k
            / self.normalization
    }

    pub fn validate(&self) -> SynthResult<()> {
        if !self.temperature_k.is_finite() || self.temperature_k < 0.0 {
            return Err(SynthError::InvalidConfig(format!(
                "noise temperature must be a finite, non-negative kelvin value, got {}",
                self.temperature_k
            )));
        }
        let constants = [
            ("boltzmann", self.boltzmann),
            ("bandwidth_hz", self.bandwidth_hz),
            ("resistance_ohm", self.resistance_ohm),
            ("normalization", self.normalization),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value <= 0.0 {
                return Err(SynthError::InvalidConfig(format!(
                    "noise model `{}` must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Seeded source of circularly-symmetric complex Gaussian noise.
pub struct ThermalNoise {
    component: Normal<f64>,
    variance: f64,
    rng: ChaCha8Rng,
}

impl ThermalNoise {
    pub fn new(model: &NoiseModel, rng: ChaCha8Rng) -> SynthResult<Self> {
        model.validate()?;
        let variance = model.variance();
        let component = Normal::new(0.0, (variance / 2.0).sqrt())
            .map_err(|err| SynthError::InvalidConfig(format!("noise distribution: {}", err)))?;
        Ok(Self {
            component,
            variance,
            rng,
        })
    }

    pub fn seeded(model: &NoiseModel, seed: u64) -> SynthResult<Self> {
        Self::new(model, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn sample(&mut self) -> Complex64 {
        let re = self.component.sample(&mut self.rng);
        let im = self.component.sample(&mut self.rng);
        Complex64::new(re, im)
    }

    /// Signal plus one independent noise draw per sample.
    pub fn realize(&mut self, signal: &[Complex64]) -> Vec<Complex64> {
        signal.iter().map(|&s| s + self.sample()).collect()
    }

    /// Real-valued signals are lifted onto the real axis before noise is added.
    pub fn realize_real(&mut self, signal: &[f64]) -> Vec<Complex64> {
        signal
            .iter()
            .map(|&s| Complex64::new(s, 0.0) + self.sample())
            .collect()
    }

    /// Pure noise of the given length.
    pub fn noise_only(&mut self, len: usize) -> Vec<Complex64> {
        (0..len).map(|_| self.sample()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::stats::StatsHelper;

    #[test]
    fn default_model_variance_matches_constants() {
        let model = NoiseModel::default();
        let expected = 1.38e-23 * 200e6 * 50.0 * 10.0 / 8192.0;
        assert!((model.variance() - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn empirical_power_converges_to_model_variance() {
        let model = NoiseModel::default().with_temperature(4.0);
        let mut noise = ThermalNoise::seeded(&model, 7).unwrap();

        let draws = noise.noise_only(200_000);
        let measured = StatsHelper::complex_variance(&draws);
        let expected = model.variance();
        assert!(
            (measured - expected).abs() / expected < 0.02,
            "measured {} expected {}",
            measured,
            expected
        );

        let re_power = draws.iter().map(|d| d.re * d.re).sum::<f64>() / draws.len() as f64;
        assert!((re_power - expected / 2.0).abs() / (expected / 2.0) < 0.03);
    }

    #[test]
    fn same_seed_reproduces_draws() {
        let model = NoiseModel::default();
        let signal = vec![Complex64::new(1e-9, -1e-9); 64];
        let a = ThermalNoise::seeded(&model, 42).unwrap().realize(&signal);
        let b = ThermalNoise::seeded(&model, 42).unwrap().realize(&signal);
        let c = ThermalNoise::seeded(&model, 43).unwrap().realize(&signal);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_temperature_leaves_signal_untouched() {
        let model = NoiseModel::default().with_temperature(0.0);
        let mut noise = ThermalNoise::seeded(&model, 1).unwrap();
        assert_eq!(
            noise.realize_real(&[1.0, -2.0]),
            vec![Complex64::new(1.0, 0.0), Complex64::new(-2.0, 0.0)]
        );
    }

    #[test]
    fn invalid_model_is_rejected() {
        let negative = NoiseModel::default().with_temperature(-1.0);
        assert!(ThermalNoise::seeded(&negative, 0).is_err());
        let broken = NoiseModel {
            normalization: 0.0,
            ..NoiseModel::default()
        };
        assert!(broken.validate().is_err());
    }
}
