use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::fft::FftHelper;
use crate::prelude::{SignalDomain, SynthError, SynthResult};

/// Swept physical parameter used for sorting and class assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassParameter {
    #[default]
    PitchAngle,
    Energy,
}

impl fmt::Display for ClassParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassParameter::PitchAngle => f.write_str("pitch_angle"),
            ClassParameter::Energy => f.write_str("energy"),
        }
    }
}

/// One simulated or measured physical event and its composite signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Degrees.
    pub pitch_angle: f64,
    /// eV.
    pub energy: f64,
    pub signal: Vec<Complex64>,
}

impl Event {
    pub fn new(pitch_angle: f64, energy: f64, signal: Vec<Complex64>) -> Self {
        Self {
            pitch_angle,
            energy,
            signal,
        }
    }

    pub fn parameter(&self, parameter: ClassParameter) -> f64 {
        match parameter {
            ClassParameter::PitchAngle => self.pitch_angle,
            ClassParameter::Energy => self.energy,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.signal.len()
    }
}

/// Events sharing one signal length.
#[derive(Debug, Clone, Default)]
pub struct EventSet {
    events: Vec<Event>,
}

impl EventSet {
    pub fn new(events: Vec<Event>) -> SynthResult<Self> {
        if let Some(first) = events.first() {
            let expected = first.sample_count();
            if expected == 0 {
                return Err(SynthError::Layout("event signals are empty".into()));
            }
            if let Some(bad) = events.iter().find(|e| e.sample_count() != expected) {
                return Err(SynthError::Layout(format!(
                    "event at pitch angle {} has {} samples, expected {}",
                    bad.pitch_angle,
                    bad.sample_count(),
                    expected
                )));
            }
        }
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn sample_count(&self) -> Option<usize> {
        self.events.first().map(Event::sample_count)
    }

    pub fn parameters(&self, parameter: ClassParameter) -> Vec<f64> {
        self.events.iter().map(|e| e.parameter(parameter)).collect()
    }

    /// Events ordered by ascending `parameter`; ties keep insertion order.
    pub fn sorted_by(&self, parameter: ClassParameter) -> Vec<&Event> {
        let mut sorted: Vec<&Event> = self.events.iter().collect();
        sorted.sort_by(|a, b| a.parameter(parameter).total_cmp(&b.parameter(parameter)));
        sorted
    }

    /// Re-expresses every signal in `domain`. Time-domain sets pass through.
    pub fn into_domain(self, domain: SignalDomain) -> Self {
        match (domain, self.sample_count()) {
            (SignalDomain::Freq, Some(size)) => {
                let fft = FftHelper::new(size);
                let events = self
                    .events
                    .into_iter()
                    .map(|event| Event {
                        signal: fft.forward(&event.signal),
                        ..event
                    })
                    .collect();
                Self { events }
            }
            _ => self,
        }
    }
}

/// Splits sorted events by position parity: even positions train, odd test.
pub fn parity_split<'a>(sorted: &[&'a Event]) -> (Vec<&'a Event>, Vec<&'a Event>) {
    let train = sorted.iter().step_by(2).copied().collect();
    let test = sorted.iter().skip(1).step_by(2).copied().collect();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(pitch_angle: f64, energy: f64) -> Event {
        Event::new(pitch_angle, energy, vec![Complex64::new(pitch_angle, 0.0); 4])
    }

    #[test]
    fn event_set_rejects_mixed_lengths() {
        let short = Event::new(1.0, 1.0, vec![Complex64::new(0.0, 0.0); 2]);
        assert!(EventSet::new(vec![event(0.0, 1.0), short]).is_err());
        assert!(EventSet::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn sorting_and_parity_split() {
        let set = EventSet::new(vec![
            event(30.0, 1.0),
            event(0.0, 4.0),
            event(20.0, 2.0),
            event(10.0, 3.0),
        ])
        .unwrap();
        let sorted = set.sorted_by(ClassParameter::PitchAngle);
        let (train, test) = parity_split(&sorted);
        let pa = |events: &[&Event]| events.iter().map(|e| e.pitch_angle).collect::<Vec<_>>();
        assert_eq!(pa(&train), vec![0.0, 20.0]);
        assert_eq!(pa(&test), vec![10.0, 30.0]);

        let by_energy = set.sorted_by(ClassParameter::Energy);
        assert_eq!(by_energy[0].pitch_angle, 30.0);
    }

    #[test]
    fn frequency_domain_transform_keeps_length() {
        let set = EventSet::new(vec![event(1.0, 1.0)]).unwrap();
        let freq = set.into_domain(SignalDomain::Freq);
        let signal = &freq.iter().next().unwrap().signal;
        assert_eq!(signal.len(), 4);
        // constant input concentrates in the DC bin
        assert!((signal[0] - Complex64::new(4.0, 0.0)).norm() < 1e-12);
        assert!(signal[1].norm() < 1e-12);
    }
}
