use ndarray::{Array2, Axis};
use num_complex::Complex64;

use crate::acquisition::Acquisition;
use crate::prelude::{SynthError, SynthResult};

/// Coherent channel summation.
///
/// Channels are assumed to be phase aligned already (on-axis events). No
/// delay or phase correction is applied, so misaligned channels simply
/// produce a weaker composite.
pub struct SignalCombiner;

impl SignalCombiner {
    pub fn combine(samples: &Array2<Complex64>) -> SynthResult<Vec<Complex64>> {
        if samples.nrows() == 0 {
            return Err(SynthError::Layout("no channels to combine".into()));
        }
        Ok(samples.sum_axis(Axis(0)).to_vec())
    }

    pub fn combine_acquisition(acquisition: &Acquisition) -> SynthResult<Vec<Complex64>> {
        Self::combine(&acquisition.samples)
    }
}
