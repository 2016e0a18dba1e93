//! Compensated accumulators: Kahan summation and Welford's online
//! mean/variance recurrence. Shared by every reducer and scan that
//! needs a running sum (`group_sum`, `group_mean`, `group_cumsum`) or
//! a running mean/M2 pair (`group_var`).

use std::ops::{Add, Sub};

/// A Kahan-compensated running sum. `spec.md` §3 invariant 5 requires
/// the final sum to differ from the exact sum by no more than
/// `2*eps*sum(|v|)`; carrying `comp` alongside `sum` is what buys that
/// bound independent of `n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct KahanSum<T> {
    pub sum: T,
    pub comp: T,
}

impl<T> KahanSum<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Default,
{
    pub fn new() -> Self {
        Self { sum: T::default(), comp: T::default() }
    }

    /// Fold one more value into the running sum. `spec.md` §4.3:
    /// `y = v - c; t = S + y; c = (t - S) - y; S = t`.
    #[inline]
    pub fn add(&mut self, v: T) {
        let y = v - self.comp;
        let t = self.sum + y;
        self.comp = (t - self.sum) - y;
        self.sum = t;
    }
}

/// Welford's online mean/M2 update, used by `group_var`. `spec.md`
/// §4.6: `n <- n_obs + 1; delta = v - mean; mean += delta/n; m2 +=
/// delta * (v - mean)` (note: the second `v - mean` uses the *updated*
/// mean, which is what gives the method its numerical stability).
#[derive(Clone, Copy, Debug, Default)]
pub struct Welford {
    pub mean: f64,
    pub m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self { mean: 0.0, m2: 0.0 }
    }

    #[inline]
    pub fn update(&mut self, v: f64, n_obs_before: u64) {
        let n = (n_obs_before + 1) as f64;
        let delta = v - self.mean;
        self.mean += delta / n;
        self.m2 += delta * (v - self.mean);
    }

    /// Finalize to a sample variance with the given degrees-of-freedom
    /// correction. Returns `NaN` if `n_obs <= ddof` (insufficient
    /// observations), per `spec.md` §4.6.
    #[inline]
    pub fn variance(&self, n_obs: u64, ddof: u64) -> f64 {
        if n_obs <= ddof {
            f64::NAN
        } else {
            self.m2 / (n_obs - ddof) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kahan_matches_naive_sum_for_small_inputs() {
        let mut k = KahanSum::<f64>::new();
        for v in [1.0, 2.0, 3.0, 4.5] {
            k.add(v);
        }
        assert_eq!(k.sum, 10.5);
    }

    #[test]
    fn kahan_beats_naive_sum_on_adversarial_input() {
        // classic Kahan demonstration: a big value followed by many tiny ones
        let mut naive = 0.0f64;
        let mut k = KahanSum::<f64>::new();
        naive += 1.0e16;
        k.add(1.0e16);
        for _ in 0..1000 {
            naive += 1.0;
            k.add(1.0);
        }
        naive -= 1.0e16;
        let compensated = k.sum + k.comp - 1.0e16;
        assert!((compensated - 1000.0).abs() < (naive - 1000.0).abs());
    }

    #[test]
    fn welford_matches_two_pass_variance() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut w = Welford::new();
        for (i, &x) in xs.iter().enumerate() {
            w.update(x, i as u64);
        }
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let expected_var =
            xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
        assert_abs_diff_eq!(w.variance(xs.len() as u64, 1), expected_var, epsilon = 1e-9);
    }
}
