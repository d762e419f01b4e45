//! Synthetic noisy sine signal for the smoothing demo plot.

use std::f64::consts::PI;

use rand::Rng;

/// Frequency of the underlying sine, in Hz.
pub const SIGNAL_FREQUENCY_HZ: f64 = 0.5;
/// The signal spans `t` in `[0, SIGNAL_DURATION_S]`.
pub const SIGNAL_DURATION_S: f64 = 10.0;

/// A generated signal: sample times and noisy amplitudes of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
///
/// `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Draw one sample from `Normal(0, std_dev)` using the Box-Muller transform.
pub fn normal_sample<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    // `random` is in [0, 1); shift u1 into (0, 1] so ln never sees zero.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Generate `n` samples of `sin(2π·0.5·t) + Normal(0, noise)` over `t ∈ [0, 10]`.
pub fn generate_time_series<R: Rng + ?Sized>(n: usize, noise: f64, rng: &mut R) -> Signal {
    let t = linspace(0.0, SIGNAL_DURATION_S, n);
    let y = t
        .iter()
        .map(|&ti| (2.0 * PI * SIGNAL_FREQUENCY_HZ * ti).sin() + normal_sample(rng, noise))
        .collect();
    Signal { t, y }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
