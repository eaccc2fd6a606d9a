/*
Gain, Decibels, and the Master Bus
==================================

Channel faders live in decibels because hearing is logarithmic - we perceive
loudness ratios, not differences:

    linear = 10^(dB / 20)

Reference points worth memorizing:
    0 dB   → ×1.0    (unity)
   -6 dB   → ×0.501  (half amplitude)
  -20 dB   → ×0.1
  -60 dB   → ×0.001  (our fader floor; effectively silence)

Summing Tracks
--------------
Tracks are mixed by plain addition. Four drums each peaking near 1.0 can sum
well past the [-1.0, +1.0] range, so the master bus ends in a hard limiter:
anything beyond the ceiling is clamped. A clamp distorts, but only on the
samples that would otherwise wrap.
*/

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear gain factor to decibels. Zero and negative gains map to
/// the fader floor rather than -inf.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return -60.0;
    }
    20.0 * linear.log10()
}

/// Scale a buffer in place.
#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

/// Add `source` into `dest` sample by sample (track summing).
#[inline]
pub fn sum_in_place(dest: &mut [f32], source: &[f32]) {
    debug_assert_eq!(dest.len(), source.len());

    for (d, &s) in dest.iter_mut().zip(source.iter()) {
        *d += s;
    }
}

/// Clamp every sample to ±ceiling (linear). The master bus runs this with
/// a -1 dBFS ceiling after summing.
#[inline]
pub fn limit_hard(buffer: &mut [f32], ceiling: f32) {
    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-ceiling, ceiling);
    }
}

/// Peak absolute level of a buffer, for metering.
#[inline]
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_reference_points() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0) - 0.501).abs() < 0.001);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-4);
        assert!(db_to_linear(-60.0) < 0.0011);
    }

    #[test]
    fn db_round_trip() {
        for db in [-40.0, -12.0, -6.0, 0.0, 3.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "round trip failed for {db} dB");
        }
    }

    #[test]
    fn silence_maps_to_floor() {
        assert_eq!(linear_to_db(0.0), -60.0);
        assert_eq!(linear_to_db(-1.0), -60.0);
    }

    #[test]
    fn summing_adds() {
        let mut dest = [0.5, -0.5, 0.0];
        let source = [0.25, 0.25, 1.0];
        sum_in_place(&mut dest, &source);
        assert_eq!(dest, [0.75, -0.25, 1.0]);
    }

    #[test]
    fn limiter_clamps_overs_only() {
        let mut buffer = [0.5, 1.4, -2.0, -0.3];
        limit_hard(&mut buffer, 0.891);
        assert_eq!(buffer[0], 0.5);
        assert_eq!(buffer[1], 0.891);
        assert_eq!(buffer[2], -0.891);
        assert_eq!(buffer[3], -0.3);
    }

    #[test]
    fn peak_finds_largest_magnitude() {
        assert_eq!(peak(&[0.1, -0.7, 0.3]), 0.7);
        assert_eq!(peak(&[]), 0.0);
    }
}
