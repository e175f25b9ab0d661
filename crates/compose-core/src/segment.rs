//! Background footage segment selection.
//!
//! The narration track's duration is authoritative: the footage segment is
//! always trimmed to match it, never the reverse.

use rand::Rng;
use shortsmith_common::error::{SmithError, SmithResult};

/// Cap on the start offset as a fraction of total footage, so segments
/// are drawn from the earlier part of long footage files.
const START_CAP_FRACTION: f64 = 0.8;

/// Choose the start offset for a footage segment of `narration_secs` length.
///
/// The offset is drawn uniformly from `[0, min(0.8 * F, F - A)]`. When the
/// bound collapses to zero the selection is deterministic (`0.0`); when the
/// narration is longer than the footage the job fails with a
/// duration-mismatch error rather than silently truncating narration.
pub fn select_start<R: Rng + ?Sized>(
    footage_secs: f64,
    narration_secs: f64,
    rng: &mut R,
) -> SmithResult<f64> {
    let max_start = (footage_secs * START_CAP_FRACTION).min(footage_secs - narration_secs);

    if max_start < 0.0 {
        return Err(SmithError::DurationMismatch {
            footage_secs,
            narration_secs,
        });
    }

    if max_start == 0.0 {
        return Ok(0.0);
    }

    Ok(rng.gen_range(0.0..=max_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_narration_longer_than_footage_is_rejected() {
        let err = select_start(10.0, 12.0, &mut rng()).unwrap_err();
        match err {
            SmithError::DurationMismatch {
                footage_secs,
                narration_secs,
            } => {
                assert_eq!(footage_secs, 10.0);
                assert_eq!(narration_secs, 12.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_equal_durations_select_zero_deterministically() {
        for _ in 0..10 {
            assert_eq!(select_start(10.0, 10.0, &mut rng()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_start_cap_limits_late_starts() {
        // F = 100, A = 5: fit allows up to 95 but the cap holds it to 80.
        let mut r = rng();
        for _ in 0..200 {
            let s = select_start(100.0, 5.0, &mut r).unwrap();
            assert!(s <= 80.0, "start {s} beyond cap");
        }
    }

    proptest! {
        #[test]
        fn prop_segment_fits_inside_footage(
            footage in 1.0f64..3600.0,
            ratio in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let narration = footage * ratio;
            let mut r = rand::rngs::StdRng::seed_from_u64(seed);
            let s = select_start(footage, narration, &mut r).unwrap();
            prop_assert!(s >= 0.0);
            prop_assert!(s + narration <= footage + 1e-9);
        }

        #[test]
        fn prop_overlong_narration_always_errors(
            footage in 1.0f64..3600.0,
            excess in 0.001f64..100.0,
            seed in any::<u64>(),
        ) {
            let mut r = rand::rngs::StdRng::seed_from_u64(seed);
            let result = select_start(footage, footage + excess, &mut r);
            prop_assert!(result.is_err());
        }
    }
}
