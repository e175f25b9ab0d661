//! Time-driven image rotation.
//!
//! Assets cycle in fixed order, evenly dividing the clip duration; the
//! index is a pure step function of elapsed time.

/// Asset index at time `t` for `count` assets over `total_secs` of clip.
///
/// Returns `None` when there are no assets or the clip has no duration.
/// Over `[0, total_secs)` the index is non-decreasing and visits each of
/// the `count` slots exactly once.
pub fn asset_index(t: f64, total_secs: f64, count: usize) -> Option<usize> {
    if count == 0 || total_secs <= 0.0 {
        return None;
    }

    let slot_secs = total_secs / count as f64;
    let idx = (t / slot_secs).floor() as usize;
    Some(idx % count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_assets_yields_none() {
        assert_eq!(asset_index(1.0, 10.0, 0), None);
        assert_eq!(asset_index(1.0, 0.0, 3), None);
    }

    #[test]
    fn test_single_asset_always_selected() {
        for i in 0..100 {
            assert_eq!(asset_index(i as f64 * 0.1, 10.0, 1), Some(0));
        }
    }

    #[test]
    fn test_even_division_of_duration() {
        // 3 assets over 9 seconds: 3s per slot.
        assert_eq!(asset_index(0.0, 9.0, 3), Some(0));
        assert_eq!(asset_index(2.999, 9.0, 3), Some(0));
        assert_eq!(asset_index(3.0, 9.0, 3), Some(1));
        assert_eq!(asset_index(6.0, 9.0, 3), Some(2));
        assert_eq!(asset_index(8.999, 9.0, 3), Some(2));
    }

    #[test]
    fn test_non_decreasing_and_covers_each_index_once() {
        let total = 12.7;
        let count = 5;
        let mut last = 0;
        let mut seen = vec![0usize; count];

        let mut t = 0.0;
        while t < total {
            let idx = asset_index(t, total, count).unwrap();
            assert!(idx >= last, "index decreased at t={t}");
            if idx != last || seen[idx] == 0 {
                seen[idx] += 1;
            }
            last = idx;
            t += 0.01;
        }

        assert!(seen.iter().all(|&hits| hits == 1), "slots hit: {seen:?}");
    }
}
