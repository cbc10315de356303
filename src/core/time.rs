//! Shared timestamp helpers for log rows and history entries.

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
///
/// Epoch text sorts the same way the underlying instants do, which is all
/// the experiment and history logs need from a timestamp.
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_epoch_z_format() {
        let result = now_epoch_z();
        assert!(result.ends_with('Z'));
        let numeric_part = result.trim_end_matches('Z');
        assert!(numeric_part.parse::<u64>().is_ok());
    }

    #[test]
    fn test_now_epoch_z_sorts_with_time() {
        let a = now_epoch_z();
        let b = now_epoch_z();
        assert!(a <= b);
    }
}
