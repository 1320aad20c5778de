use std::time::Duration;

use chrono::{Local, TimeDelta};

/// Heure locale dans `after`, pour les logs « prochain passage ».
pub fn fmt_local_after(after: Duration) -> String {
    TimeDelta::from_std(after)
        .ok()
        .and_then(|delta| Local::now().checked_add_signed(delta))
        .map_or_else(
            || format!("(in {})", humantime::format_duration(after)),
            |at| at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::fmt_local_after;
    use std::time::Duration;

    #[test]
    fn formats_as_local_timestamp() {
        let text = fmt_local_after(Duration::from_secs(60));
        assert_eq!(text.len(), "2026-01-01 00:00:00".len());
    }

    #[test]
    fn out_of_range_falls_back_to_duration() {
        let text = fmt_local_after(Duration::MAX);
        assert!(text.starts_with("(in "));
    }
}
