pub mod apps;
pub mod devices;
pub mod keyboard;
pub mod messages;
pub mod midi;

pub mod clock {
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Wall-clock time in seconds, with sub-millisecond resolution.
    ///
    /// Both the device input path and the on-screen keyboard stamp
    /// their events with this clock so the log reads as one timeline.
    pub fn now() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default()
    }

    /// Render seconds as `HH:MM:SS`, wrapping the hours at 24.
    pub fn format_time_of_day(seconds: f64) -> String {
        let seconds = seconds.max(0.) as u64;
        format!(
            "{:02}:{:02}:{:02}",
            (seconds / 3600) % 24,
            (seconds / 60) % 60,
            seconds % 60
        )
    }

    #[cfg(test)]
    mod test {
        use super::*;

        #[test]
        fn formats_hours_minutes_and_seconds() {
            assert_eq!(format_time_of_day(0.), "00:00:00");
            assert_eq!(format_time_of_day(3_723.9), "01:02:03");
        }

        #[test]
        fn hours_wrap_around_the_day() {
            assert_eq!(format_time_of_day(25. * 3600. + 61.), "01:01:01");
        }

        #[test]
        fn negative_times_clamp_to_midnight() {
            assert_eq!(format_time_of_day(-5.), "00:00:00");
        }

        #[test]
        fn clock_moves_forward() {
            let before = now();
            let after = now();
            assert!(before > 0.);
            assert!(after >= before);
        }
    }
}
