//! Time helpers for client display.

use chrono::Local;

/// Current local wall-clock time as `HH:MM:SS`, for message timestamps
/// in the terminal client.
pub fn now_clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_clock_has_hh_mm_ss_shape() {
        // given / when:
        let clock = now_clock();

        // then:
        assert_eq!(clock.len(), 8);
        let bytes = clock.as_bytes();
        assert_eq!(bytes[2], b':');
        assert_eq!(bytes[5], b':');
    }
}
