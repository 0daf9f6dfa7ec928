//! Status classification.

use std::ops::Range;

use crate::error::StatusError;
use crate::http::{RedirectMode, TransportResponse};

/// The range of status codes treated as non-error for a redirect mode.
///
/// In manual mode a 3xx is a normal terminal response, so the window runs
/// through 399. In the other modes a 3xx should never reach the exchange and
/// is rejected if it does.
pub fn acceptance_window(mode: RedirectMode) -> Range<u16> {
    let end = if mode == RedirectMode::Manual { 400 } else { 300 };
    200..end
}

/// Check if a status code is accepted under a redirect mode.
pub fn is_accepted(status: u16, mode: RedirectMode) -> bool {
    acceptance_window(mode).contains(&status)
}

/// Pass accepted responses through; reject the rest with their status text.
pub(crate) fn check_status(
    response: TransportResponse,
    mode: RedirectMode,
) -> Result<TransportResponse, StatusError> {
    if is_accepted(response.status(), mode) {
        Ok(response)
    } else {
        Err(StatusError::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [RedirectMode; 3] =
        [RedirectMode::Follow, RedirectMode::Manual, RedirectMode::Error];

    #[test]
    fn test_2xx_accepted_everywhere() {
        for mode in ALL_MODES {
            for status in [200, 201, 204, 299] {
                assert!(is_accepted(status, mode), "{status} under {mode}");
            }
        }
    }

    #[test]
    fn test_3xx_only_accepted_in_manual_mode() {
        for status in [300, 301, 302, 304, 399] {
            assert!(is_accepted(status, RedirectMode::Manual));
            assert!(!is_accepted(status, RedirectMode::Follow));
            assert!(!is_accepted(status, RedirectMode::Error));
        }
    }

    #[test]
    fn test_outside_window_rejected() {
        for mode in ALL_MODES {
            for status in [100, 199, 400, 404, 500, 503] {
                assert!(!is_accepted(status, mode), "{status} under {mode}");
            }
        }
    }

    #[test]
    fn test_check_status_rejection_carries_response() {
        let response = TransportResponse::new(503, "busy").with_header("Retry-After", "5");
        let err = check_status(response, RedirectMode::Follow).unwrap_err();

        assert_eq!(err.status(), 503);
        assert_eq!(err.status_text(), "Service Unavailable");
        assert_eq!(err.to_string(), "Service Unavailable");
        assert_eq!(err.response().header("retry-after"), Some("5"));
    }

    #[test]
    fn test_check_status_accepts() {
        let response = TransportResponse::new(302, "");
        assert!(check_status(response, RedirectMode::Manual).is_ok());
    }
}
