//! Mock response engine
//!
//! Maps a [`MockMode`] to a concrete outcome. The success body is supplied by
//! the caller so every resource shares one simulation policy:
//!
//! | mode          | outcome                                     |
//! |---------------|---------------------------------------------|
//! | `timeout`     | never completes                             |
//! | `delay`       | fixed sleep, then the success producer      |
//! | `badRequest`  | 400 `Bad Request (400)`                     |
//! | `forbidden`   | 403 `Forbidden (403)`                       |
//! | `serverError` | 500 `Server Error (500)`                    |
//! | `success`     | the success producer, immediately           |

use crate::scenario::MockMode;
use crate::types::{status, MockResponse};
use std::future::Future;
use std::time::Duration;

/// Scenario-driven outcome selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockEngine {
    delay: Duration,
}

impl MockEngine {
    /// Interval used by [`MockMode::Delay`] unless configured otherwise
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1800);

    /// Create engine with a custom delay interval
    #[inline]
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay interval
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Produce the outcome for `mode`
    ///
    /// `success` is only invoked for `success` and `delay`. With
    /// [`MockMode::Timeout`] the returned future never completes; callers
    /// that need a bounded wait must race it against their own deadline or
    /// cancellation token.
    pub async fn resolve<F, Fut>(&self, mode: MockMode, success: F) -> MockResponse
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MockResponse>,
    {
        match mode {
            MockMode::Timeout => {
                tracing::debug!("simulating unresponsive server");
                futures::future::pending::<MockResponse>().await
            }
            MockMode::Delay => {
                tracing::debug!(delay_ms = self.delay.as_millis(), "simulating slow server");
                tokio::time::sleep(self.delay).await;
                success().await
            }
            MockMode::BadRequest => MockResponse::error(status::BAD_REQUEST, "Bad Request (400)"),
            MockMode::Forbidden => MockResponse::error(status::FORBIDDEN, "Forbidden (403)"),
            MockMode::ServerError => {
                MockResponse::error(status::INTERNAL_SERVER_ERROR, "Server Error (500)")
            }
            MockMode::Success => success().await,
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
