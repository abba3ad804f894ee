use std::time::Duration;

/// Default bound on how long a request waits for its response.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of buffered events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long a request waits for its response before it is withdrawn.
    /// `None` waits until the response arrives or the connection closes.
    /// A response arriving after the timeout resolves the next request
    /// waiting on the same kind.
    pub response_timeout: Option<Duration>,
    /// Capacity of the event channel. Slow subscribers miss the oldest events.
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            response_timeout: Some(DEFAULT_RESPONSE_TIMEOUT),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
