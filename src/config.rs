use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use url::Url;

pub const DEFAULT_SERVER_URL: &str = "https://student-api-backend-bv0d.onrender.com";

#[derive(Debug, Clone, clap::Parser)]
#[clap(version, about = "Terminal client for the students API")]
pub struct Arguments {
    /// Base URL of the students API.
    #[clap(long, env = "STUDENTS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: Url,

    /// Quiet period after the last filter edit before the list is refetched.
    #[clap(long, env = "STUDENTS_DEBOUNCE_MS", default_value_t = 400)]
    pub debounce_ms: u64,

    /// Give up on a request after this many seconds. Requests wait forever
    /// when unset.
    #[clap(long, env = "STUDENTS_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl Arguments {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            server_url,
            debounce_ms,
            request_timeout_secs,
        } = self;

        writeln!(f, "server_url: {}", server_url)?;
        writeln!(f, "debounce_ms: {}", debounce_ms)?;
        writeln!(f, "request_timeout_secs: {:?}", request_timeout_secs)?;
        Ok(())
    }
}
