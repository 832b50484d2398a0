// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter, Result},
          time::Duration};

use crate::ok;

/// Wrapper around [Duration] that formats the time a spinner has been running, in the
/// short form used by the elapsed time annotation, eg: `(1.2s)`.
///
/// | Range           | Format   |
/// |-----------------|----------|
/// | under 1 second  | `123ms`  |
/// | under 1 minute  | `1.2s`   |
/// | 1 minute and up | `1m 5s`  |
///
/// ```rust
/// use std::time::Duration;
/// use r3bl_spinner::ElapsedTime;
/// let elapsed = ElapsedTime::from(Duration::from_millis(1_250));
/// assert_eq!(elapsed.to_string(), "1.2s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ElapsedTime {
    pub inner: Duration,
}

impl ElapsedTime {
    /// The annotation appended to frames and persisted lines, eg: `(350ms)`.
    #[must_use]
    pub fn annotation(&self) -> String { format!("({self})") }
}

mod converters {
    use super::{Duration, ElapsedTime};

    impl From<Duration> for ElapsedTime {
        fn from(duration: Duration) -> Self { Self { inner: duration } }
    }

    impl From<ElapsedTime> for Duration {
        fn from(elapsed_time: ElapsedTime) -> Self { elapsed_time.inner }
    }
}

mod display_formatter {
    use super::{Display, ElapsedTime, Formatter, Result, ok};

    impl Display for ElapsedTime {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            let secs = self.inner.as_secs();
            let millis = self.inner.subsec_millis();

            if secs >= 60 {
                let mins = secs / 60;
                let secs = secs % 60;
                write!(f, "{mins}m {secs}s")?;
            } else if secs > 0 {
                let tenths = millis / 100;
                write!(f, "{secs}.{tenths}s")?;
            } else {
                write!(f, "{millis}ms")?;
            }

            ok!()
        }
    }
}
