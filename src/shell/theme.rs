//! Light/dark theme chosen by the wall clock in Pacific time.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::America::Los_Angeles;
use std::time::Duration;
use tokio::{sync::mpsc, time::interval};

/// How often a long-lived page re-evaluates the theme.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

const LIGHT_FROM_HOUR: u32 = 7;
const DARK_FROM_HOUR: u32 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Light from 07:00 until 17:59 in Los Angeles, dark otherwise.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        let hour = now.with_timezone(&Los_Angeles).hour();
        if (LIGHT_FROM_HOUR..DARK_FROM_HOUR).contains(&hour) {
            Self::Light
        } else {
            Self::Dark
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn pill_label(self) -> &'static str {
        match self {
            Self::Light => "PST Light Mode",
            Self::Dark => "PST Dark Mode",
        }
    }
}

/// Sends the current theme, then each change seen on a `REFRESH_INTERVAL`
/// tick. `now` is the wall clock. Dropping the receiver stops the task.
#[must_use]
pub fn watch<F>(now: F) -> mpsc::Receiver<Theme>
where
    F: Fn() -> DateTime<Utc> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut ticks = interval(REFRESH_INTERVAL);
        let mut last = None;
        loop {
            ticks.tick().await;
            let theme = Theme::at(now());
            if last == Some(theme) {
                continue;
            }
            if tx.send(theme).await.is_err() {
                break;
            }
            last = Some(theme);
        }
    });

    rx
}
