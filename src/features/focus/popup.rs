//! Popup timer handoff parameters.
//!
//! A running timer can be moved into a separate popup window. The state is
//! carried as a URL query string:
//!
//! ```text
//! taskId=<id>&taskTitle=<percent-encoded>&time=<seconds>&running=true|false&break=true|false
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::PromodoroError;

/// Route the popup window is opened on.
pub const POPUP_ROUTE: &str = "/timer-popup";

/// Title used when the query carries none.
pub const DEFAULT_TITLE: &str = "Focus Time";

/// Characters escaped in query values: `encodeURIComponent` plus `'`, so a
/// query always survives inside single shell quotes.
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// State handed from the main timer to a popup timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupParams {
    /// Task ID (may be empty)
    pub task_id: String,
    /// Task title shown in the popup
    pub task_title: String,
    /// Seconds on the clock; `None` means a full work sprint
    pub time: Option<u32>,
    /// Whether the clock was running
    pub running: bool,
    /// Whether the timer was on a break
    pub on_break: bool,
}

impl PopupParams {
    /// Encode as a query string (without the leading `?`).
    #[must_use]
    pub fn to_query(&self) -> String {
        let time = self.time.map(|t| format!("&time={t}")).unwrap_or_default();
        format!(
            "taskId={}&taskTitle={}{time}&running={}&break={}",
            utf8_percent_encode(&self.task_id, TITLE_ENCODE_SET),
            utf8_percent_encode(&self.task_title, TITLE_ENCODE_SET),
            self.running,
            self.on_break
        )
    }

    /// Full popup URL path with query.
    #[must_use]
    pub fn to_url(&self) -> String {
        format!("{POPUP_ROUTE}?{}", self.to_query())
    }

    /// Parse a query string or popup URL.
    ///
    /// Missing `time` stays `None` and is resolved against the configured
    /// work duration when the popup engine is built. A missing title becomes
    /// "Focus Time". `running` and `break` are true only for the literal
    /// `true`. Only a leading `?` or a `/timer-popup?` prefix is stripped, so a
    /// raw `?` inside a value is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is present but not a second count, or if a
    /// value is not valid UTF-8 once decoded.
    pub fn from_query(input: &str) -> Result<Self, PromodoroError> {
        let input = input.trim();
        let query = input.strip_prefix(POPUP_ROUTE).unwrap_or(input);
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut params = Self {
            task_id: String::new(),
            task_title: DEFAULT_TITLE.to_string(),
            time: None,
            running: false,
            on_break: false,
        };

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(raw)?;

            match key {
                "taskId" => params.task_id = value,
                "taskTitle" if !value.is_empty() => params.task_title = value,
                "time" => {
                    params.time = Some(value.trim().parse().map_err(|_| {
                        PromodoroError::InvalidInput(format!("Invalid popup time: {value}"))
                    })?);
                }
                "running" => params.running = value == "true",
                "break" => params.on_break = value == "true",
                _ => {}
            }
        }

        Ok(params)
    }
}

fn decode(raw: &str) -> Result<String, PromodoroError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| PromodoroError::InvalidInput(format!("Invalid popup parameter: {e}")))
}
