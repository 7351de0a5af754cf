// Time window - the `since` parameter bounding chart history
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_WINDOW: &str = "1d";

/// Holder for the current time window with change notification.
///
/// Clones share the same value; every clone sees `set` from any other.
#[derive(Debug, Clone)]
pub struct TimeWindow {
    tx: Arc<watch::Sender<String>>,
}

impl TimeWindow {
    pub fn new(since: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(Self::normalize(since.into()));
        Self { tx: Arc::new(tx) }
    }

    /// Read `since` from a query string such as `?since=1h&foo=bar`.
    pub fn from_query(query: &str) -> Self {
        Self::new(since_param(query).unwrap_or_default())
    }

    /// Read `since` from a full page URL.
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let query = without_fragment
            .split_once('?')
            .map(|(_, q)| q)
            .unwrap_or_default();
        Self::from_query(query)
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the window. Subscribers are notified only on an actual change.
    pub fn set(&self, since: impl Into<String>) -> bool {
        let since = Self::normalize(since.into());
        self.tx.send_if_modified(|current| {
            if *current == since {
                return false;
            }
            *current = since;
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    fn normalize(since: String) -> String {
        if since.trim().is_empty() {
            DEFAULT_WINDOW.to_string()
        } else {
            since
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

fn since_param(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key) == "since").then(|| decode(value))
        })
        .next()
}

fn decode(component: &str) -> String {
    let component = component.replace('+', " ");
    urlencoding::decode(&component)
        .map(|s| s.into_owned())
        .unwrap_or(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent_or_empty() {
        assert_eq!(TimeWindow::from_query("").current(), "1d");
        assert_eq!(TimeWindow::from_query("?foo=bar").current(), "1d");
        assert_eq!(TimeWindow::from_query("since=").current(), "1d");
        assert_eq!(TimeWindow::from_query("since").current(), "1d");
        assert_eq!(TimeWindow::from_url("http://host/dashboard").current(), "1d");
    }

    #[test]
    fn test_reads_since() {
        assert_eq!(TimeWindow::from_query("?since=1h").current(), "1h");
        assert_eq!(TimeWindow::from_query("a=1&since=30m&since=2d").current(), "30m");
        assert_eq!(TimeWindow::from_query("since=now%28%29").current(), "now()");
        assert_eq!(
            TimeWindow::from_url("http://host/index.html?since=7d#chart").current(),
            "7d"
        );
    }

    #[tokio::test]
    async fn test_set_notifies_only_on_change() {
        let window = TimeWindow::default();
        let mut rx = window.subscribe();

        assert!(!window.set("1d"));
        assert!(!rx.has_changed().unwrap());

        assert!(window.set("1h"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "1h");

        assert!(window.set(""));
        assert_eq!(window.current(), "1d");
    }

    #[test]
    fn test_clones_share_value() {
        let window = TimeWindow::default();
        let other = window.clone();
        other.set("12h");
        assert_eq!(window.current(), "12h");
    }
}
