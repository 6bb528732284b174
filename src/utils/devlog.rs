//! Structured developer lines (query benchmarks, audit records) with a thread-local capture
//! buffer, so tests can assert on what a single call emitted without racing the global logger.

use std::cell::RefCell;

/// Log target used for every line routed through [`bench!`](crate::bench).
pub const BENCH_TARGET: &str = "affito::bench";

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Stops capturing for the current thread when dropped.
pub struct CaptureGuard;

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE.with(|c| *c.borrow_mut() = None);
    }
}

/// Start capturing lines emitted on this thread.
#[must_use]
pub fn capture() -> CaptureGuard {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    CaptureGuard
}

pub fn record(line: &str) {
    CAPTURE.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line.to_owned());
        }
    });
}

/// Take everything captured so far; empty when capture is off.
#[must_use]
pub fn take() -> Vec<String> {
    CAPTURE.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
}

/// Emit a JSON benchmark line at TRACE and record it in the capture buffer.
#[macro_export]
macro_rules! bench {
    ($($arg:tt)*) => {{
        let __line = ::serde_json::json!($($arg)*).to_string();
        $crate::utils::devlog::record(&__line);
        ::log::log!(target: $crate::utils::devlog::BENCH_TARGET, ::log::Level::Trace, "{}", __line);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_only_while_guard_lives() {
        {
            let _g = capture();
            crate::bench!({"bench": "query", "op": "find", "returned": 2});
            let lines = take();
            assert_eq!(lines.len(), 1);
            assert!(lines[0].contains("\"op\":\"find\""));
            assert!(take().is_empty());
        }
        crate::bench!({"bench": "query", "op": "after"});
        assert!(take().is_empty());
    }

    #[test]
    fn other_threads_are_not_captured() {
        let _g = capture();
        std::thread::spawn(|| crate::bench!({"bench": "child"})).join().unwrap();
        assert!(take().is_empty());
    }
}
