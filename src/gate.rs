//! Authorization gate for review-state changes.
//!
//! Checks run in a fixed order and stop at the first failure:
//! identity present, requested state valid, caller is the authorized
//! reviewer, listing exists. Only then is the single-document update issued,
//! writing the state together with its timestamp and author.

use bson::Bson;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::auth::Identity;
use crate::document::{ReviewState, fields};
use crate::errors::ApiError;
use crate::query::UpdateDoc;
use crate::store::ListingStore;
use crate::telemetry;
use crate::types::ListingId;
use crate::utils::num::{lenient_i64, parse_int_prefix};

/// Parse a requested state with the leading-integer rule. The error carries
/// the value as the caller sent it.
pub fn parse_state(raw: &Value) -> Result<ReviewState, ApiError> {
    let parsed = match raw {
        Value::String(s) => parse_int_prefix(s),
        Value::Number(_) => lenient_i64(raw),
        _ => None,
    };
    parsed
        .and_then(|v| ReviewState::try_from(v).ok())
        .ok_or_else(|| ApiError::InvalidState(render_raw(raw)))
}

fn render_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct StateGate {
    authorized_email: Option<String>,
    last_stamp_us: AtomicU64,
}

impl StateGate {
    #[must_use]
    pub fn new(authorized_email: Option<String>) -> Self {
        if authorized_email.is_none() {
            log::warn!("no authorized reviewer configured; every state change will be refused");
        }
        Self { authorized_email, last_stamp_us: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn authorized_email(&self) -> Option<&str> {
        self.authorized_email.as_deref()
    }

    /// Epoch seconds with microsecond resolution, strictly increasing across
    /// calls on this gate.
    #[allow(clippy::cast_precision_loss)]
    fn next_timestamp(&self) -> f64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_micros()).unwrap_or(0);
        let prev = self
            .last_stamp_us
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(now.max(last.saturating_add(1))))
            .unwrap_or(now);
        let stamp = now.max(prev.saturating_add(1));
        stamp as f64 / 1_000_000.0
    }

    /// Run the checks and, when they pass, update the listing. `id` is
    /// `None` when the caller's id did not parse; such an id matches no
    /// listing and fails at the existence check.
    pub fn request_state_change<S>(
        &self,
        store: &S,
        id: Option<ListingId>,
        requested: &Value,
        caller: Option<&Identity>,
    ) -> Result<ReviewState, ApiError>
    where
        S: ListingStore + ?Sized,
    {
        let user = caller.map(|c| c.email.as_str());
        let raw = render_raw(requested);
        let result = self.check_and_apply(store, id, requested, caller);
        match &result {
            Ok(_) => telemetry::log_state_change(id, user, &raw, Ok(())),
            Err(e) => telemetry::log_state_change(id, user, &raw, Err(&e.to_string())),
        }
        result
    }

    fn check_and_apply<S>(
        &self,
        store: &S,
        id: Option<ListingId>,
        requested: &Value,
        caller: Option<&Identity>,
    ) -> Result<ReviewState, ApiError>
    where
        S: ListingStore + ?Sized,
    {
        let caller = caller.ok_or(ApiError::Unauthenticated)?;
        let state = parse_state(requested)?;
        if self.authorized_email.as_deref() != Some(caller.email.as_str()) {
            return Err(ApiError::Forbidden);
        }
        let id = id.ok_or(ApiError::NotFound)?;
        let update = UpdateDoc {
            set: vec![
                (fields::STATE.to_string(), Bson::from(state)),
                (fields::LAST_UPDATE.to_string(), Bson::Double(self.next_timestamp())),
                (fields::UPDATED_BY.to_string(), Bson::String(caller.email.clone())),
            ],
        };
        let report = store.update_one(id, &update)?;
        if report.matched == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_parsing_follows_leading_integer_rule() {
        assert_eq!(parse_state(&json!(2)).unwrap(), ReviewState::Rejected);
        assert_eq!(parse_state(&json!("1")).unwrap(), ReviewState::Approved);
        assert_eq!(parse_state(&json!("0px")).unwrap(), ReviewState::UnderReview);
        for (raw, shown) in [
            (json!("3"), "3"),
            (json!("abc"), "abc"),
            (json!(""), ""),
            (json!(null), "null"),
            (json!(true), "true"),
            (json!(-1), "-1"),
        ] {
            match parse_state(&raw) {
                Err(ApiError::InvalidState(s)) => assert_eq!(s, shown),
                other => panic!("expected InvalidState for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn timestamps_strictly_increase() {
        let g = StateGate::new(Some("r@x.it".into()));
        let mut last = 0.0;
        for _ in 0..1000 {
            let t = g.next_timestamp();
            assert!(t > last);
            last = t;
        }
    }
}
