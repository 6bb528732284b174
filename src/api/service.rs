use bson::Document as BsonDocument;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

use super::response::ApiResponse;
use crate::auth::{Authenticator, StaticTokenAuthenticator};
use crate::config::AppConfig;
use crate::cors::OriginPolicy;
use crate::errors::ApiError;
use crate::filter::{self, FilterOptions};
use crate::gate::StateGate;
use crate::query::QueryExpression;
use crate::store::ListingStore;
use crate::telemetry;
use crate::types::ListingId;
use crate::utils::json::bson_document_to_json;
use crate::utils::num::parse_int_prefix;

pub const FETCH_FAILED: &str = "Failed to fetch data from database";
pub const NOT_FOUND: &str = "Document not found";
pub const STATE_UPDATED: &str = "State updated successfully";
pub const SERVER_RUNNING: &str = "Server is running";

/// Request-boundary facade. Every operation returns an envelope; failures
/// are logged and rendered, never propagated.
pub struct ListingService<S> {
    store: S,
    gate: StateGate,
    auth: Arc<dyn Authenticator>,
    origins: OriginPolicy,
}

impl<S: ListingStore> ListingService<S> {
    pub fn new(store: S, gate: StateGate, auth: Arc<dyn Authenticator>, origins: OriginPolicy) -> Self {
        Self { store, gate, auth, origins }
    }

    pub fn from_config(store: S, cfg: &AppConfig) -> Self {
        let tokens = cfg.auth.tokens.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Self::new(
            store,
            StateGate::new(cfg.review.authorized_email.clone()),
            Arc::new(StaticTokenAuthenticator::new(tokens)),
            OriginPolicy::new(cfg.cors.allowed_origins.iter().cloned()),
        )
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn origins(&self) -> &OriginPolicy {
        &self.origins
    }

    #[must_use]
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        self.origins.allows(origin)
    }

    fn run(&self, op: &str, expr: &QueryExpression, post: Option<&filter::PostFilter>) -> Result<Vec<Value>, ApiError> {
        let start = Instant::now();
        let native = self.store.find(expr)?;
        let fetched = native.len();
        let refined = filter::refine(native, post);
        telemetry::log_query(op, expr, refined.len(), fetched - refined.len(), start.elapsed().as_millis());
        refined.iter().map(|d| bson_document_to_json(d).map_err(ApiError::from)).collect()
    }

    /// Filtered list of non-deleted listings.
    pub fn list(&self, opts: &FilterOptions) -> ApiResponse {
        let compiled = filter::build(opts);
        match self.run("list", &compiled.expr, compiled.post_filter.as_ref()) {
            Ok(items) => ApiResponse::list(items),
            Err(e) => {
                log::error!("Error fetching data: {e}");
                ApiResponse::failure(&e, FETCH_FAILED)
            }
        }
    }

    /// [`ListingService::list`] from a raw request body.
    pub fn list_json(&self, body: &Value) -> ApiResponse {
        match FilterOptions::from_json(body) {
            Ok(opts) => self.list(&opts),
            Err(e) => {
                log::warn!("rejected list body: {e}");
                ApiResponse::failure(&e, FETCH_FAILED)
            }
        }
    }

    /// Every non-deleted listing, summary fields only.
    pub fn statistics(&self) -> ApiResponse {
        match self.run("statistics", &filter::build_summary(), None) {
            Ok(items) => ApiResponse::list(items),
            Err(e) => {
                log::error!("Error fetching data: {e}");
                ApiResponse::failure(&e, FETCH_FAILED)
            }
        }
    }

    fn fetch_one(&self, id: Option<ListingId>) -> Result<BsonDocument, ApiError> {
        let id = id.ok_or(ApiError::NotFound)?;
        let expr = filter::build_by_id(id);
        let start = Instant::now();
        let found = self.store.find(&expr)?.into_iter().next();
        telemetry::log_query("get", &expr, usize::from(found.is_some()), 0, start.elapsed().as_millis());
        found.ok_or(ApiError::NotFound)
    }

    /// One listing by id. The id is read with the leading-integer rule; an
    /// unreadable id finds nothing.
    pub fn get(&self, raw_id: &str) -> ApiResponse {
        let result = self
            .fetch_one(parse_int_prefix(raw_id))
            .and_then(|d| bson_document_to_json(&d).map_err(ApiError::from));
        match result {
            Ok(item) => ApiResponse::item(item),
            Err(ApiError::NotFound) => {
                log::info!("listing {raw_id} not found");
                ApiResponse::failure(&ApiError::NotFound, NOT_FOUND)
            }
            Err(e) => {
                log::error!("Error fetching document: {e}");
                ApiResponse::failure(&e, format!("Failed to fetch document: {e}"))
            }
        }
    }

    /// Change `stateMaloi` of one listing. `body` carries `stateMaloi`;
    /// `authorization` is the raw header value.
    pub fn update_state(&self, raw_id: &str, body: &Value, authorization: Option<&str>) -> ApiResponse {
        let caller = self.auth.authenticate(authorization);
        let requested = body.get("stateMaloi").unwrap_or(&Value::Null);
        match self.gate.request_state_change(&self.store, parse_int_prefix(raw_id), requested, caller.as_ref()) {
            Ok(state) => {
                log::info!("listing {raw_id} set to state {}", state.as_i32());
                ApiResponse::message(STATE_UPDATED)
            }
            Err(e @ ApiError::Unauthenticated) => ApiResponse::failure(&e, e.to_string()),
            Err(e) => {
                log::error!("Error updating document: {e}");
                ApiResponse::failure(&e, format!("Failed to update document: {e}"))
            }
        }
    }

    /// Liveness envelope with an RFC 3339 timestamp.
    #[must_use]
    pub fn health(&self) -> ApiResponse {
        let mut r = ApiResponse::message(SERVER_RUNNING);
        r.timestamp = Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
        r
    }

    /// The Mongo pipeline and post-filter a list request compiles to.
    pub fn explain(&self, opts: &FilterOptions) -> ApiResponse {
        let compiled = filter::build(opts);
        let pipeline = match serde_json::to_value(compiled.expr.to_pipeline()) {
            Ok(v) => v,
            Err(e) => {
                let e = ApiError::from(e);
                return ApiResponse::failure(&e, e.to_string());
            }
        };
        let post_filter = compiled.post_filter.map(|p| match p {
            filter::PostFilter::PrimaryFeature { name, value } => {
                json!({"primaryFeature": {"name": name, "value": value}})
            }
        });
        ApiResponse::item(json!({
            "pipeline": pipeline,
            "postFilter": post_filter,
            "pipelineHash": telemetry::pipeline_hash(&compiled.expr),
        }))
    }
}
