//! Client side of a phrase search: read the phrase, GET `find`, render the rows.
//!
//! [`SearchTrigger::trigger_search`] never blocks the caller. The request runs
//! on its own task and, once it completes with `200 OK`, the decoded entries
//! replace whatever the result container showed before. Transport failures and
//! other statuses leave the container untouched.

mod response;
mod transport;
mod view;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinHandle;

pub use transport::{HttpTransport, Transport, TransportError};
pub use view::{MemoryContainer, QuerySource, ResultContainer, ResultView, SharedInput};

const PHRASE_PARAM: &str = "phrase";

/// Unreserved query characters stay as they are, everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhraseEncoding {
    #[default]
    Percent,
    /// Appends the phrase verbatim, so `&`, `#` and spaces corrupt the query string.
    Raw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPolicy {
    /// Only the most recently issued search may render; older responses are dropped.
    #[default]
    LatestIssued,
    /// Whichever response completes last renders, regardless of issue order.
    LastCompleted,
}

#[derive(Debug)]
pub enum Outcome {
    Rendered { rows: usize },
    Ignored(StatusCode),
    Failed(TransportError),
    Superseded,
}

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("malformed search response: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

#[derive(Default)]
struct RenderState {
    issued: AtomicU64,
    render: Mutex<()>,
}

pub struct SearchTrigger<T> {
    transport: Arc<T>,
    input: Arc<dyn QuerySource>,
    container: Arc<dyn ResultContainer>,
    endpoint: String,
    encoding: PhraseEncoding,
    policy: RenderPolicy,
    state: Arc<RenderState>,
}

impl<T: Transport + 'static> SearchTrigger<T> {
    pub fn new(
        transport: Arc<T>,
        input: Arc<dyn QuerySource>,
        container: Arc<dyn ResultContainer>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            input,
            container,
            endpoint: endpoint.into(),
            encoding: PhraseEncoding::default(),
            policy: RenderPolicy::default(),
            state: Arc::default(),
        }
    }

    pub fn encoding(mut self, encoding: PhraseEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn request_url(&self, phrase: &str) -> String {
        match self.encoding {
            PhraseEncoding::Percent => format!(
                "{}?{PHRASE_PARAM}={}",
                self.endpoint,
                utf8_percent_encode(phrase, QUERY_VALUE)
            ),
            PhraseEncoding::Raw => format!("{}?{PHRASE_PARAM}={phrase}", self.endpoint),
        }
    }

    /// Fires one search for the current input value and returns at once.
    ///
    /// Awaiting the handle is optional; it resolves to what happened to the
    /// container. Only a `200 OK` with an undecodable body is an error.
    pub fn trigger_search(&self) -> JoinHandle<Result<Outcome, TriggerError>> {
        let url = self.request_url(&self.input.current_value());
        let generation = self.state.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let transport = Arc::clone(&self.transport);
        let container = Arc::clone(&self.container);
        let state = Arc::clone(&self.state);
        let policy = self.policy;

        tokio::spawn(async move {
            let reply = match transport.get(&url).await {
                Ok(reply) => reply,
                Err(err) => {
                    tracing::debug!(%url, %err, "Search request failed");
                    return Ok(Outcome::Failed(err));
                }
            };
            if reply.status != StatusCode::OK {
                tracing::debug!(%url, status = %reply.status, "Search request not successful");
                return Ok(Outcome::Ignored(reply.status));
            }

            let decoded = response::parse(&reply.body);

            let _render = state.render.lock().unwrap_or_else(PoisonError::into_inner);
            if policy == RenderPolicy::LatestIssued
                && state.issued.load(Ordering::SeqCst) != generation
            {
                tracing::debug!(%url, generation, "Dropping superseded search response");
                return Ok(Outcome::Superseded);
            }
            let view = ResultView::from(decoded.inspect_err(|err| {
                tracing::error!(%url, %err, "Cannot decode search response");
            })?);
            let rows = view.len();
            container.replace(view);
            Ok(Outcome::Rendered { rows })
        })
    }
}
