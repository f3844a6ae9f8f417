//! Chain step definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StepError;

/// The request a step issues, one variant per kind.
///
/// Each variant carries only the fields that are meaningful for it, so there
/// is no kind/field mismatch to guard against at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestKind {
    /// Plain GET against `url`. The URL may contain `{name}` placeholder
    /// tokens resolved against the previous step's response.
    Get { url: String },

    /// POST with an optional JSON object body. Top-level string values of
    /// the form `{name}` are substitution candidates; `None` sends no body.
    Post {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Map<String, Value>>,
    },

    /// GET against the fixed comments endpoint for `related_id`. Carries no
    /// URL of its own; the effective URL is derived at execution time.
    GetComments { related_id: String },
}

impl RequestKind {
    /// Kind label for logging.
    pub fn kind_str(&self) -> &'static str {
        match self {
            RequestKind::Get { .. } => "GET",
            RequestKind::Post { .. } => "POST",
            RequestKind::GetComments { .. } => "GET_COMMENTS",
        }
    }
}

/// Outcome of a step's most recent attempt.
///
/// A step holds at most one of these, so a decoded result and a failure can
/// never coexist on the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The decoded JSON response body.
    Success(Value),
    /// Why the step failed.
    Failure(StepError),
}

/// A single step in a chain: one planned request plus its latest outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Opaque identifier, assigned at creation, stable for the step's
    /// lifetime. Used only for addressing; execution order is positional.
    #[serde(default = "fresh_id")]
    id: String,

    /// What to request.
    #[serde(flatten)]
    pub request: RequestKind,

    /// Substitute fields of the previous step's response into the URL (and
    /// body, for POST) before the request is built.
    #[serde(default)]
    pub use_last_response: bool,

    /// Latest outcome; `None` until the step has been attempted. Written
    /// only by the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outcome: Option<StepOutcome>,
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

impl Step {
    /// Create an empty step: a GET with no URL and no prior-response linkage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a GET step.
    pub fn get(url: &str) -> StepBuilder {
        StepBuilder::new(RequestKind::Get {
            url: url.to_string(),
        })
    }

    /// Start building a POST step with an empty body.
    pub fn post(url: &str) -> StepBuilder {
        StepBuilder::new(RequestKind::Post {
            url: url.to_string(),
            body: None,
        })
    }

    /// Start building a comments lookup for the given post id.
    pub fn comments(related_id: &str) -> StepBuilder {
        StepBuilder::new(RequestKind::GetComments {
            related_id: related_id.to_string(),
        })
    }

    /// The step's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latest outcome, if the step has been attempted.
    pub fn outcome(&self) -> Option<&StepOutcome> {
        self.outcome.as_ref()
    }

    /// Decoded response of the most recent successful attempt.
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Some(StepOutcome::Success(value)) => Some(value),
            _ => None,
        }
    }

    /// Failure of the most recent attempt, if it failed.
    pub fn failure(&self) -> Option<&StepError> {
        match &self.outcome {
            Some(StepOutcome::Failure(err)) => Some(err),
            _ => None,
        }
    }

    /// Whether the step has been attempted at least once.
    pub fn attempted(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the outcome of an attempt, replacing any earlier one.
    pub(crate) fn record(&mut self, outcome: StepOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Default for Step {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            request: RequestKind::Get { url: String::new() },
            use_last_response: false,
            outcome: None,
        }
    }
}

/// Builder for creating chain steps.
#[derive(Debug, Clone)]
pub struct StepBuilder {
    step: Step,
}

impl StepBuilder {
    /// Create a builder for the given request.
    pub fn new(request: RequestKind) -> Self {
        Self {
            step: Step {
                request,
                ..Step::default()
            },
        }
    }

    /// Add a body field. Meaningful only for POST steps; ignored otherwise.
    ///
    /// A string value wrapped in braces, like `"{id}"`, is replaced with the
    /// matching field of the previous response when `use_last_response` is
    /// set.
    pub fn with_field<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        if let RequestKind::Post { body, .. } = &mut self.step.request {
            body.get_or_insert_with(Map::new)
                .insert(key.to_string(), value.into());
        }
        self
    }

    /// Replace the whole body with a JSON object. Meaningful only for POST
    /// steps; non-object values are ignored.
    pub fn with_body(mut self, body: Value) -> Self {
        if let RequestKind::Post { body: slot, .. } = &mut self.step.request {
            if let Value::Object(map) = body {
                *slot = Some(map);
            }
        }
        self
    }

    /// Thread the previous step's response into this step before sending.
    pub fn use_last_response(mut self) -> Self {
        self.step.use_last_response = true;
        self
    }

    /// Build the step.
    pub fn build(self) -> Step {
        self.step
    }
}

impl From<StepBuilder> for Step {
    fn from(builder: StepBuilder) -> Self {
        builder.build()
    }
}
