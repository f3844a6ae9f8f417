//! Chain definition and builder.

use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::executor::{self, RunReport};
use crate::step::{Step, StepBuilder};

/// An ordered list of steps executed strictly in sequence.
///
/// The chain is plain data: steps can be added, removed, and inspected
/// freely between runs, and each step keeps the outcome of its most recent
/// attempt until the step is attempted again.
///
/// # Examples
///
/// ```
/// use api_chain::{Chain, Step};
///
/// let chain = Chain::new("fetch post")
///     .step(Step::get("https://api.test/posts/1"))
///     .step(Step::comments("1"))
///     .build();
///
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// Human-readable chain name, used in logs.
    pub name: String,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Chain {
    /// Start building a chain with the given name.
    pub fn new(name: &str) -> ChainBuilder {
        ChainBuilder {
            chain: Chain::empty(name),
        }
    }

    /// Create a chain with no steps.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            steps: Vec::new(),
        }
    }

    /// Append a step to the end of the chain.
    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    /// Remove the step with the given id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Step> {
        let pos = self.steps.iter().position(|s| s.id() == id)?;
        Some(self.steps.remove(pos))
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id() == id)
    }

    /// Look up a step by id for editing.
    pub fn step_mut(&mut self, id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id() == id)
    }

    /// Number of steps in the chain.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the chain with a fresh executor, writing outcomes onto the steps.
    ///
    /// Convenience for one-off runs; use [`Executor`](crate::Executor)
    /// directly to reuse an HTTP client or to observe progress.
    pub async fn run(&mut self) -> Result<RunReport, ChainError> {
        executor::execute(self).await
    }
}

/// Builder for creating chains.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    chain: Chain,
}

impl ChainBuilder {
    /// Set the chain's description.
    pub fn description(mut self, description: &str) -> Self {
        self.chain.description = Some(description.to_string());
        self
    }

    /// Append a step.
    pub fn add(mut self, step: impl Into<Step>) -> Self {
        self.chain.steps.push(step.into());
        self
    }

    /// Append a step from its builder. Alias for [`add`](Self::add) that
    /// reads well in chained construction.
    pub fn step(self, step: StepBuilder) -> Self {
        self.add(step)
    }

    /// Build the chain.
    pub fn build(self) -> Chain {
        self.chain
    }

    /// Build and immediately run the chain.
    pub async fn run(self) -> Result<(Chain, RunReport), ChainError> {
        let mut chain = self.build();
        let report = chain.run().await?;
        Ok((chain, report))
    }
}

impl From<ChainBuilder> for Chain {
    fn from(builder: ChainBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::RequestKind;

    #[test]
    fn test_chain_builder() {
        let chain = Chain::new("demo")
            .description("fetch then comment")
            .step(Step::get("https://api.test/posts/1"))
            .step(Step::comments("1").use_last_response())
            .build();

        assert_eq!(chain.name, "demo");
        assert_eq!(chain.description.as_deref(), Some("fetch then comment"));
        assert_eq!(chain.len(), 2);
        assert!(chain.steps[1].use_last_response);
    }

    #[test]
    fn test_empty_chain() {
        let chain = Chain::empty("bare");

        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.description.is_none());
    }

    #[test]
    fn test_push_and_remove_by_id() {
        let mut chain = Chain::empty("edit");
        chain.push(Step::get("https://api.test/a"));
        chain.push(Step::get("https://api.test/b"));

        let id = chain.steps[0].id().to_string();
        let removed = chain.remove(&id).unwrap();

        assert_eq!(removed.id(), id);
        assert_eq!(chain.len(), 1);
        assert!(chain.remove("no-such-id").is_none());
    }

    #[test]
    fn test_step_lookup_and_edit() {
        let mut chain = Chain::new("edit")
            .step(Step::get("https://api.test/a"))
            .build();
        let id = chain.steps[0].id().to_string();

        assert!(chain.step(&id).is_some());

        let step = chain.step_mut(&id).unwrap();
        step.request = RequestKind::Get {
            url: "https://api.test/b".to_string(),
        };

        match &chain.step(&id).unwrap().request {
            RequestKind::Get { url } => assert_eq!(url, "https://api.test/b"),
            other => panic!("expected GET, got {:?}", other),
        }
    }

    #[test]
    fn test_chain_serde_round_trip() {
        let chain = Chain::new("persist")
            .step(Step::post("https://api.test/posts").with_field("title", "hi"))
            .build();

        let json = serde_json::to_string(&chain).unwrap();
        let back: Chain = serde_json::from_str(&json).unwrap();

        assert_eq!(back.name, chain.name);
        assert_eq!(back.len(), 1);
        assert_eq!(back.steps[0].request, chain.steps[0].request);
    }
}
