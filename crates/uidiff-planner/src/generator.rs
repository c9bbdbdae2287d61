//! The seam to external blueprint producers.

use crate::blueprint::ModificationBlueprint;
use crate::prompt;
use crate::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use uidiff_core::{Issue, IssueContext};

/// One issue plus the neighbourhood of its node, as sent to a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub issue: Issue,
    pub context: IssueContext,
}

/// Produces a blueprint for a single issue, or fails. Failures are never fatal to the
/// caller; the planner substitutes a rule-based plan.
pub trait BlueprintGenerator: Send + Sync {
    fn generate<'a>(&'a self, request: &'a PlanRequest) -> BoxFuture<'a, Result<ModificationBlueprint>>;
}

/// A chat-style completion backend: system prompt plus one user message in, reply text out.
pub trait CompletionClient: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Drives a [`CompletionClient`] with the blueprint prompt and parses its reply.
#[derive(Debug, Clone)]
pub struct AgentGenerator<C> {
    client: C,
}

impl<C: CompletionClient> AgentGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CompletionClient> BlueprintGenerator for AgentGenerator<C> {
    fn generate<'a>(&'a self, request: &'a PlanRequest) -> BoxFuture<'a, Result<ModificationBlueprint>> {
        Box::pin(async move {
            let user = prompt::render_request(request)?;
            let reply = self.client.complete(prompt::system_prompt(), &user).await?;
            prompt::parse_reply(&reply)
        })
    }
}
