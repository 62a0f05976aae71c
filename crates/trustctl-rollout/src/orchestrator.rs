//! Certificate rollout to the VIP, one node, or every node.
//!
//! A rollout moves through selection, confirmation and execution. Backing
//! out of a selection or declining the confirmation ends it with
//! `AbortedByOperator` before any request is sent. The all-nodes sweep is
//! best effort: each node is attempted independently and gets exactly one
//! entry in the summary, in fetch order, whether it succeeded or not.

use crate::directory::NodeDirectory;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use trustctl_client::TrustClient;
use trustctl_core::{
    AssignmentResult, AssignmentTarget, Confirmation, Node, RawResponse, Result, RolloutSummary,
    TargetSelector, TrustError,
};

/// A certificate and where it should go, validated and ready for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutPlan {
    certificate_id: String,
    selector: TargetSelector,
}

impl RolloutPlan {
    /// Build a plan from the operator's picks.
    ///
    /// `None` for either pick means the operator backed out. A single node
    /// that has no address is rejected here, before anyone is asked to confirm.
    pub fn new(certificate_id: Option<String>, selector: Option<TargetSelector>) -> Result<Self> {
        let (Some(certificate_id), Some(selector)) = (certificate_id, selector) else {
            return Err(TrustError::AbortedByOperator);
        };

        if let TargetSelector::SingleNode(node) = &selector {
            node.require_address()?;
        }

        Ok(Self {
            certificate_id,
            selector,
        })
    }

    /// Certificate being rolled out
    #[must_use]
    pub fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    /// Where it is going
    #[must_use]
    pub const fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    /// Question to put to the operator before executing
    #[must_use]
    pub fn confirmation_prompt(&self) -> String {
        match &self.selector {
            TargetSelector::Cluster => {
                format!("Apply certificate {} to the cluster VIP?", self.certificate_id)
            }
            TargetSelector::SingleNode(node) => format!(
                "Apply certificate {} to node {}?",
                self.certificate_id,
                node.label(0)
            ),
            TargetSelector::AllNodes => format!(
                "Apply certificate {} to ALL cluster nodes?",
                self.certificate_id
            ),
        }
    }
}

/// Executes rollout plans
pub struct Orchestrator<'a> {
    client: &'a TrustClient,
    concurrency: usize,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator that sweeps nodes one at a time
    #[must_use]
    pub const fn new(client: &'a TrustClient) -> Self {
        Self {
            client,
            concurrency: 1,
        }
    }

    /// Maximum node calls in flight during an all-nodes sweep.
    ///
    /// Clamped to `1..=Semaphore::MAX_PERMITS`; a sweep never uses more
    /// permits than it has nodes.
    #[must_use]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Execute `plan` if `confirmation` is approved.
    ///
    /// For all-nodes plans the topology is fetched here, after confirmation;
    /// failing to fetch it fails the whole rollout. Per-target failures never
    /// do; they are recorded in the summary.
    pub async fn execute(&self, plan: &RolloutPlan, confirmation: Confirmation) -> Result<RolloutSummary> {
        if !confirmation.is_approved() {
            info!(certificate_id = %plan.certificate_id, "rollout declined by operator");
            return Err(TrustError::AbortedByOperator);
        }

        let target = self.resolve(plan).await?;
        Ok(self.run(&plan.certificate_id, target).await)
    }

    /// Turn a plan's selector into a concrete target
    pub async fn resolve(&self, plan: &RolloutPlan) -> Result<AssignmentTarget> {
        Ok(match &plan.selector {
            TargetSelector::Cluster => AssignmentTarget::Cluster,
            TargetSelector::SingleNode(node) => AssignmentTarget::SingleNode(node.clone()),
            TargetSelector::AllNodes => {
                AssignmentTarget::AllNodes(NodeDirectory::new(self.client).list().await?)
            }
        })
    }

    /// Apply `certificate_id` to `target` and collect one result per target
    pub async fn run(&self, certificate_id: &str, target: AssignmentTarget) -> RolloutSummary {
        match target {
            AssignmentTarget::Cluster => {
                let response = self.client.cluster().set_api_certificate(certificate_id).await;
                RolloutSummary::single(classify("cluster VIP".to_string(), certificate_id, response))
            }
            AssignmentTarget::SingleNode(node) => {
                RolloutSummary::single(apply_to_node(self.client, &node, 0, certificate_id).await)
            }
            AssignmentTarget::AllNodes(nodes) => self.sweep(certificate_id, nodes).await,
        }
    }

    async fn sweep(&self, certificate_id: &str, nodes: Vec<Node>) -> RolloutSummary {
        let permits = self.concurrency.min(nodes.len()).max(1);
        info!(
            certificate_id,
            nodes = nodes.len(),
            concurrency = permits,
            "starting all-nodes rollout"
        );

        if permits == 1 {
            let mut results = Vec::with_capacity(nodes.len());
            for (position, node) in nodes.iter().enumerate() {
                results.push(apply_to_node(self.client, node, position, certificate_id).await);
            }
            return RolloutSummary::new(results);
        }

        let semaphore = Arc::new(Semaphore::new(permits));
        let handles: Vec<_> = nodes
            .into_iter()
            .enumerate()
            .map(|(position, node)| {
                let sem = semaphore.clone();
                let client = self.client.clone();
                let certificate_id = certificate_id.to_string();
                let label = node.label(position);

                let handle = tokio::spawn(async move {
                    let _permit = sem.acquire().await;
                    apply_to_node(&client, &node, position, &certificate_id).await
                });
                (label, handle)
            })
            .collect();

        // Awaiting in spawn order keeps the summary in fetch order
        let mut results = Vec::with_capacity(handles.len());
        for (label, handle) in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| AssignmentResult::failure(label, format!("task failed: {e}")));
            results.push(result);
        }

        RolloutSummary::new(results)
    }
}

async fn apply_to_node(
    client: &TrustClient,
    node: &Node,
    position: usize,
    certificate_id: &str,
) -> AssignmentResult {
    let label = node.label(position);
    let base_url = match NodeDirectory::new(client).target_address(node) {
        Ok(base_url) => base_url,
        Err(e) => {
            warn!(target_label = %label, error = %e, "skipping unaddressable node");
            return AssignmentResult::failure(label, e.to_string());
        }
    };

    let response = client
        .node_services()
        .apply_certificate(&base_url, certificate_id)
        .await;
    classify(label, certificate_id, response)
}

/// A response carrying `error_code` is a failure even with a 2xx status
fn classify(label: String, certificate_id: &str, response: Result<RawResponse>) -> AssignmentResult {
    match response {
        Ok(raw) if raw.has_error_code() => {
            warn!(target_label = %label, certificate_id, response = %raw, "certificate assignment rejected");
            AssignmentResult::failure(label, raw.to_string())
        }
        Ok(_) => {
            info!(target_label = %label, certificate_id, "certificate applied");
            AssignmentResult::success(label)
        }
        Err(e) => {
            warn!(target_label = %label, certificate_id, error = %e, "certificate assignment failed");
            AssignmentResult::failure(label, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_for;
    use serde_json::json;
    use trustctl_core::AssignmentOutcome;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APPLY_PATH: &str = "/api/v1/node/services/http";

    async fn node_server(response: ResponseTemplate, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(APPLY_PATH))
            .and(query_param("action", "apply_certificate"))
            .and(query_param("certificate_id", "c1"))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    async fn mount_topology(manager: &MockServer, nodes: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/cluster/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": nodes })))
            .mount(manager)
            .await;
    }

    fn addr(server: &MockServer) -> String {
        server.address().to_string()
    }

    #[test]
    fn test_plan_requires_both_picks() {
        assert!(RolloutPlan::new(None, Some(TargetSelector::Cluster))
            .unwrap_err()
            .is_aborted());
        assert!(RolloutPlan::new(Some("c1".into()), None)
            .unwrap_err()
            .is_aborted());
    }

    #[test]
    fn test_plan_rejects_unaddressable_single_node() {
        let err = RolloutPlan::new(
            Some("c1".into()),
            Some(TargetSelector::SingleNode(Node::default())),
        )
        .unwrap_err();
        assert!(matches!(err, TrustError::InvalidTarget(_)));
    }

    #[test]
    fn test_confirmation_prompt() {
        let plan = RolloutPlan::new(
            Some("c1".into()),
            Some(TargetSelector::SingleNode(Node::with_ip("10.0.0.2"))),
        )
        .unwrap();
        assert_eq!(plan.confirmation_prompt(), "Apply certificate c1 to node 10.0.0.2?");
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        let manager = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": []})))
            .expect(0)
            .mount(&manager)
            .await;
        let node = node_server(ResponseTemplate::new(200), 0).await;

        let client = client_for(&manager);
        let orchestrator = Orchestrator::new(&client);

        for selector in [
            TargetSelector::Cluster,
            TargetSelector::SingleNode(Node::with_fqdn(addr(&node))),
            TargetSelector::AllNodes,
        ] {
            let plan = RolloutPlan::new(Some("c1".into()), Some(selector)).unwrap();
            let err = orchestrator
                .execute(&plan, Confirmation::Declined)
                .await
                .unwrap_err();
            assert!(err.is_aborted());
        }
    }

    #[tokio::test]
    async fn test_cluster_rollout() {
        let manager = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cluster/api-certificate"))
            .and(query_param("action", "set_cluster_certificate"))
            .and(query_param("certificate_id", "c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"certificate_id": "c1"})))
            .expect(2)
            .mount(&manager)
            .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::Cluster)).unwrap();
        let orchestrator = Orchestrator::new(&client);

        // Re-applying the same certificate is just another successful call.
        for _ in 0..2 {
            let summary = orchestrator.execute(&plan, Confirmation::Approved).await.unwrap();
            assert_eq!(summary.len(), 1);
            assert!(summary.all_succeeded());
        }
    }

    #[tokio::test]
    async fn test_cluster_error_code_is_failure() {
        let manager = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cluster/api-certificate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 21005,
                "error_message": "certificate is not valid for the VIP"
            })))
            .mount(&manager)
            .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::Cluster)).unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        assert_eq!(summary.len(), 1);
        match &summary.results()[0].outcome {
            AssignmentOutcome::Failure(detail) => assert!(detail.contains("21005")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_node_goes_to_node_address() {
        let manager = MockServer::start().await;
        let node = node_server(ResponseTemplate::new(200), 1).await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(
            Some("c1".into()),
            Some(TargetSelector::SingleNode(Node::with_ip(addr(&node)))),
        )
        .unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        assert_eq!(summary.results()[0].target_label, addr(&node));
        assert!(summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_sweep_continues_past_failures_in_order() {
        let manager = MockServer::start().await;
        let ok_a = node_server(ResponseTemplate::new(200), 1).await;
        let rejected = node_server(
            ResponseTemplate::new(200).set_body_json(json!({"error_code": 1, "error_message": "bad"})),
            1,
        )
        .await;
        let ok_b = node_server(ResponseTemplate::new(200), 1).await;
        mount_topology(
            &manager,
            json!([
                {"fqdn": addr(&ok_a)},
                {"fqdn": addr(&rejected)},
                {"ip_address": addr(&ok_b)}
            ]),
        )
        .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        let labels: Vec<_> = summary.iter().map(|r| r.target_label.clone()).collect();
        assert_eq!(labels, [addr(&ok_a), addr(&rejected), addr(&ok_b)]);
        let ok: Vec<_> = summary.iter().map(|r| r.outcome.is_success()).collect();
        assert_eq!(ok, [true, false, true]);
    }

    #[tokio::test]
    async fn test_sweep_rejects_unaddressable_node_and_continues() {
        let manager = MockServer::start().await;
        let first = node_server(ResponseTemplate::new(200), 1).await;
        let second = node_server(ResponseTemplate::new(200), 1).await;
        mount_topology(
            &manager,
            json!([{"fqdn": addr(&first)}, {"ip_address": addr(&second)}, {}]),
        )
        .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        assert_eq!(summary.len(), 3);
        assert!(summary.results()[0].outcome.is_success());
        assert!(summary.results()[1].outcome.is_success());
        assert_eq!(summary.results()[2].target_label, "node #2");
        match &summary.results()[2].outcome {
            AssignmentOutcome::Failure(detail) => assert!(detail.contains("invalid target")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sweep_records_transport_failure() {
        let manager = MockServer::start().await;
        let reachable = node_server(ResponseTemplate::new(200), 1).await;
        mount_topology(
            &manager,
            json!([{"ip_address": "127.0.0.1:1"}, {"fqdn": addr(&reachable)}]),
        )
        .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        assert_eq!(summary.failures(), 1);
        assert!(!summary.results()[0].outcome.is_success());
        assert!(summary.results()[1].outcome.is_success());
    }

    #[tokio::test]
    async fn test_topology_failure_is_fatal() {
        let manager = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cluster/nodes"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error_message": "db"})))
            .mount(&manager)
            .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let err = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, TrustError::Api { code: 500, .. }));
    }

    #[tokio::test]
    async fn test_empty_cluster_yields_empty_summary() {
        let manager = MockServer::start().await;
        mount_topology(&manager, json!([])).await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_unbounded_concurrency_is_clamped() {
        let manager = MockServer::start().await;
        let first = node_server(ResponseTemplate::new(200), 1).await;
        let second = node_server(ResponseTemplate::new(200), 1).await;
        mount_topology(
            &manager,
            json!([{"fqdn": addr(&first)}, {"fqdn": addr(&second)}]),
        )
        .await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .concurrency(usize::MAX)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        assert_eq!(summary.len(), 2);
        assert!(summary.all_succeeded());
        assert_eq!(Orchestrator::new(&client).concurrency(0).concurrency, 1);
        assert_eq!(
            Orchestrator::new(&client).concurrency(usize::MAX).concurrency,
            Semaphore::MAX_PERMITS
        );
    }

    #[tokio::test]
    async fn test_parallel_sweep_keeps_fetch_order() {
        let manager = MockServer::start().await;
        let mut servers = Vec::new();
        for i in 0..5u64 {
            // Earlier nodes answer slower so completion order differs from fetch order.
            let delay = std::time::Duration::from_millis(200 - i * 40);
            let response = if i == 3 {
                ResponseTemplate::new(500).set_delay(delay)
            } else {
                ResponseTemplate::new(200).set_delay(delay)
            };
            servers.push(node_server(response, 1).await);
        }
        let nodes: Vec<_> = servers.iter().map(|s| json!({"fqdn": addr(s)})).collect();
        mount_topology(&manager, json!(nodes)).await;

        let client = client_for(&manager);
        let plan = RolloutPlan::new(Some("c1".into()), Some(TargetSelector::AllNodes)).unwrap();
        let summary = Orchestrator::new(&client)
            .concurrency(4)
            .execute(&plan, Confirmation::Approved)
            .await
            .unwrap();

        let labels: Vec<_> = summary.iter().map(|r| r.target_label.clone()).collect();
        let expected: Vec<_> = servers.iter().map(addr).collect();
        assert_eq!(labels, expected);
        let ok: Vec<_> = summary.iter().map(|r| r.outcome.is_success()).collect();
        assert_eq!(ok, [true, true, true, false, true]);
    }
}
