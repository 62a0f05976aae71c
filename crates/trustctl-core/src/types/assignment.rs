use super::node::Node;
use serde::{Deserialize, Serialize};

/// Operator's choice of where a certificate should go, before topology is fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum TargetSelector {
    /// The cluster VIP
    Cluster,
    /// One node's local HTTP service
    SingleNode(Node),
    /// Every node in a freshly fetched topology
    AllNodes,
}

/// Concrete rollout target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "nodes", rename_all = "snake_case")]
pub enum AssignmentTarget {
    /// The cluster VIP
    Cluster,
    /// One node
    SingleNode(Node),
    /// Nodes in fetch order
    AllNodes(Vec<Node>),
}

/// Explicit answer to a mutating action's confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Operator answered yes
    Approved,
    /// Operator answered anything else
    Declined,
}

impl Confirmation {
    /// Returns true if the action may proceed
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<bool> for Confirmation {
    fn from(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Declined
        }
    }
}

/// Result of an operator pick from a numbered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// An entry was picked
    Chosen(T),
    /// Operator chose to go back
    Back,
}

impl<T> Selection<T> {
    /// Convert to an `Option`, mapping `Back` to `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Chosen(v) => Some(v),
            Self::Back => None,
        }
    }

    /// Map the chosen value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Selection<U> {
        match self {
            Self::Chosen(v) => Selection::Chosen(f(v)),
            Self::Back => Selection::Back,
        }
    }
}

/// Per-target outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// Manager accepted the assignment
    Success,
    /// Assignment failed; transport error, API error or invalid target
    Failure(String),
}

impl AssignmentOutcome {
    /// Returns true on success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for AssignmentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failure(detail) => write!(f, "Failed: {detail}"),
        }
    }
}

/// Outcome for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// FQDN, IP, or fallback label of the target
    pub target_label: String,

    /// What happened
    #[serde(flatten)]
    pub outcome: AssignmentOutcome,
}

impl AssignmentResult {
    /// Successful result
    #[must_use]
    pub fn success(target_label: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            outcome: AssignmentOutcome::Success,
        }
    }

    /// Failed result
    #[must_use]
    pub fn failure(target_label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            outcome: AssignmentOutcome::Failure(detail.into()),
        }
    }
}

/// Ordered per-target outcomes of one rollout; order matches target enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolloutSummary {
    results: Vec<AssignmentResult>,
}

impl RolloutSummary {
    /// Build from results already in target order
    #[must_use]
    pub const fn new(results: Vec<AssignmentResult>) -> Self {
        Self { results }
    }

    /// Single-target summary
    #[must_use]
    pub fn single(result: AssignmentResult) -> Self {
        Self {
            results: vec![result],
        }
    }

    /// Number of targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no target was attempted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate results in target order
    pub fn iter(&self) -> std::slice::Iter<'_, AssignmentResult> {
        self.results.iter()
    }

    /// Results as a slice
    #[must_use]
    pub fn results(&self) -> &[AssignmentResult] {
        &self.results
    }

    /// Count of successful targets
    #[must_use]
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Count of failed targets
    #[must_use]
    pub fn failures(&self) -> usize {
        self.len() - self.successes()
    }

    /// Returns true if every target succeeded
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }
}

impl<'a> IntoIterator for &'a RolloutSummary {
    type Item = &'a AssignmentResult;
    type IntoIter = std::slice::Iter<'a, AssignmentResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Result of a server-side certificate validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Manager reported status "OK"
    Valid,
    /// Anything else, with the raw response or error
    Invalid(String),
}

impl ValidationOutcome {
    /// Returns true if the certificate validated
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = RolloutSummary::new(vec![
            AssignmentResult::success("n1"),
            AssignmentResult::failure("n2", "API error (500): boom"),
            AssignmentResult::success("n3"),
        ]);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.successes(), 2);
        assert_eq!(summary.failures(), 1);
        assert!(!summary.all_succeeded());
        let labels: Vec<_> = summary.iter().map(|r| r.target_label.as_str()).collect();
        assert_eq!(labels, ["n1", "n2", "n3"]);
    }

    #[test]
    fn test_summary_serializes_as_list() {
        let summary = RolloutSummary::new(vec![
            AssignmentResult::success("n1"),
            AssignmentResult::failure("n2", "timeout"),
        ]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"target_label": "n1", "outcome": "success"},
                {"target_label": "n2", "outcome": "failure", "detail": "timeout"}
            ])
        );
    }

    #[test]
    fn test_confirmation_from_bool() {
        assert!(Confirmation::from(true).is_approved());
        assert!(!Confirmation::from(false).is_approved());
    }

    #[test]
    fn test_selection_helpers() {
        assert_eq!(Selection::Chosen(2).map(|i| i * 10).into_option(), Some(20));
        assert_eq!(Selection::<u8>::Back.into_option(), None);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(AssignmentOutcome::Success.to_string(), "Success");
        assert_eq!(
            AssignmentOutcome::Failure("x".into()).to_string(),
            "Failed: x"
        );
    }
}
