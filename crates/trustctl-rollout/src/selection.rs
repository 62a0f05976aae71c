//! Parsing operator picks from numbered lists.
//!
//! Indices refer to the as-fetched order. `b` means "go back". Anything
//! else that isn't an in-range index is an `InvalidUserSelection`, which
//! callers answer by prompting again.

use crate::inventory::Inventory;
use trustctl_core::{Node, Result, Selection, TrustError};

/// Input that backs out of a picker
pub const BACK: &str = "b";

/// Parse `input` as an index into a list of `len` entries
pub fn parse_selection(input: &str, len: usize) -> Result<Selection<usize>> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case(BACK) {
        return Ok(Selection::Back);
    }

    let invalid = || TrustError::InvalidUserSelection {
        input: trimmed.to_string(),
        len,
    };

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match trimmed.parse::<usize>() {
        Ok(index) if index < len => Ok(Selection::Chosen(index)),
        _ => Err(invalid()),
    }
}

/// Pick a certificate ID from the inventory
pub fn pick_certificate(inventory: &Inventory, input: &str) -> Result<Selection<String>> {
    Ok(parse_selection(input, inventory.len())?
        .map(|index| inventory.entries()[index].certificate.id.clone()))
}

/// Pick a node from a fetched topology
pub fn pick_node(nodes: &[Node], input: &str) -> Result<Selection<Node>> {
    Ok(parse_selection(input, nodes.len())?.map(|index| nodes[index].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trustctl_core::{Certificate, ExpiryPolicy};

    fn inventory(ids: &[&str]) -> Inventory {
        let certs = ids
            .iter()
            .map(|id| serde_json::from_value::<Certificate>(serde_json::json!({ "id": id })).unwrap())
            .collect();
        Inventory::evaluate(certs, None, &ExpiryPolicy::default(), Utc::now())
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("0", 3).unwrap(), Selection::Chosen(0));
        assert_eq!(parse_selection(" 2 ", 3).unwrap(), Selection::Chosen(2));
        assert_eq!(parse_selection("b", 3).unwrap(), Selection::Back);
        assert_eq!(parse_selection("B", 0).unwrap(), Selection::Back);
    }

    #[test]
    fn test_rejects_bad_input() {
        for input in ["3", "-1", "+1", "one", "", "1.0", "99999999999999999999999"] {
            let err = parse_selection(input, 3).unwrap_err();
            assert!(err.is_invalid_selection(), "{input:?} should be rejected");
        }
        assert!(parse_selection("0", 0).unwrap_err().is_invalid_selection());
    }

    #[test]
    fn test_pick_certificate_out_of_range() {
        let inv = inventory(&["c1", "c2", "c3"]);
        let err = pick_certificate(&inv, "5").unwrap_err();
        assert!(matches!(
            err,
            TrustError::InvalidUserSelection { ref input, len: 3 } if input == "5"
        ));
        // The caller can simply try again.
        assert_eq!(
            pick_certificate(&inv, "1").unwrap(),
            Selection::Chosen("c2".to_string())
        );
    }

    #[test]
    fn test_pick_node() {
        let nodes = vec![Node::with_fqdn("n1"), Node::with_ip("10.0.0.2")];
        assert_eq!(pick_node(&nodes, "1").unwrap(), Selection::Chosen(Node::with_ip("10.0.0.2")));
        assert_eq!(pick_node(&nodes, "b").unwrap(), Selection::Back);
    }
}
