//! Rule applicability: does a rule's body pattern hold for a statement?
//!
//! Instantiating the body with `?e0 := subject` and `?e(n) := object` and
//! asking whether the chain is satisfiable in the base graph is a pure
//! existence query; forward chaining with a single non-recursive rule is
//! behaviorally equivalent and much heavier. Nothing here mutates the
//! graph.

use crate::graph::Triple;
use crate::graph::index::KnowledgeGraph;
use crate::term::TermId;

use super::Rule;

/// Whether `rule` applies to `statement` over the base graph.
///
/// Rejects immediately when the statement's predicate differs from the
/// rule's head predicate; otherwise tests whether the instantiated body
/// chain is satisfiable with the statement's subject and object bound at
/// the ends.
pub fn applies(rule: &Rule, graph: &KnowledgeGraph, statement: &Triple) -> bool {
    if statement.predicate != rule.head.predicate {
        return false;
    }
    let predicates: Vec<_> = rule.body.iter().map(|c| c.predicate).collect();
    chain_satisfiable(graph, statement.subject, statement.object, &predicates)
}

fn chain_satisfiable(graph: &KnowledgeGraph, node: TermId, goal: TermId, chain: &[TermId]) -> bool {
    match chain {
        [] => node == goal,
        [last] => graph.has_triple(&Triple::new(node, *last, goal)),
        [first, rest @ ..] => graph
            .objects_of(node, *first)
            .into_iter()
            .any(|next| chain_satisfiable(graph, next, goal, rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Polarity;
    use crate::term::TermId;

    fn t(id: u64) -> TermId {
        TermId::new(id).unwrap()
    }

    /// 1 --p--> 2 --q--> 3
    fn chain_graph() -> KnowledgeGraph {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(2), t(11), t(3)));
        kg
    }

    #[test]
    fn satisfiable_chain_applies() {
        let kg = chain_graph();
        let rule = Rule::from_chain(&[t(10), t(11)], t(20), Polarity::Positive);
        assert!(applies(&rule, &kg, &Triple::new(t(1), t(20), t(3))));
    }

    #[test]
    fn head_predicate_mismatch_is_rejected_fast() {
        let kg = chain_graph();
        let rule = Rule::from_chain(&[t(10), t(11)], t(20), Polarity::Positive);
        // body would be satisfiable, but the head predicate differs
        assert!(!applies(&rule, &kg, &Triple::new(t(1), t(21), t(3))));
    }

    #[test]
    fn wrong_endpoints_do_not_apply() {
        let kg = chain_graph();
        let rule = Rule::from_chain(&[t(10), t(11)], t(20), Polarity::Positive);
        assert!(!applies(&rule, &kg, &Triple::new(t(2), t(20), t(3))));
        assert!(!applies(&rule, &kg, &Triple::new(t(1), t(20), t(2))));
    }

    #[test]
    fn wrong_predicate_order_does_not_apply() {
        let kg = chain_graph();
        let rule = Rule::from_chain(&[t(11), t(10)], t(20), Polarity::Positive);
        assert!(!applies(&rule, &kg, &Triple::new(t(1), t(20), t(3))));
    }

    #[test]
    fn branching_graph_explores_all_bindings() {
        // 1 --p--> 2 (dead end), 1 --p--> 4 --q--> 3
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(1), t(10), t(4)));
        kg.insert_triple(&Triple::new(t(4), t(11), t(3)));

        let rule = Rule::from_chain(&[t(10), t(11)], t(20), Polarity::Positive);
        assert!(applies(&rule, &kg, &Triple::new(t(1), t(20), t(3))));
    }

    #[test]
    fn length_one_body_is_a_direct_edge_test() {
        let kg = chain_graph();
        let rule = Rule::from_chain(&[t(10)], t(20), Polarity::Negative);
        assert!(applies(&rule, &kg, &Triple::new(t(1), t(20), t(2))));
        assert!(!applies(&rule, &kg, &Triple::new(t(1), t(20), t(3))));
    }
}
