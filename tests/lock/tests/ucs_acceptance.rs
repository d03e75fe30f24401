//! Acceptance scenarios for the search engine, run end to end through the
//! public crate APIs.

use lock_tests::graphs::acceptance_graph;
use ucs_harness::config::RunConfigV1;
use ucs_harness::demo::DEMO_GRAPH;
use ucs_harness::runner::run_text;
use ucs_kernel::carrier::compile::compile_graph;
use ucs_kernel::carrier::graph::WeightedGraphV1;
use ucs_search::search::{search, SearchOutcomeV1};
use ucs_search::trace::{StepStatusV1, TerminationReasonV1};

#[test]
fn acceptance_graph_a_to_h() {
    let result = search(&acceptance_graph(), "A", "H");
    assert_eq!(
        result.outcome,
        SearchOutcomeV1::Found {
            path: vec!["A".into(), "B".into(), "D".into(), "H".into()],
            cost: 5,
        }
    );
    assert_eq!(
        result.trace.metadata.termination,
        TerminationReasonV1::GoalReached { cost: 5 }
    );
    let last = result.trace.terminal_step().unwrap();
    assert_eq!(last.status, StepStatusV1::Found);
    assert_eq!(last.action, "Goal 'H' found with total cost 5.");
}

#[test]
fn demo_text_matches_built_graph() {
    assert_eq!(compile_graph(DEMO_GRAPH).unwrap(), acceptance_graph());
}

#[test]
fn disconnected_goal_is_unreachable() {
    let graph = WeightedGraphV1::new().with_edge("A", "B", 1);
    let result = search(&graph, "A", "Z");

    assert_eq!(result.outcome, SearchOutcomeV1::Unreachable);
    assert!(result.path().is_none());
    assert_eq!(result.cost(), 0);

    let last = result.trace.steps.last().unwrap();
    assert_eq!(last.status, StepStatusV1::Failed);
    assert!(last.frontier.is_empty());
    assert_eq!(last.action, "Frontier empty. Goal 'Z' is unreachable from 'A'.");
}

#[test]
fn start_equals_goal() {
    let result = search(&acceptance_graph(), "C", "C");
    assert_eq!(result.path().unwrap(), ["C"]);
    assert_eq!(result.cost(), 0);

    let statuses: Vec<StepStatusV1> = result.trace.steps.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        [
            StepStatusV1::Start,
            StepStatusV1::Expansion,
            StepStatusV1::Found
        ]
    );
}

#[test]
fn first_steps_of_acceptance_run() {
    let result = search(&acceptance_graph(), "A", "H");
    let steps = &result.trace.steps;

    assert_eq!(steps[0].action, "Start UCS from 'A' to 'H'.");
    assert_eq!(steps[0].frontier.len(), 1);
    assert_eq!(steps[0].min_costs.get("A"), Some(&0));

    assert_eq!(steps[1].status, StepStatusV1::Expansion);
    assert_eq!(steps[1].action, "Expand node 'A' with cost 0.");
    assert!(steps[1].frontier.is_empty());

    assert_eq!(steps[2].action, "Update path to 'B'. New cost: 1.");
    assert_eq!(steps[3].action, "Update path to 'C'. New cost: 5.");
    let queued: Vec<(u64, &str)> = steps[3]
        .frontier
        .iter()
        .map(|e| (e.cost, e.node.as_str()))
        .collect();
    assert_eq!(queued, [(1, "B"), (5, "C")]);
}

#[test]
fn snapshots_are_frozen() {
    let result = search(&acceptance_graph(), "A", "H");
    // The Start step saw only the root, even though the run went on to
    // push and pop many more entries.
    let start = &result.trace.steps[0];
    assert_eq!(start.frontier.len(), 1);
    assert_eq!(start.min_costs.len(), 1);
    let last = result.trace.steps.last().unwrap();
    assert!(last.min_costs.len() > 1);
}

#[test]
fn harness_defaults_pick_sorted_endpoints() {
    let out = run_text(DEMO_GRAPH, &RunConfigV1::default()).unwrap();
    assert_eq!(out.result.trace.start, "A");
    assert_eq!(out.result.trace.goal, "H");
    assert_eq!(out.result.cost(), 5);
}

#[test]
fn harness_accepts_absent_endpoints() {
    let config = RunConfigV1 {
        start: Some("Q".into()),
        goal: Some("H".into()),
    };
    let out = run_text(DEMO_GRAPH, &config).unwrap();
    assert!(!out.result.is_goal_reached());
    // Q is expanded once, has no edges, and the frontier empties.
    assert_eq!(out.result.trace.len(), 3);
}
