use thiserror::Error;
use tracing::debug;

use crate::problem::{Edge, NodeIdx, Problem, StrategyIdx, TimeIdx, TotalCost, TotalUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    OutOfRange,
    ResourceExhausted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("incorrect solution size: expected {expected}, got {actual}")]
    InvalidInput { expected: usize, actual: usize },
    #[error("invalid strategy index {index} for node {node} with {num_strategies} strategies")]
    OutOfRange {
        node: NodeIdx,
        index: StrategyIdx,
        num_strategies: usize,
    },
    #[error("usage limit exceeded at time {time}: {usage} > {limit}")]
    ResourceExhausted {
        time: TimeIdx,
        usage: TotalUsage,
        limit: TotalUsage,
    },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
        }
    }
}

/// Position of the joint choice in `edge.strategies`.
///
/// `choices[i]` is the chosen strategy of node `i`. The first node of the
/// edge carries the highest place value.
pub fn edge_strategy_index(problem: &Problem, edge: &Edge, choices: &[usize]) -> usize {
    edge.nodes.iter().fold(0, |index, &node_index| {
        index * problem.nodes[node_index].num_strategies() + choices[node_index]
    })
}

/// Total cost of `solution`, checking the usage limit at every time step.
///
/// Errors are reported in a fixed order: solution size, then the first node
/// (in index order) whose choice is out of range, then the first time step
/// over the limit. Arithmetic is `i64` without overflow detection.
///
/// # Panics
///
/// Edges are not re-validated. An edge that references a missing node or
/// whose table is smaller than the product of its nodes' strategy counts
/// panics on lookup; run [`Problem::validate`] first on untrusted input.
pub fn evaluate(problem: &Problem, solution: &[StrategyIdx]) -> Result<TotalCost, EvalError> {
    if solution.len() != problem.nodes.len() {
        debug!(
            expected = problem.nodes.len(),
            actual = solution.len(),
            "rejecting solution of wrong size"
        );
        return Err(EvalError::InvalidInput {
            expected: problem.nodes.len(),
            actual: solution.len(),
        });
    }
    let max_time = problem.max_time();
    debug!(
        nodes = problem.nodes.len(),
        edges = problem.edges.len(),
        max_time,
        "evaluating {}",
        problem.name
    );

    let mut cost: TotalCost = 0;
    let mut total_usages = vec![0 as TotalUsage; max_time as usize];
    let mut choices = Vec::with_capacity(solution.len());
    for (node_index, (node, &strategy_index)) in
        problem.nodes.iter().zip(solution).enumerate()
    {
        let Some(choice) = usize::try_from(strategy_index)
            .ok()
            .filter(|&choice| choice < node.num_strategies())
        else {
            debug!(node = node_index, index = strategy_index, "strategy out of range");
            return Err(EvalError::OutOfRange {
                node: node_index,
                index: strategy_index,
                num_strategies: node.num_strategies(),
            });
        };
        let strategy = node.strategies[choice];
        cost += strategy.cost;
        let (start, end) = node.interval;
        for total_usage in total_usages
            .iter_mut()
            .take(end as usize)
            .skip(start as usize)
        {
            *total_usage += strategy.usage
        }
        choices.push(choice)
    }

    for edge in &problem.edges {
        cost += edge.strategies[edge_strategy_index(problem, edge, &choices)].cost
    }

    if let Some(limit) = problem.usage_limit {
        if let Some((time, &usage)) = total_usages
            .iter()
            .enumerate()
            .find(|&(_, &usage)| usage > limit)
        {
            debug!(time, usage, limit, "usage limit exceeded");
            return Err(EvalError::ResourceExhausted {
                time: time as TimeIdx,
                usage,
                limit,
            });
        }
    }
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Node, Strategy};

    fn single_node_problem() -> Problem {
        let mut problem = Problem::new("single");
        problem.nodes.push(Node::new(
            (0, 1),
            vec![
                Strategy { cost: 1, usage: 1 },
                Strategy { cost: 10, usage: 1 },
            ],
        ));
        problem
    }

    fn uniform(count: usize, cost: i64) -> Vec<Strategy> {
        vec![Strategy { cost, usage: 0 }; count]
    }

    #[test]
    fn single_node_scenario() {
        let problem = single_node_problem();
        assert_eq!(evaluate(&problem, &[0]), Ok(1));
        assert_eq!(evaluate(&problem, &[1]), Ok(10));
        assert_eq!(
            evaluate(&problem, &[2]).map_err(|err| err.kind()),
            Err(ErrorKind::OutOfRange)
        );
    }

    #[test]
    fn zero_limit_is_exhausted() {
        let mut problem = single_node_problem();
        problem.usage_limit = Some(0);
        assert_eq!(
            evaluate(&problem, &[0]),
            Err(EvalError::ResourceExhausted {
                time: 0,
                usage: 1,
                limit: 0
            })
        );
    }

    #[test]
    fn limit_equal_to_usage_passes() {
        let mut problem = single_node_problem();
        problem.usage_limit = Some(1);
        assert_eq!(evaluate(&problem, &[1]), Ok(10));
    }

    #[test]
    fn wrong_size_checked_before_indices() {
        let problem = single_node_problem();
        assert_eq!(
            evaluate(&problem, &[]),
            Err(EvalError::InvalidInput {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            evaluate(&problem, &[5, 5]).map_err(|err| err.kind()),
            Err(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn negative_index_is_out_of_range() {
        let problem = single_node_problem();
        assert_eq!(
            evaluate(&problem, &[-1]),
            Err(EvalError::OutOfRange {
                node: 0,
                index: -1,
                num_strategies: 2
            })
        );
    }

    #[test]
    fn first_bad_node_reported() {
        let mut problem = single_node_problem();
        problem.nodes.push(problem.nodes[0].clone());
        problem.nodes.push(problem.nodes[0].clone());
        let err = evaluate(&problem, &[0, 3, 4]).unwrap_err();
        assert_eq!(
            err,
            EvalError::OutOfRange {
                node: 1,
                index: 3,
                num_strategies: 2
            }
        );
    }

    #[test]
    fn out_of_range_wins_over_usage_limit() {
        let mut problem = single_node_problem();
        problem.usage_limit = Some(0);
        problem.nodes.push(problem.nodes[0].clone());
        assert_eq!(
            evaluate(&problem, &[0, 9]).map_err(|err| err.kind()),
            Err(ErrorKind::OutOfRange)
        );
    }

    #[test]
    fn mixed_radix_index() {
        let mut problem = Problem::new("radix");
        problem.nodes.push(Node::new((0, 0), uniform(3, 0)));
        problem.nodes.push(Node::new((0, 0), uniform(4, 0)));
        let edge = Edge::new(vec![0, 1], uniform(12, 0));
        assert_eq!(edge_strategy_index(&problem, &edge, &[2, 1]), 9);

        let reversed = Edge::new(vec![1, 0], uniform(12, 0));
        assert_eq!(edge_strategy_index(&problem, &reversed, &[2, 1]), 5);
    }

    #[test]
    fn edge_cost_selected_by_combination() {
        let mut problem = Problem::new("edge");
        problem.nodes.push(Node::new((0, 1), uniform(3, 0)));
        problem.nodes.push(Node::new((0, 1), uniform(4, 0)));
        let table = (0..12)
            .map(|cost| Strategy { cost: cost * 100, usage: 0 })
            .collect();
        problem.edges.push(Edge::new(vec![0, 1], table));
        assert_eq!(evaluate(&problem, &[2, 1]), Ok(900));
        assert_eq!(evaluate(&problem, &[0, 0]), Ok(0));
        assert_eq!(evaluate(&problem, &[2, 3]), Ok(1100));
    }

    #[test]
    fn single_node_edge() {
        let mut problem = single_node_problem();
        problem.edges.push(Edge::new(
            vec![0],
            vec![
                Strategy { cost: -5, usage: 0 },
                Strategy { cost: 7, usage: 0 },
            ],
        ));
        assert_eq!(evaluate(&problem, &[0]), Ok(-4));
        assert_eq!(evaluate(&problem, &[1]), Ok(17));
    }

    #[test]
    fn usage_accumulates_over_interval() {
        let mut problem = Problem::new("interval");
        problem.nodes.push(Node::new(
            (1, 4),
            vec![Strategy { cost: 0, usage: 5 }],
        ));
        problem.nodes.push(Node::new(
            (0, 6),
            vec![Strategy { cost: 0, usage: 1 }],
        ));
        problem.usage_limit = Some(6);
        assert_eq!(evaluate(&problem, &[0, 0]), Ok(0));

        problem.usage_limit = Some(5);
        assert_eq!(
            evaluate(&problem, &[0, 0]),
            Err(EvalError::ResourceExhausted {
                time: 1,
                usage: 6,
                limit: 5
            })
        );
    }

    #[test]
    fn empty_interval_still_costs() {
        let mut problem = Problem::new("empty-interval");
        problem.nodes.push(Node::new(
            (3, 3),
            vec![Strategy { cost: 8, usage: 100 }],
        ));
        problem.usage_limit = Some(0);
        assert_eq!(evaluate(&problem, &[0]), Ok(8));
    }

    #[test]
    fn empty_problem() {
        let problem = Problem::new("empty");
        assert_eq!(evaluate(&problem, &[]), Ok(0));
    }

    #[test]
    fn error_messages() {
        let err = EvalError::InvalidInput {
            expected: 2,
            actual: 1,
        };
        assert!(err.to_string().starts_with("incorrect solution size"));
        let err = EvalError::OutOfRange {
            node: 0,
            index: 2,
            num_strategies: 2,
        };
        assert!(err.to_string().starts_with("invalid strategy index"));
        let err = EvalError::ResourceExhausted {
            time: 0,
            usage: 1,
            limit: 0,
        };
        assert!(err.to_string().starts_with("usage limit exceeded"));
    }
}
