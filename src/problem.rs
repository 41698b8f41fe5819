use thiserror::Error;

pub type Cost = i64;
pub type Usage = i64;
pub type TotalCost = i64;
pub type TotalUsage = i64;
pub type TimeIdx = u64;
pub type NodeIdx = usize;
pub type StrategyIdx = i64;

/// Half-open `[start, end)` range of time steps.
pub type Interval = (TimeIdx, TimeIdx);

/// One chosen strategy index per node, indexed like `Problem::nodes`.
pub type Solution = Vec<StrategyIdx>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub cost: Cost,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub interval: Interval,
    pub strategies: Vec<Strategy>,
}

/// Joint cost table over an ordered tuple of nodes.
///
/// `strategies` is laid out in mixed-radix order of the chosen strategy
/// indices of `nodes`, first node most significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub nodes: Vec<NodeIdx>,
    pub strategies: Vec<Strategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub usage_limit: Option<TotalUsage>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProblemError {
    #[error("node {node} has no strategies")]
    EmptyStrategies { node: NodeIdx },
    #[error("node {node} has reversed interval [{start}, {end})")]
    ReversedInterval {
        node: NodeIdx,
        start: TimeIdx,
        end: TimeIdx,
    },
    #[error("edge {edge} has no nodes")]
    EmptyEdge { edge: usize },
    #[error("edge {edge} references node {node} but there are {num_nodes} nodes")]
    UnknownNode {
        edge: usize,
        node: NodeIdx,
        num_nodes: usize,
    },
    #[error("edge {edge} has {actual} strategies, expected {expected}")]
    EdgeTableSize {
        edge: usize,
        expected: usize,
        actual: usize,
    },
}

impl Node {
    pub fn new(interval: Interval, strategies: Vec<Strategy>) -> Self {
        Self {
            interval,
            strategies,
        }
    }

    pub fn num_strategies(&self) -> usize {
        self.strategies.len()
    }
}

impl Edge {
    pub fn new(nodes: Vec<NodeIdx>, strategies: Vec<Strategy>) -> Self {
        Self { nodes, strategies }
    }
}

impl Problem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// One past the last time step any node occupies, `0` without nodes.
    pub fn max_time(&self) -> TimeIdx {
        self.nodes
            .iter()
            .map(|node| node.interval.1)
            .max()
            .unwrap_or(0)
    }

    pub fn min_time(&self) -> Option<TimeIdx> {
        self.nodes.iter().map(|node| node.interval.0).min()
    }

    pub fn num_strategies(&self) -> usize {
        self.nodes.iter().map(Node::num_strategies).sum()
    }

    pub fn num_connections(&self) -> usize {
        self.edges.iter().map(|edge| edge.strategies.len()).sum()
    }

    /// Structural checks `evaluate` takes for granted.
    ///
    /// Stops at the first violation, nodes before edges.
    pub fn validate(&self) -> Result<(), ProblemError> {
        for (node_index, node) in self.nodes.iter().enumerate() {
            if node.strategies.is_empty() {
                return Err(ProblemError::EmptyStrategies { node: node_index });
            }
            let (start, end) = node.interval;
            if start > end {
                return Err(ProblemError::ReversedInterval {
                    node: node_index,
                    start,
                    end,
                });
            }
        }
        for (edge_index, edge) in self.edges.iter().enumerate() {
            if edge.nodes.is_empty() {
                return Err(ProblemError::EmptyEdge { edge: edge_index });
            }
            let mut expected = 1usize;
            for &node in &edge.nodes {
                let Some(node_ref) = self.nodes.get(node) else {
                    return Err(ProblemError::UnknownNode {
                        edge: edge_index,
                        node,
                        num_nodes: self.nodes.len(),
                    });
                };
                expected = expected.saturating_mul(node_ref.num_strategies())
            }
            if edge.strategies.len() != expected {
                return Err(ProblemError::EdgeTableSize {
                    edge: edge_index,
                    expected,
                    actual: edge.strategies.len(),
                });
            }
        }
        Ok(())
    }
}
