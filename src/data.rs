use serde::Deserialize;

use crate::problem::{self, Cost, Edge, Node, NodeIdx, Strategy, TimeIdx, TotalUsage, Usage};

#[derive(Debug, Deserialize)]
pub struct Data {
    pub problem: Problem,
}

#[derive(Debug, Deserialize)]
pub struct Problem {
    pub name: String,
    pub nodes: ProblemNodes,
    pub edges: ProblemEdges,
    #[serde(default)]
    pub usage_limit: Option<TotalUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ProblemNodes {
    pub intervals: Vec<[TimeIdx; 2]>,
    pub costs: Vec<Vec<Cost>>,
    pub usages: Vec<Vec<Usage>>,
}

#[derive(Debug, Deserialize)]
pub struct ProblemEdges {
    pub nodes: Vec<Vec<NodeIdx>>,
    pub costs: Vec<Vec<Cost>>,
}

impl TryFrom<Problem> for problem::Problem {
    type Error = anyhow::Error;

    fn try_from(data: Problem) -> anyhow::Result<Self> {
        let nodes = data.nodes;
        anyhow::ensure!(
            nodes.costs.len() == nodes.usages.len() && nodes.costs.len() == nodes.intervals.len(),
            "node arrays disagree: {} intervals, {} costs, {} usages",
            nodes.intervals.len(),
            nodes.costs.len(),
            nodes.usages.len()
        );
        let mut problem = problem::Problem::new(data.name);
        for (node_index, ((node_costs, node_usages), [start, end])) in nodes
            .costs
            .into_iter()
            .zip(nodes.usages)
            .zip(nodes.intervals)
            .enumerate()
        {
            anyhow::ensure!(
                node_costs.len() == node_usages.len(),
                "node {node_index} has {} costs but {} usages",
                node_costs.len(),
                node_usages.len()
            );
            let strategies = node_costs
                .into_iter()
                .zip(node_usages)
                .map(|(cost, usage)| Strategy { cost, usage })
                .collect();
            problem.nodes.push(Node::new((start, end), strategies))
        }

        let edges = data.edges;
        anyhow::ensure!(
            edges.nodes.len() == edges.costs.len(),
            "edge arrays disagree: {} node tuples, {} cost tables",
            edges.nodes.len(),
            edges.costs.len()
        );
        for (edge_nodes, edge_costs) in edges.nodes.into_iter().zip(edges.costs) {
            // edges carry no usage in this format
            let strategies = edge_costs
                .into_iter()
                .map(|cost| Strategy { cost, usage: 0 })
                .collect();
            problem.edges.push(Edge::new(edge_nodes, strategies))
        }
        problem.usage_limit = data.usage_limit;
        Ok(problem)
    }
}

pub fn parse_problem(bytes: &[u8]) -> anyhow::Result<problem::Problem> {
    serde_json::from_slice::<Data>(bytes)?.problem.try_into()
}

pub fn parse_solution(bytes: &[u8]) -> anyhow::Result<problem::Solution> {
    Ok(serde_json::from_slice(bytes)?)
}
