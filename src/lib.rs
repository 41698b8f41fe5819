//! Scoring of strategy assignments for interval-scheduled nodes with joint
//! edge costs and an optional per-time-step usage limit.

pub mod data;
pub mod eval;
pub mod problem;

pub use eval::{edge_strategy_index, evaluate, ErrorKind, EvalError};
pub use problem::{Edge, Node, Problem, ProblemError, Solution, Strategy};
