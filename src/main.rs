use std::{env::args, fs};

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evaluator::data;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let Some(data_file) = args().nth(1) else {
        println!("Specify data file [solution file]");
        return Ok(());
    };
    let problem = data::parse_problem(
        &fs::read(&data_file).with_context(|| format!("reading {data_file}"))?,
    )?;
    info!("Problem {}", problem.name);
    info!(
        "  {} nodes, {} total strategies, interval min {:?} max {}",
        problem.nodes.len(),
        problem.num_strategies(),
        problem.min_time(),
        problem.max_time(),
    );
    info!(
        "  {} edges, {} connections, usage limit {:?}",
        problem.edges.len(),
        problem.num_connections(),
        problem.usage_limit,
    );
    problem.validate()?;
    info!("Problem structure valid");

    let Some(solution_file) = args().nth(2) else {
        return Ok(());
    };
    let solution = data::parse_solution(
        &fs::read(&solution_file).with_context(|| format!("reading {solution_file}"))?,
    )?;
    info!("Evaluate solution {solution_file}");
    let cost = evaluator::evaluate(&problem, &solution)?;
    println!("{cost}");
    Ok(())
}
