use std::{env, io};

use log::{info, warn};
use tokio::{signal, task};

use solver::{HyperParam, Interrupt, SolverBuilder};

fn run(hyper_param: HyperParam, interrupt: Interrupt) -> solver::Result<()> {
    let mut solver = SolverBuilder::new().interrupt(interrupt).build(hyper_param)?;
    info!("assembled {:?} pipeline: {:?}", solver.mode(), solver.dims());

    let report = solver.start_work();
    let teardown = solver.finalize();

    info!("finished: {:?}", report?);
    teardown
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let path = env::args().nth(1).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "usage: solver <config.json>")
    })?;
    let hyper_param = HyperParam::from_file(&path)?;

    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    let mut work = task::spawn_blocking(move || run(hyper_param, handle));

    let ret = tokio::select! {
        ret = &mut work => ret,
        _ = signal::ctrl_c() => {
            warn!("received SIGINT, stopping at the next batch");
            interrupt.trigger();
            work.await
        }
    };

    ret.map_err(io::Error::other)??;
    Ok(())
}
