use std::{error::Error, fs::File, io::BufWriter, path::Path};

use fastrand::Rng;
use openpso::prelude::*;
use openpso::test_functions::Rastrigin;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tracker = TrackingSwarmObserver::build();
    let config = PSOConfig::new(2)
        .with_topology(Ring::new(30))
        .with_group_best(GroupBest::Local)
        .with_bounds(-5.12, 5.12)
        .with_max_evals(30_000)
        .with_criteria(1e-8);
    let mut pso = PSO::new(config, Rng::with_seed(0));
    let summary = pso
        .process(
            &Rastrigin,
            &mut (),
            Observers::empty()
                .with_observer(tracker.clone())
                .with_observer(DebugObserver),
        )?
        .with_parameter_names(["X", "Y"]);
    println!("{}", summary);

    // Export the swarm history to a Python .pkl file to visualize via matplotlib
    let mut writer = BufWriter::new(File::create(Path::new("data.pkl"))?);
    serde_pickle::to_writer(&mut writer, &*tracker.read(), Default::default())?;
    Ok(())
}
