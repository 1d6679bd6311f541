mod error;
mod io;
mod kernel;

use anyhow::Context;
use clap::Parser;

use io::{dump, loader, Cli};
use kernel::Driver;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse()
        .into_config()
        .context("invalid arguments")?;

    let pcb_path = match &config.working_copy {
        Some(copy) => loader::make_working_copy(&config.pcb_file, copy)
            .context("failed to copy the PCB file")?,
        None => config.pcb_file.clone(),
    };
    let pcbs = loader::load_pcbs(&pcb_path).context("failed to load the PCB file")?;

    let driver = Driver::new(&config.policies, config.weights, pcbs, config.timing);
    if config.dump_loads {
        dump::print_loads(&driver.get_loads());
    }

    let report = driver.start().context("simulation aborted")?;
    print!("{}", report);

    Ok(())
}
