use std::error::Error;
use std::path::PathBuf;

use elastic::*;
use elastic_model::{HandshakeModel, ITEMS};
use elastic_std::{HandshakeRegister, Pipeline, RegisterConfig};
use log::info;
use stateright::report::WriteReporter;
use stateright::{Checker, Model};

/// Generates Verilog for the handshake register.
fn gen(config: RegisterConfig, dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let register = HandshakeRegister::new(config)?;
    let mut package = Package::default();
    package.add(register.gen_vir("handshake_register"))?;
    package.gen_vir(&dir)?;
    println!("Wrote {} module(s) to {}.", package.module_names().count(), dir.display());
    Ok(())
}

/// Streams a counter through `machine` while the consumer stalls every third tick.
fn demo<M>(machine: M, capacity: usize, data_width: usize, ticks: u64) -> Result<(), Box<dyn Error>>
where M: Fsm<I = VrChannel<Bits>, O = VrChannel<Bits>> {
    info!("demo: {} for {} ticks", machine.module_name(), ticks);
    let mut sim = Simulator::new(machine);
    let mut checker = ProtocolChecker::new(capacity);
    let mut next = 0;

    for tick in 0..ticks {
        let out_ready = tick % 3 != 2;
        let cycle = sim.tick(Valid::valid(Bits::from_u64(data_width, next)), Ready::new(out_ready));
        checker.observe(&cycle)?;
        if cycle.accepted().is_some() {
            next += 1;
        }
        if let Some(data) = cycle.delivered() {
            println!("cycle {:>4}: delivered {}", cycle.index, data);
        }
    }

    let scoreboard = checker.scoreboard();
    println!(
        "{} ticks: {} accepted, {} delivered, {} in flight.",
        ticks,
        scoreboard.accepted(),
        scoreboard.delivered(),
        scoreboard.outstanding()
    );
    Ok(())
}

/// Model checks the handshake register.
fn check() -> Result<(), Box<dyn Error>> {
    println!("Model checking the handshake register with {} items.", ITEMS);
    HandshakeModel::new(ITEMS)?
        .checker()
        .threads(num_cpus::get())
        .spawn_bfs()
        .report(&mut WriteReporter::new(&mut std::io::stdout()));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    let width = args.opt_value_from_str("--width")?;
    let config = width.map_or_else(RegisterConfig::default, |width| RegisterConfig::default().with_data_width(width));

    match args.subcommand()?.as_deref() {
        Some("gen") | None => {
            let dir = args.opt_free_from_str()?.unwrap_or_else(|| PathBuf::from("./build"));
            gen(config, dir)
        }
        Some("demo") => {
            let depth = args.opt_value_from_str("--depth")?.unwrap_or(1);
            let ticks = args.opt_free_from_str()?.unwrap_or(16);
            if depth == 1 {
                demo(HandshakeRegister::new(config)?, 1, config.data_width, ticks)
            } else {
                demo(Pipeline::new(config, depth)?, depth, config.data_width, ticks)
            }
        }
        Some("check") => check(),
        _ => {
            println!("USAGE:");
            println!("  elastic-examples [--width N] gen [DIR]");
            println!("  elastic-examples [--width N] demo [--depth N] [TICKS]");
            println!("  elastic-examples check");
            Ok(())
        }
    }
}
