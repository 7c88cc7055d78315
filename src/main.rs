use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use clap::Parser;

use amatsim::config::SimConfig;
use amatsim::io::get_reader;
use amatsim::report;
use amatsim::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative cache timing simulator"))]
struct Args {
    config: String,
    trace: String,

    /// Print the result as JSON instead of the text report
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let start = Instant::now();
    let args = Args::parse();
    let config_file = File::open(&args.config)
        .map_err(|e| format!("Couldn't open the config file at path {}: {e}", args.config))?;
    let config: SimConfig = serde_json::from_reader(BufReader::new(config_file))
        .map_err(|e| format!("Couldn't parse the config file: {e}"))?;
    let mut simulator = Simulator::new(&config).map_err(|e| e.to_string())?;
    let trace_file = File::open(&args.trace)
        .map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace_reader = get_reader(trace_file).map_err(|e| e.to_string())?;
    simulator.simulate(trace_reader).map_err(|e| e.to_string())?;
    simulator.flush();
    if args.json {
        let result = simulator.statistics().result(&config);
        println!(
            "{}",
            serde_json::to_string_pretty(&result)
                .map_err(|e| format!("Couldn't serialise the output {e}"))?
        );
    } else {
        print!("{}", report::render(&config, simulator.statistics()));
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.execution_time();
        let total_time = end - start;
        println!(
            "Simulation time: {}s",
            simulation_time.as_nanos() as f64 / 1e9
        );
        println!(
            "Total execution time (includes initial parsing, configuration, and output): {}s",
            total_time.as_nanos() as f64 / 1e9
        )
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        println!("Skipped trace lines: {}", simulator.skipped_lines());
        println!(
            "Uninitialised cache lines: {}",
            simulator.uninitialised_lines()
        );
    }
    Ok(())
}
