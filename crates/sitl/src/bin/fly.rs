//! Scripted SITL flight through the three authority levels.
//!
//! Runs the control loop against the kinematic airframe model: a stretch
//! of manual flight, a stabilized climb with altitude hold, then an
//! autopilot leg toward a target heading. Prints one status line per
//! simulated second and the tick statistics at the end.
//!
//! Usage:
//!   cargo run -p skylark-sitl --bin fly -- [OPTIONS]
//!
//! Options:
//!   --seconds <N>        Duration of each leg in simulated seconds (default: 10)
//!   --target-heading <D> Autopilot target heading in degrees (default: 90)
//!   --quad               Fly the multirotor variant with the quad-X mixer

use std::env;
use std::process;

use skylark_core::mixer::MixerKind;
use skylark_core::parameters::{ControlLawVariant, ControlParams};
use skylark_sitl::{LoopRunner, StickScript};

struct Args {
    seconds: f32,
    target_heading_deg: f32,
    quad: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        seconds: 10.0,
        target_heading_deg: 90.0,
        quad: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--seconds" => {
                i += 1;
                args.seconds = parse_f32_arg(&raw, i, "seconds");
            }
            "--target-heading" => {
                i += 1;
                args.target_heading_deg = parse_f32_arg(&raw, i, "target-heading");
            }
            "--quad" => {
                args.quad = true;
            }
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    args
}

fn parse_f32_arg(raw: &[String], i: usize, name: &str) -> f32 {
    let Some(value) = raw.get(i) else {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    };
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        }
    }
}

fn usage() {
    eprintln!(
        "Usage: fly [--seconds N] [--target-heading DEG] [--quad]\n\
         Scripted flight: manual leg, stabilized leg, autopilot leg."
    );
}

fn run_leg(
    runner: &mut LoopRunner,
    name: &str,
    seconds: f32,
    script: &StickScript,
) -> Result<(), skylark_sitl::SimError> {
    println!("--- {name} ---");
    let whole_seconds = seconds as u32;
    for _ in 0..whole_seconds {
        runner.run_for(1.0, script)?;
        let airframe = runner.airframe();
        let state = runner.control().state();
        println!(
            "t={:>4}s mode={:?} roll={:+.2} pitch={:+.2} hdg={:5.1}deg h={:6.1}m",
            runner.ticks() as f32 * runner.control().dt(),
            state.flight_mode,
            airframe.roll,
            airframe.pitch,
            airframe.heading.to_degrees(),
            airframe.height,
        );
    }
    Ok(())
}

fn main() {
    let args = parse_args();

    let mut params = ControlParams::default();
    params.altitude_hold = true;
    if args.quad {
        params.variant = ControlLawVariant::Multirotor;
        params.mixer.kind = MixerKind::QuadX;
    }

    println!("=== skylark SITL ===");
    println!(
        "variant={:?} mixer={:?} legs of {}s, target heading {} deg",
        params.variant, params.mixer.kind, args.seconds, args.target_heading_deg
    );

    let mut runner = match LoopRunner::new(params) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };
    runner.desired_heading = args.target_heading_deg.to_radians();

    let manual = StickScript::default();
    let stabilized = StickScript {
        mode_switch_us: 1500,
        ..StickScript::default()
    };
    let autopilot = StickScript {
        mode_switch_us: 1100,
        motor_us: 1700,
        ..StickScript::default()
    };

    let result = run_leg(&mut runner, "manual", args.seconds, &manual)
        .and_then(|()| run_leg(&mut runner, "stabilized", args.seconds, &stabilized))
        .and_then(|()| run_leg(&mut runner, "autopilot", args.seconds, &autopilot));
    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }

    let stats = runner.control().stats();
    println!(
        "done: {} ticks, avg {}us, max {}us, overruns {}",
        stats.execution_count, stats.avg_execution_us, stats.max_execution_us, stats.overruns
    );
}
