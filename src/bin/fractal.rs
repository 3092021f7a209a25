extern crate clap;
extern crate env_logger;
extern crate fractals;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use fractals::{
    BifurcationEngine, FractalError, MandelbrotEngine, BIFURCATION_LOAD_LIMIT,
    MANDELBROT_LOAD_LIMIT,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_step(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(()),
        Ok(_) => Err("Step must be a positive number".to_string()),
        Err(_) => Err("Could not parse step".to_string()),
    }
}

const MANDELBROT: &str = "mandelbrot";
const BIFURCATION: &str = "bifurcation";
const OUTPUT: &str = "output";
const STEP: &str = "step";
const PRECISION: &str = "precision";
const MODE: &str = "mode";
const THREADS: &str = "threads";
const POINT: &str = "point";
const SEED: &str = "seed";
const FORCE: &str = "force";

/// Exit status when a sweep is refused for being too large.
const EXIT_REFUSED: i32 = 2;

fn output_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(OUTPUT)
        .required(true)
        .long(OUTPUT)
        .short("o")
        .takes_value(true)
        .help("Output file")
}

fn step_arg<'a, 'b>(default: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(STEP)
        .long(STEP)
        .short("s")
        .takes_value(true)
        .default_value(default)
        .validator(|s| validate_step(&s))
        .help("Spacing between samples")
}

fn precision_arg<'a, 'b>(default: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(PRECISION)
        .long(PRECISION)
        .short("p")
        .takes_value(true)
        .default_value(default)
        .validator(|s| {
            validate_range(
                &s,
                1,
                10_000_000,
                "Could not parse precision",
                "Precision must be between 1 and 10000000",
            )
        })
        .help("Maximum number of iterations per sample")
}

fn force_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(FORCE)
        .long(FORCE)
        .short("f")
        .help("Run even when precision / step exceeds the load limit")
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("fractal")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot and logistic bifurcation point generator")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(MANDELBROT)
                .about("Escape-time samples of the Mandelbrot region")
                .arg(output_arg())
                .arg(step_arg("0.005"))
                .arg(precision_arg("20"))
                .arg(
                    Arg::with_name(MODE)
                        .long(MODE)
                        .short("m")
                        .takes_value(true)
                        .possible_values(&["color", "bw"])
                        .default_value("color")
                        .help("color: escaped points with colours; bw: bounded points"),
                )
                .arg(
                    Arg::with_name(THREADS)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .default_value("1")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                max_threads,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", max_threads),
                            )
                        })
                        .help("Number of threads to use in solver"),
                )
                .arg(force_arg()),
        )
        .subcommand(
            SubCommand::with_name(BIFURCATION)
                .about("Final iterates of the logistic map across r")
                .arg(output_arg())
                .arg(step_arg("0.001"))
                .arg(precision_arg("1000"))
                .arg(
                    Arg::with_name(POINT)
                        .long(POINT)
                        .short("c")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse point"))
                        .help("Scale each final iterate by the magnitude of RE,IM"),
                )
                .arg(
                    Arg::with_name(SEED)
                        .long(SEED)
                        .takes_value(true)
                        .validator(|s| {
                            validate_range(
                                &s,
                                0,
                                u64::max_value(),
                                "Could not parse seed",
                                "Seed out of range",
                            )
                        })
                        .help("Seed for the per-r jitter; omit for a random one"),
                )
                .arg(force_arg()),
        )
        .get_matches()
}

/// What a subcommand did.
enum Outcome {
    Written(usize),
    Refused { load: f64, limit: f64 },
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, FractalError> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| FractalError::invalid(format!("missing or malformed --{}", name)))
}

fn over_limit(load: f64, limit: f64, matches: &ArgMatches) -> bool {
    if load <= limit {
        return false;
    }
    if matches.is_present(FORCE) {
        warn!("Load {} exceeds the limit of {}; continuing anyway", load, limit);
        return false;
    }
    true
}

fn mandelbrot(matches: &ArgMatches) -> Result<Outcome, FractalError> {
    let step: f64 = value(matches, STEP)?;
    let precision: usize = value(matches, PRECISION)?;
    let threads: usize = value(matches, THREADS)?;
    let mut engine = MandelbrotEngine::new(step, precision)?;

    let load = engine.load_factor();
    if over_limit(load, MANDELBROT_LOAD_LIMIT, matches) {
        return Ok(Outcome::Refused {
            load,
            limit: MANDELBROT_LOAD_LIMIT,
        });
    }

    info!(
        "Sampling {} points at precision {} on {} thread(s)",
        engine.sample_count(),
        precision,
        threads
    );
    let color = matches.value_of(MODE) != Some("bw");
    if color {
        engine.compute_color_threaded(threads)?;
    } else {
        engine.compute_black_white_threaded(threads)?;
    }

    let path: String = value(matches, OUTPUT)?;
    let mut out = BufWriter::new(File::create(&path)?);
    if color {
        writeln!(out, "# re im r g b")?;
        for ((re, im), c) in engine
            .re_values()
            .iter()
            .zip(engine.im_values())
            .zip(engine.colors())
        {
            writeln!(out, "{} {} {} {} {}", re, im, c.r, c.g, c.b)?;
        }
    } else {
        writeln!(out, "# re im")?;
        for (re, im) in engine.re_values().iter().zip(engine.im_values()) {
            writeln!(out, "{} {}", re, im)?;
        }
    }
    out.flush()?;
    debug!("Output written to {}", path);
    Ok(Outcome::Written(engine.len()))
}

fn bifurcation(matches: &ArgMatches) -> Result<Outcome, FractalError> {
    let step: f64 = value(matches, STEP)?;
    let precision: usize = value(matches, PRECISION)?;
    let mut engine = BifurcationEngine::new(step, precision)?;
    if matches.is_present(SEED) {
        engine.set_seed(Some(value(matches, SEED)?));
    }

    let load = engine.load_factor();
    if over_limit(load, BIFURCATION_LOAD_LIMIT, matches) {
        return Ok(Outcome::Refused {
            load,
            limit: BIFURCATION_LOAD_LIMIT,
        });
    }

    info!(
        "Sweeping {} values of r at precision {}",
        engine.sample_count(),
        precision
    );
    match matches.value_of(POINT).and_then(|s| parse_pair::<f64>(s, ',')) {
        Some((re, im)) => engine.compute_from_point(re, im)?,
        None => engine.compute_bifurcation()?,
    }

    let path: String = value(matches, OUTPUT)?;
    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(out, "# r x")?;
    for (r, x) in engine.r_values().iter().zip(engine.x_values()) {
        writeln!(out, "{} {}", r, x)?;
    }
    out.flush()?;
    debug!("Output written to {}", path);
    Ok(Outcome::Written(engine.len()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    let result = match matches.subcommand() {
        (MANDELBROT, Some(sub)) => mandelbrot(sub),
        (BIFURCATION, Some(sub)) => bifurcation(sub),
        _ => Err(FractalError::invalid("no subcommand given")),
    };

    match result {
        Ok(Outcome::Written(count)) => {
            info!("Wrote {} points", count);
        }
        Ok(Outcome::Refused { load, limit }) => {
            eprintln!(
                "Your machine probably won't handle {} calculations. The limit is {}.",
                load as u64, limit as u64
            );
            eprintln!("Reduce precision or increase step and try again, or pass --force.");
            std::process::exit(EXIT_REFUSED);
        }
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    }
}
