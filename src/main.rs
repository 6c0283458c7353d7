use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;
use neji::{
    all_approximations, cents_from_edo, CandidateMode, CandidateSet, CentsFormat, Neji, Nudge,
    ScalaFile,
};

mod table;

/// Comma-separated generator list as given on the command line
#[derive(Clone, Debug)]
struct GeneratorList(Vec<u64>);

fn parse_generators(s: &str) -> Result<GeneratorList, String> {
    s.split(',')
        .map(|g| {
            g.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid generator '{}': {}", g.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(GeneratorList)
}

/// Approximate an equal division of the octave with just intonation ratios
/// and write the result as a Scala tuning file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of equal divisions of the octave
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    edo: u32,

    /// Comma-separated generators, e.g. 2,3,5
    #[arg(value_parser = parse_generators)]
    generators: GeneratorList,

    /// Scale name; the file is written as <NAME>.scl
    name: String,

    /// Scale degree to nudge (1 to EDO - 1)
    #[arg(long)]
    nudge_degree: Option<usize>,

    /// Signed nudge, in steps of 1 / largest candidate denominator
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    nudge_amount: i64,

    /// Use the generators themselves as denominators instead of all their products
    #[arg(long)]
    limit: bool,

    /// Print every evaluated approximation, not just the best ones
    #[arg(long, conflicts_with = "json")]
    all: bool,

    /// Write cents with six decimals instead of full precision
    #[arg(long)]
    fixed: bool,

    /// Directory the .scl file is written into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the best-fit table as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let generators = args.generators.0;
    let mode = if args.limit {
        CandidateMode::Limited
    } else {
        CandidateMode::Expanded
    };

    let nudge = nudge_from_args(args.edo, args.nudge_degree, args.nudge_amount)?;

    let name = scala_sanitize(&args.name);
    if name.is_empty() {
        bail!("scale name '{}' has no usable characters", args.name);
    }

    if !args.json {
        println!("{}-EDO, generators {:?}, name {}", args.edo, generators, name);
    }

    let edo = cents_from_edo(args.edo)?;
    let candidates = CandidateSet::new(&generators, mode)?;
    let all = all_approximations(&edo, &candidates)?;

    if args.all {
        print!("{}", table::format_all(&all));
    }

    let neji = Neji::from_approximations(all, candidates, nudge)
        .with_context(|| format!("computing NEJI for {}-EDO", args.edo))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&neji.table)?);
    } else {
        print!("{}", table::format_table(&neji.table));
    }

    let format = if args.fixed {
        CentsFormat::Fixed
    } else {
        CentsFormat::Full
    };

    let path = ScalaFile::new(&name, &neji.cents())?
        .with_format(format)
        .write_to_dir(&args.output_dir)
        .with_context(|| format!("writing {}.scl", name))?;

    eprintln!("Wrote {}", path.display());

    Ok(())
}

/// Boundary checks on the nudge options, before any search runs.
fn nudge_from_args(edo: u32, degree: Option<usize>, amount: i64) -> Result<Option<Nudge>> {
    let Some(degree) = degree else {
        if amount != 0 {
            warn!("--nudge-amount given without --nudge-degree; ignoring it");
        }
        return Ok(None);
    };

    if degree >= edo as usize {
        bail!(
            "nudge degree {} is out of range for {}-EDO (must be below {})",
            degree,
            edo,
            edo
        );
    }
    if degree == 0 {
        warn!("nudging scale degree 0 (the unison) is not supported");
        eprintln!("Warning: nudging scale degree 0 (the unison) is not supported");
    }

    Ok(Some(Nudge::new(degree, amount)))
}

/// Scala names must not contain spaces; the name also becomes a file name.
fn scala_sanitize(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':'))
        .collect()
}
