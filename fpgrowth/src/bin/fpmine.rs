use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fpgrowth::fp::io::{read_database, write_patterns_to_path};
use fpgrowth::fp::{FpError, SearchConfig, build_fp_tree, fp_search, min_count, sort_itemsets};

const FORMAT_HELP: &str = "\
The input file starts with a line holding the number of transactions. Every
following line is tab-separated: transaction id, number of items, and the
space-separated item ids. The minimum support is multiplied by the declared
transaction count to obtain the absolute threshold.";

/// Mine frequent itemsets from a transaction database with FP-Growth.
#[derive(Debug, Parser)]
#[command(name = "fpmine", version, about, after_long_help = FORMAT_HELP)]
struct Args {
    /// Input transaction database
    #[arg(short = 'i', long = "in-file")]
    in_file: PathBuf,

    /// Output file for the frequent patterns
    #[arg(short = 'o', long = "out-file", default_value = "MiningResults.txt")]
    out_file: PathBuf,

    /// Minimum support as a fraction of the transaction count
    #[arg(short = 'm', long = "min-supp", default_value_t = 0.5, value_parser = parse_fraction)]
    min_supp: f64,

    /// Give up once the search needs more than this many nested conditional trees
    #[arg(long)]
    max_depth: Option<usize>,
}

fn parse_fraction(value: &str) -> Result<f64, String> {
    let fraction: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(format!("{} is not within [0, 1]", fraction));
    }
    Ok(fraction)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "mining failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), FpError> {
    info!(path = %args.in_file.display(), "performing first database scan");
    let database = read_database(&args.in_file)?;
    let epsilon = min_count(args.min_supp, database.declared_count)?;

    let mut config = SearchConfig::new(epsilon)?;
    config.max_depth = args.max_depth;

    info!(transactions = database.transactions.len(), epsilon, "building initial tree");
    let (fp_tree, table) = build_fp_tree(&database.transactions, epsilon);
    drop(database);

    info!(frequent_items = table.len(), nodes = fp_tree.len(), "finding frequent patterns");
    let mut patterns = fp_search(fp_tree, config).collect::<Result<Vec<_>, _>>()?;
    sort_itemsets(&mut patterns);

    info!(path = %args.out_file.display(), patterns = patterns.len(), "writing frequent patterns");
    write_patterns_to_path(&args.out_file, &patterns)?;
    Ok(())
}
