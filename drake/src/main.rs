use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use drake::ModelError;
use drake::report::ModelReport;
use drake::serialization::ModelDescription;

#[derive(Debug, Parser)]
#[command(about = "Evaluates the Drake equation as a product of discrete random variables")]
struct Args {
    /// JSON model description; the built-in Drake model when omitted
    #[arg(short, long)]
    model_file: Option<String>,

    /// number of samples to draw for the histogram, 0 to skip sampling
    #[arg(short, long, default_value_t = 100)]
    trials: usize,

    #[arg(short, long, default_value_t = 20)]
    bins: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// print the full outcome table
    #[arg(long)]
    table: bool,

    /// print the outcome table with a running cumulative probability
    #[arg(long)]
    cumulative: bool,
}


fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let model = match &args.model_file {
        Some(path) => {
            println!("Model file: {}", path);
            ModelDescription::from_file(path).unwrap_or_else(|err| {
                eprintln!("Problem loading model file: {}", err);
                match err {
                    ModelError::Io(_) => process::exit(1),
                    _ => process::exit(2),
                }
            })
        }
        None => ModelDescription::reference(),
    };
    println!("trials: {}", args.trials);
    println!("bins: {}", args.bins);

    let report = ModelReport::evaluate(&model).unwrap_or_else(|err| {
        eprintln!("Problem evaluating model: {}", err);
        process::exit(3);
    });

    let report = if args.trials > 0 {
        let mut rng = match args.seed {
            Some(seed) => drv::create_rng(seed),
            None => StdRng::from_entropy(),
        };
        report.with_samples(&mut rng, args.trials, args.bins).unwrap_or_else(|err| {
            eprintln!("Problem sampling model: {}", err);
            process::exit(4);
        })
    } else {
        report
    };

    report.describe();
    if args.table || args.cumulative {
        println!();
        report.print_table(args.cumulative);
    }
}
