//! Demonstration driver for `rank_tree`: inserts integer keys one at a
//! time and pretty-prints the tree after each step.

use clap::Parser;
use log::{LevelFilter, debug, info};
use rand::Rng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rank_tree::RankTree;

#[derive(Parser, Debug)]
#[command(name = "tree-demo")]
#[command(about = "Insert integer keys into a rank tree, printing it after each step", long_about = None)]
struct Cli {
    /// A single value N inserts N random keys in 0..100; two or more
    /// values are inserted literally, in the order given.
    #[arg(value_name = "COUNT | KEY KEY ...", required = true, num_args = 1..)]
    keys: Vec<i64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .expect("logger already initialized");

    let keys: Vec<i64> = if cli.keys.len() == 1 {
        let count = usize::try_from(cli.keys[0]).unwrap_or(0);
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen_range(0..100)).collect()
    } else {
        cli.keys
    };

    info!("inserting {} keys", keys.len());

    let mut tree = RankTree::with_capacity(keys.len());
    println!("{tree}");
    for key in keys {
        tree.insert(key);
        debug!("inserted {key}: len={}, rank({key})={}", tree.len(), tree.rank(&key));
        println!();
        println!("{tree}");
    }
}
