use hamilton_stress::answers::AnswerSet;
use hamilton_stress::inventory::Inventory;
use hamilton_stress::scoring::{classify, score_breakdown};
use hamilton_stress::utils::{log_band, log_breakdown, log_generic_error, log_newline};
use std::env;
use std::process;

fn print_usage() {
    eprintln!("Usage: score-answers <answers>...");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <answers>  One value (1-4) per question in order, e.g. 1 2 3 4 ...");
    eprintln!("             or explicit pairs, e.g. 5=4,9=1");
    eprintln!();
    eprintln!("Positional input must cover every question; unanswered pairs score 0.");
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        process::exit(1);
    }

    let inventory = Inventory::hamilton();
    let answers = match AnswerSet::parse(&args.join(" "), &inventory) {
        Ok(answers) => answers,
        Err(e) => {
            log_generic_error("Invalid answers:", &e.to_string());
            process::exit(1);
        }
    };

    let breakdown = score_breakdown(&answers, &inventory);
    log_breakdown(&breakdown, &inventory);
    log_newline();

    let band = classify(breakdown.total, inventory.bands());
    log_band(breakdown.total, band, &inventory);
}
