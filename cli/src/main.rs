//! Command-line inspector: replay a scramble and partial solution, print
//! the interpreted progress, and list the advisor's suggestions.

use clap::Parser;
use coach_core::moves::parse_moves;
use coach_core::progress::steps_completed;
use coach_core::{Advisor, ArrayStateReader, CubeModel, Simulator};
use color_eyre::eyre::Result;
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "cubecoach", about = "Replay cube notation and ask for the next step")]
struct Args {
    /// Scramble in standard notation, e.g. "R U R' U'".
    scramble: String,
    /// Solution moves applied so far.
    #[arg(default_value = "")]
    solution: String,
    /// Maximum number of suggestions to print.
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let args = Args::parse();

    let mut moves = parse_moves(&args.scramble)?;
    moves.extend(parse_moves(&args.solution)?);
    let mut sim = Simulator::new();
    sim.apply_moves(&moves);
    let model = CubeModel::from_reader(&ArrayStateReader(sim.state()))?;

    println!("signature  {}", model.signature.to_string().bold());
    let steps = steps_completed(&model);
    if steps.is_empty() {
        println!("{}", "no milestone reached yet".dimmed());
    }
    for step in steps {
        let colors = step
            .colors
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<16} {}", format!("{:?}", step.tag).green(), colors.dimmed());
    }

    let advisor = Advisor::new()?;
    let suggestions = advisor.suggest(&model)?;
    if suggestions.is_empty() {
        println!("{}", "nothing to suggest".dimmed());
        return Ok(());
    }
    println!();
    for suggestion in suggestions.iter().take(args.limit) {
        let case = suggestion.case_name.unwrap_or("");
        println!(
            "{:>6.2}  {:<12} {:<8} {}",
            suggestion.estimated_cost,
            suggestion.step_label.cyan(),
            case.yellow(),
            suggestion.alg.bold()
        );
    }
    Ok(())
}
