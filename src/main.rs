use colored::Colorize;

fn main() {
    if let Err(e) = pokedex::app::run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
