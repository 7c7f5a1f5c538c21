use std::process;

fn main() {
    process::exit(quire_cli::run());
}
