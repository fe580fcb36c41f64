use std::{env, process};

use listing_core::{cli, init};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    match cli::run(&args) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
