use std::{env, io, process};

use lox_lang::lox;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut stdout = io::stdout();
    let mut lox = lox::new(&mut stdout);

    match args.as_slice() {
        [_] => lox.run_prompt(),
        [_, script] => lox.run_file(script),
        _ => {
            eprintln!("Usage: lox [script]");
            process::exit(64);
        },
    }
}
