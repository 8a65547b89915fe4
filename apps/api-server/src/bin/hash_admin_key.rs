//! Reads an admin key from stdin and prints the Argon2 hash to put in `ADMIN_KEY_HASH`.

use std::io::{self, BufRead};
use std::process::ExitCode;

use quill_core::ports::KeyHasher;
use quill_infra::Argon2KeyHasher;

fn main() -> ExitCode {
    let mut key = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut key) {
        eprintln!("failed to read key: {e}");
        return ExitCode::FAILURE;
    }

    let key = key.trim_end_matches(['\r', '\n']);
    if key.is_empty() {
        eprintln!("usage: echo -n <admin key> | hash-admin-key");
        return ExitCode::FAILURE;
    }

    match Argon2KeyHasher::new().hash(key) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
