use std::process::ExitCode;

fn main() -> ExitCode {
    match circbuf::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(circbuf::errors::exit_code(&e))
        }
    }
}
