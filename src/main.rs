use std::process::ExitCode;

fn main() -> ExitCode {
    medicare_lib::run()
}
