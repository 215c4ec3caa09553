use std::process::ExitCode;

fn main() -> ExitCode {
    goimpl::cli::main()
}
