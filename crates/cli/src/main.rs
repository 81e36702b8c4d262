use std::process::ExitCode;

fn main() -> ExitCode {
    lattice_cli::init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let code = runtime.block_on(lattice_cli::run_cli(args));
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
