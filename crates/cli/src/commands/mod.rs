pub mod generate;
pub mod synchronize;

/// Run a fallible command body, mapping errors to exit codes.
pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), String>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
