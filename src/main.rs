use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    iron_archive_lib::init_tracing();
    iron_archive_lib::cli::run(std::env::args().collect()).await
}
