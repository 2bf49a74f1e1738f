use grader_cli::{cmd::Args, logger};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse_or_exit();
    logger::init(args.verbose);

    let code = args.exec().await.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        1
    });
    std::process::exit(code);
}
