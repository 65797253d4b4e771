use clap::Parser;
use geosample_cli::{Args, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geosample_cli=info,geosample=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let output = run(args).await?;
    println!("{}", output);

    Ok(())
}
