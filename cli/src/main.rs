use cast_labeler::LabelArgs;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cast_labeler=info,labeler_evm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = LabelArgs::parse();
    let outcome = args.run().await?;

    println!("Updated `cast run` command saved to {}", outcome.script.display());
    println!("Run the command using: bash {}", outcome.script.display());
    Ok(())
}
