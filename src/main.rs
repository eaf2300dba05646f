use clap::Parser;
use pricehawk::{cli::Cli, configuration::get_configuration, startup::run, telemetry::init_logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut configuration = get_configuration()?;
    init_logger(&configuration.logging);
    cli.apply(&mut configuration)?;

    let report = run(&configuration).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
