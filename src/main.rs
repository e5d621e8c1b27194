use clap::Parser;
use color_eyre::eyre::Result;

use lazyview::{
    infrastructure::{cli::Cli, config::Config, tui::real::RealTui},
    integration::app_runner::{run_headless, AppRunner},
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let mut config = Config::new()?;
    config.select_modules(&args.modules);

    if args.headless {
        for line in run_headless(&config, &args.modules).await? {
            println!("{line}");
        }
        return Ok(());
    }

    let frame_rate = args.frame_rate.unwrap_or(config.runtime.frame_rate);
    let tui = RealTui::new()?.frame_rate(frame_rate);
    let mut runner = AppRunner::new(&config, tui)?;
    runner.run().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
