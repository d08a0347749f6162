use anyhow::{anyhow, Result};
use clap::Parser;

use caret::cli::{CliArgs, OutputFormat};
use caret::session::{Session, TextSpec};
use caret::EngineConfig;

fn main() -> Result<()> {
    caret::tracing::init();

    let config = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;

    let engine = match &config.config_path {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load(),
    };

    let mut session = match &config.script {
        Some(path) => Session::load(path)?,
        None => Session::default(),
    };
    if session.texts.is_empty() {
        session
            .texts
            .push(TextSpec::plain(config.seed_text.clone().unwrap_or_default()));
    }

    let dump = session.run(engine, config.wrap)?;
    match config.output {
        OutputFormat::Json => println!("{}", dump.to_json()?),
        OutputFormat::Text => print!("{}", dump.to_text()),
    }
    Ok(())
}
