use clap::Subcommand;
use recenter_core::storage::data_dir;
use recenter_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the current configuration (creating defaults if absent)
    Init,
    /// Print the data directory path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let config = Config::load()?;
            config.save()?;
            println!("wrote {}", data_dir()?.join("config.toml").display());
        }
        ConfigAction::Path => {
            println!("{}", data_dir()?.display());
        }
    }
    Ok(())
}
