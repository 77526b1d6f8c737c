//! Theme command handlers

use anyhow::Result;

use todo_core::Config;

use super::open_dark_mode;
use crate::output::Output;

/// Show the current mode
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let dark = open_dark_mode(config);
    output.print_dark_mode(dark.is_enabled(), dark.label());
    Ok(())
}

/// Switch between dark and light
pub fn toggle(config: &Config, output: &Output) -> Result<()> {
    let mut dark = open_dark_mode(config);
    dark.toggle();
    output.print_dark_mode(dark.is_enabled(), dark.label());
    Ok(())
}

/// Use dark (`true`) or light (`false`) mode
pub fn set(config: &Config, enabled: bool, output: &Output) -> Result<()> {
    let mut dark = open_dark_mode(config);
    dark.set(enabled);
    output.print_dark_mode(dark.is_enabled(), dark.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_set_and_toggle_persist() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        set(&config, true, &output).unwrap();
        assert!(open_dark_mode(&config).is_enabled());

        toggle(&config, &output).unwrap();
        assert!(!open_dark_mode(&config).is_enabled());

        toggle(&config, &output).unwrap();
        assert!(open_dark_mode(&config).is_enabled());
        assert!(config.preferences_path().exists());
    }
}
