use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "themeshop")]
#[command(about = "Pick, clone, edit and remove application themes")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to themeshop.toml in the config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List bundled and user themes
    List,
    /// Print the variables of a theme (the current one by default)
    Show {
        theme: Option<String>,
    },
    /// Make a theme the current one
    Select {
        theme: String,
    },
    /// Copy the current theme into a new, editable theme
    Clone {
        /// Name of the copy; prompts when omitted
        #[arg(long, short = 'n')]
        name: Option<String>,
    },
    /// Delete the current theme and fall back to the default one
    Remove {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Change one setting or color of the current theme and save it
    Set {
        /// Variable name, e.g. `primary` or `font-size-base`
        key: String,
        value: String,
    },
    /// Open the current theme's style.scss in an editor
    Edit,
    /// Show which stylesheets the current theme provides
    Stylesheets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clone_with_name() {
        let cli = Cli::try_parse_from(["themeshop", "clone", "--name", "midnight"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Clone {
                name: Some("midnight".to_string())
            }
        );
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["themeshop", "remove", "-y", "--config", "/tmp/t.toml"])
            .unwrap();
        assert_eq!(cli.command, Command::Remove { yes: true });
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
    }

    #[test]
    fn test_set_requires_value() {
        assert!(Cli::try_parse_from(["themeshop", "set", "primary"]).is_err());
    }
}
