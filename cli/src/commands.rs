use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::host::{LogNotifier, PrintApplier, SystemOpener, TerminalDialog};
use engine::host::DialogService;
use engine::settings::JsonSettings;
use engine::upgrade;
use engine::variables::{ThemeVariableSet, read_variables};
use engine::{PanelServices, ThemeError, ThemePanel, ThemeResolver, ThemeRoots};
use std::io::Write;
use std::sync::Arc;

/// Dialog service for a command; `remove --yes` confirms on its own
pub fn dialog_for(command: &Command) -> TerminalDialog {
    match command {
        Command::Remove { yes: true } => TerminalDialog::answering("Confirm"),
        _ => TerminalDialog::new(),
    }
}

/// Build the panel from configuration and scan the theme directories
pub async fn open_panel(
    config: &AppConfig,
    dialogs: Arc<dyn DialogService>,
) -> AppResult<ThemePanel> {
    let roots = ThemeRoots::new(config.bundled_dir()?, config.themes_dir()?);
    log::debug!(
        "Theme roots: bundled {}, user {}",
        roots.bundled.display(),
        roots.user.display()
    );

    let services = PanelServices {
        settings: Arc::new(JsonSettings::open(config.settings_file()?)),
        dialogs,
        notifier: Arc::new(LogNotifier),
        opener: Arc::new(SystemOpener),
    };

    let mut panel = ThemePanel::new(ThemeResolver::new(roots, config.normalizer()), services);
    panel.mount().await;
    Ok(panel)
}

/// Run one command against a mounted panel, writing results to `out`
pub async fn execute(
    command: Command,
    panel: &mut ThemePanel,
    out: &mut (dyn Write + Send),
) -> AppResult<()> {
    match command {
        Command::List => list(panel, out).await,
        Command::Show { theme } => show(panel, theme.as_deref(), out).await,
        Command::Select { theme } => {
            panel.switch_to(&theme).await?;
            writeln!(out, "Current theme: {}", panel.current_theme())?;
            Ok(())
        }
        Command::Clone { name } => {
            let cloned = match name {
                Some(name) => Some(panel.clone_as(&name).await?),
                None => panel.clone_theme().await?,
            };
            match cloned {
                Some(name) => writeln!(out, "Created theme {name}")?,
                None => writeln!(out, "Clone cancelled")?,
            }
            Ok(())
        }
        Command::Remove { .. } => {
            let removed = panel.current_theme();
            match panel.remove_theme().await? {
                Some(deletion) => {
                    if let Err(e) = deletion.await {
                        log::error!("Theme deletion task failed: {e}");
                    }
                    writeln!(
                        out,
                        "Removed theme {removed}, current theme: {}",
                        panel.current_theme()
                    )?;
                }
                None => writeln!(out, "Removal cancelled")?,
            }
            Ok(())
        }
        Command::Set { key, value } => {
            panel.editor_mut().set(&key, &value)?;
            panel.save().await?;
            writeln!(out, "Saved {key} for theme {}", panel.current_theme())?;
            Ok(())
        }
        Command::Edit => {
            let style = panel.edit_manually().await?;
            writeln!(out, "Opened {}", style.display())?;
            Ok(())
        }
        Command::Stylesheets => {
            let applier = PrintApplier::new(&mut *out);
            panel.apply_stylesheets(&applier, true).await;
            Ok(())
        }
    }
}

async fn list(panel: &ThemePanel, out: &mut (dyn Write + Send)) -> AppResult<()> {
    let current = panel.current_path();

    for descriptor in panel.descriptors().await {
        let marker = if current.as_ref() == Some(&descriptor.path) {
            '*'
        } else {
            ' '
        };
        let origin = if descriptor.editable { "user" } else { "bundled" };
        let legacy = if upgrade::is_old_theme(descriptor.engine_version) {
            " (legacy)"
        } else {
            ""
        };
        writeln!(
            out,
            "{marker} {:<24} {origin:<8} v{}{legacy}",
            descriptor.name(),
            descriptor.engine_version
        )?;
    }
    Ok(())
}

async fn show(
    panel: &ThemePanel,
    theme: Option<&str>,
    out: &mut (dyn Write + Send),
) -> AppResult<()> {
    let (variables, is_old) = match theme {
        None => (panel.variables().clone(), panel.is_old_theme()),
        Some(name) => {
            let dir = panel
                .resolver()
                .resolve(name)
                .ok_or_else(|| ThemeError::ThemeNotFound(name.to_string()))?;
            let loaded = upgrade::load(read_variables(dir).await);
            (loaded.variables, loaded.is_old_theme)
        }
    };

    if is_old {
        writeln!(
            out,
            "// Legacy theme, shown upgraded. Saving converts it to the current format."
        )?;
    }
    print_variables(&variables, out)
}

fn print_variables(variables: &ThemeVariableSet, out: &mut (dyn Write + Send)) -> AppResult<()> {
    for (name, value) in variables {
        writeln!(out, "${name}: {value};")?;
    }
    Ok(())
}
