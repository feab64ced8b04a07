//! Terminal implementations of the panel's host services.

use async_trait::async_trait;
use engine::ThemeError;
use engine::ThemeResult;
use engine::host::{
    DialogKind, DialogRequest, DialogResult, DialogService, FileOpener, Notifier, OpenFailure,
    StylesheetApplier, StylesheetSlot,
};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;

/// Dialogs answered on the terminal.
///
/// A preset action is picked without prompting when the dialog offers
/// it, which is how `--yes` confirms a removal.
#[derive(Debug, Default, Clone)]
pub struct TerminalDialog {
    preset_action: Option<String>,
}

impl TerminalDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(action: &str) -> Self {
        Self {
            preset_action: Some(action.to_string()),
        }
    }
}

#[async_trait]
impl DialogService for TerminalDialog {
    async fn show(&self, request: DialogRequest) -> ThemeResult<DialogResult> {
        if let Some(action) = &self.preset_action {
            if request.actions.contains(action) {
                log::debug!("Answering '{}' with preset '{action}'", request.title);
                return Ok(preset_result(&request, action));
            }
        }

        tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_dialog(&request, &mut stdin.lock(), &mut stdout.lock())
        })
        .await
        .map_err(|e| ThemeError::Dialog(format!("dialog task failed: {e}")))?
        .map_err(|e| ThemeError::Dialog(format!("terminal I/O failed: {e}")))
    }
}

fn preset_result(request: &DialogRequest, action: &str) -> DialogResult {
    request
        .inputs
        .iter()
        .fold(DialogResult::new(action), |result, input| {
            result.with_input(&input.id, &input.value)
        })
}

/// Show `request` on `output` and read the answers from `input`.
///
/// Empty input keeps an input's prefilled value. The first action is
/// the default, and end of input picks it too.
pub fn run_dialog<R: BufRead, W: Write>(
    request: &DialogRequest,
    input: &mut R,
    output: &mut W,
) -> io::Result<DialogResult> {
    let marker = match request.kind {
        DialogKind::Question => "?",
        DialogKind::Info => "i",
        DialogKind::Error => "!",
    };
    writeln!(output, "[{marker}] {}", request.title)?;
    if let Some(text) = &request.text {
        writeln!(output, "{text}")?;
    }
    if let Some(error) = &request.error {
        writeln!(output, "  {error}")?;
    }

    let mut answers = Vec::with_capacity(request.inputs.len());
    for field in &request.inputs {
        write!(output, "{} [{}]: ", field.placeholder, field.value)?;
        output.flush()?;
        let line = read_line(input)?;
        let value = match line.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => field.value.clone(),
        };
        answers.push((field.id.as_str(), value));
    }

    let default_action = request.actions.first().cloned().unwrap_or_default();
    let action = if request.actions.len() > 1 {
        write!(output, "{}: ", request.actions.join("/"))?;
        output.flush()?;
        read_line(input)?
            .and_then(|line| {
                let line = line.trim();
                request
                    .actions
                    .iter()
                    .find(|action| action.eq_ignore_ascii_case(line))
                    .cloned()
            })
            .unwrap_or(default_action)
    } else {
        default_action
    };

    Ok(answers
        .into_iter()
        .fold(DialogResult::new(&action), |result, (id, value)| {
            result.with_input(id, &value)
        }))
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

/// Reports failures on stderr and in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_error(&self, title: &str, error: &ThemeError, allow_report: bool) {
        log::error!("{title}: {error}");
        eprintln!("{title}: {error}");
        if allow_report {
            eprintln!("If this keeps happening, please report it along with the log file.");
        }
    }
}

/// Writes the stylesheet each slot would load, one line per slot
pub struct PrintApplier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> PrintApplier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn print(&self, line: std::fmt::Arguments<'_>) {
        let written = match self.out.lock() {
            Ok(mut out) => writeln!(out, "{line}"),
            Err(_) => return,
        };
        if let Err(e) = written {
            log::warn!("Failed to print stylesheet: {e}");
        }
    }
}

impl<W: Write + Send> StylesheetApplier for PrintApplier<W> {
    fn set_stylesheet(&self, slot: StylesheetSlot, path: Option<&Path>) {
        match path {
            Some(path) => self.print(format_args!("{:<10} {}", slot.key(), path.display())),
            None => self.print(format_args!("{:<10} -", slot.key())),
        }
    }

    fn clear(&self) {
        self.print(format_args!("(cleared)"));
    }
}

/// Opens files with the desktop's default application
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), OpenFailure> {
        match open::that(path) {
            Ok(()) => {
                log::info!("Opened {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(OpenFailure::NoHandler(path.to_path_buf()))
            }
            Err(e) => Err(OpenFailure::Other(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn clone_request() -> DialogRequest {
        DialogRequest::new(DialogKind::Question, "Enter a name")
            .with_error(Some("Name already used.".to_string()))
            .with_input("name", "Theme Name", "dark")
            .with_actions(&["Cancel", "Clone"])
    }

    #[test]
    fn test_dialog_reads_input_and_action() {
        let mut input = Cursor::new("midnight\nclone\n");
        let mut output = Vec::new();

        let result = run_dialog(&clone_request(), &mut input, &mut output).unwrap();

        assert_eq!(result.action, "Clone");
        assert_eq!(result.input.get("name").map(String::as_str), Some("midnight"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Enter a name"));
        assert!(shown.contains("Name already used."));
        assert!(shown.contains("Theme Name [dark]: "));
    }

    #[test]
    fn test_dialog_defaults_on_empty_input() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();

        let result = run_dialog(&clone_request(), &mut input, &mut output).unwrap();

        assert_eq!(result.action, "Cancel");
        assert_eq!(result.input.get("name").map(String::as_str), Some("dark"));
    }

    #[test]
    fn test_single_action_dialog_does_not_prompt() {
        let request = DialogRequest::new(DialogKind::Error, "No handler found")
            .with_text("open it yourself")
            .with_actions(&["Close"]);
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        let result = run_dialog(&request, &mut input, &mut output).unwrap();

        assert_eq!(result.action, "Close");
        assert!(String::from_utf8(output).unwrap().starts_with("[!] No handler found"));
    }

    #[tokio::test]
    async fn test_preset_answer_skips_prompt() {
        let dialog = TerminalDialog::answering("Confirm");
        let request = DialogRequest::new(DialogKind::Question, "Confirm removal")
            .with_actions(&["Cancel", "Confirm"]);

        let result = dialog.show(request).await.unwrap();

        assert_eq!(result.action, "Confirm");
    }
}
