//! Interactive prompts used by `init`.
//!
//! [`Prompter`] is the seam between the init state machine and the terminal;
//! tests drive it with scripted input through [`TerminalPrompter`] over an
//! in-memory reader.
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::plan::InstallScope;

/// One entry in the platform multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformChoice {
    /// Platform id returned when chosen.
    pub id: String,
    /// Label shown to the user.
    pub label: String,
    /// Pre-selected (detected in the workspace).
    pub checked: bool,
}

/// Questions `init` may ask in interactive mode.
pub trait Prompter {
    /// Multi-select platform adapters. Returns the chosen ids in list order.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read or is not a valid selection.
    fn select_platforms(&mut self, choices: &[PlatformChoice]) -> Result<Vec<String>>;

    /// Choose the install scope.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read or is out of range.
    fn select_scope(
        &mut self,
        default: InstallScope,
        repo_label: &str,
        personal_label: &str,
    ) -> Result<InstallScope>;

    /// Ask for a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn input_path(&mut self, message: &str, default: &Path) -> Result<PathBuf>;

    /// Ask a yes/no question. End of input counts as "no".
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Line-oriented prompts over any reader/writer pair.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter over `input` and `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one trimmed line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("writing prompt")?;
        self.output.flush().context("flushing prompt")?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("reading prompt input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select_platforms(&mut self, choices: &[PlatformChoice]) -> Result<Vec<String>> {
        if choices.is_empty() {
            return Ok(Vec::new());
        }

        writeln!(self.output, "\nSelect platform adapters:").context("writing prompt")?;
        for (i, choice) in choices.iter().enumerate() {
            let mark = if choice.checked { "x" } else { " " };
            writeln!(
                self.output,
                "  \x1b[1m{}\x1b[0m) [{mark}] {}",
                i + 1,
                choice.label
            )
            .context("writing prompt")?;
        }
        writeln!(self.output, "  \x1b[1ma\x1b[0m) Select all").context("writing prompt")?;

        let answer = self
            .ask("\nAdapters (comma-separated, Enter keeps [x]): ")?
            .unwrap_or_default();
        parse_platform_selection(&answer, choices)
    }

    fn select_scope(
        &mut self,
        default: InstallScope,
        repo_label: &str,
        personal_label: &str,
    ) -> Result<InstallScope> {
        let default_index = match default {
            InstallScope::Repo => 1,
            InstallScope::Personal => 2,
        };
        writeln!(self.output, "\nInstall scope:").context("writing prompt")?;
        writeln!(self.output, "  \x1b[1m1\x1b[0m) {repo_label}").context("writing prompt")?;
        writeln!(self.output, "  \x1b[1m2\x1b[0m) {personal_label}")
            .context("writing prompt")?;

        let answer = self
            .ask(&format!("\nScope [1-2] (default {default_index}): "))?
            .unwrap_or_default();
        match answer.as_str() {
            "" => Ok(default),
            "1" => Ok(InstallScope::Repo),
            "2" => Ok(InstallScope::Personal),
            other => bail!("invalid scope selection '{other}'"),
        }
    }

    fn input_path(&mut self, message: &str, default: &Path) -> Result<PathBuf> {
        let answer = self
            .ask(&format!("{message} [{}]: ", default.display()))?
            .unwrap_or_default();
        if answer.is_empty() {
            Ok(default.to_path_buf())
        } else {
            Ok(PathBuf::from(answer))
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let Some(answer) = self.ask(&format!("{message} {hint} "))? else {
            return Ok(false);
        };
        Ok(match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

/// Interpret a multi-select answer.
///
/// Empty input keeps the pre-checked choices. `a` alone selects everything;
/// combined with numbers it is ignored and only the numbered choices count.
fn parse_platform_selection(answer: &str, choices: &[PlatformChoice]) -> Result<Vec<String>> {
    if answer.is_empty() {
        return Ok(choices
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.id.clone())
            .collect());
    }

    let mut picked = vec![false; choices.len()];
    let mut all = false;
    let mut any_number = false;
    for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("a") || token.eq_ignore_ascii_case("all") {
            all = true;
            continue;
        }
        let n: usize = token
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid selection '{token}'"))?;
        let Some(slot) = n.checked_sub(1).and_then(|i| picked.get_mut(i)) else {
            bail!("selection {n} out of range");
        };
        *slot = true;
        any_number = true;
    }

    if all && !any_number {
        return Ok(choices.iter().map(|c| c.id.clone()).collect());
    }
    Ok(choices
        .iter()
        .zip(picked)
        .filter(|(_, p)| *p)
        .map(|(c, _)| c.id.clone())
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn choices() -> Vec<PlatformChoice> {
        vec![
            PlatformChoice {
                id: "vscode-copilot".into(),
                label: "VS Code Copilot (detected)".into(),
                checked: true,
            },
            PlatformChoice {
                id: "claude-code".into(),
                label: "Claude Code".into(),
                checked: false,
            },
            PlatformChoice {
                id: "opencode".into(),
                label: "OpenCode".into(),
                checked: false,
            },
        ]
    }

    // -----------------------------------------------------------------------
    // select_platforms
    // -----------------------------------------------------------------------

    #[test]
    fn enter_keeps_checked_choices() {
        let mut p = prompter("\n");
        assert_eq!(p.select_platforms(&choices()).unwrap(), vec!["vscode-copilot"]);
        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("[x] VS Code Copilot (detected)"));
        assert!(shown.contains("Select all"));
    }

    #[test]
    fn numbers_select_in_list_order() {
        let mut p = prompter("3, 2\n");
        assert_eq!(
            p.select_platforms(&choices()).unwrap(),
            vec!["claude-code", "opencode"]
        );
    }

    #[test]
    fn all_alone_selects_everything() {
        let mut p = prompter("a\n");
        assert_eq!(p.select_platforms(&choices()).unwrap().len(), 3);
    }

    #[test]
    fn all_with_numbers_keeps_only_numbers() {
        let mut p = prompter("a,2\n");
        assert_eq!(p.select_platforms(&choices()).unwrap(), vec!["claude-code"]);
    }

    #[test]
    fn out_of_range_is_error() {
        let mut p = prompter("4\n");
        assert!(p.select_platforms(&choices()).is_err());
        let mut p = prompter("0\n");
        assert!(p.select_platforms(&choices()).is_err());
    }

    #[test]
    fn no_choices_asks_nothing() {
        let mut p = prompter("");
        assert!(p.select_platforms(&[]).unwrap().is_empty());
        assert!(p.into_output().is_empty());
    }

    // -----------------------------------------------------------------------
    // select_scope / input_path / confirm
    // -----------------------------------------------------------------------

    #[test]
    fn scope_defaults_on_enter() {
        let mut p = prompter("\n");
        let scope = p
            .select_scope(InstallScope::Personal, "Project", "Personal")
            .unwrap();
        assert_eq!(scope, InstallScope::Personal);
    }

    #[test]
    fn scope_by_number() {
        let mut p = prompter("1\n");
        let scope = p
            .select_scope(InstallScope::Personal, "Project", "Personal")
            .unwrap();
        assert_eq!(scope, InstallScope::Repo);
    }

    #[test]
    fn input_path_uses_default_on_enter() {
        let mut p = prompter("\n");
        let path = p.input_path("Workspace root", Path::new("/cwd")).unwrap();
        assert_eq!(path, PathBuf::from("/cwd"));

        let mut p = prompter("  ~/code/app \n");
        let path = p.input_path("Workspace root", Path::new("/cwd")).unwrap();
        assert_eq!(path, PathBuf::from("~/code/app"));
    }

    #[test]
    fn confirm_answers() {
        assert!(prompter("y\n").confirm("Proceed?", false).unwrap());
        assert!(prompter("YES\n").confirm("Proceed?", false).unwrap());
        assert!(!prompter("n\n").confirm("Proceed?", true).unwrap());
        assert!(!prompter("\n").confirm("Proceed?", false).unwrap());
        assert!(prompter("\n").confirm("Proceed?", true).unwrap());
    }

    #[test]
    fn confirm_end_of_input_is_no() {
        assert!(!prompter("").confirm("Proceed?", true).unwrap());
    }
}
