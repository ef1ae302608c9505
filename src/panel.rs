//! Interactive console over a [`UserTableController`].
//!
//! Reads one command per line, runs it against the controller, then prints
//! the banners it raised. With an HTML output path the page is re-rendered
//! after every command.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::api::UserApi;
use crate::config::PanelConfig;
use crate::controller::{EditOutcome, UserTableController};
use crate::error::PanelError;
use crate::notify::render_terminal;
use crate::templates::render_panel;
use crate::util::{spinner, split_args};

pub const HELP: &str = "\
Commands:
  show                              print the user table
  create name=value ...             submit the create form (username, fullname, role, password)
  edit <username> [name=value ...]  open the edit dialog of a row
  set name=value ...                fill fields of the open edit dialog
  save                              save the edit dialog
  close                             close the edit dialog
  delete <username>                 ask to delete a row
  yes | no                          answer the delete confirmation
  html <path>                       write the panel page as HTML
  help                              show this help
  quit                              leave the panel";

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct PanelLine {
    #[command(subcommand)]
    command: PanelCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Show,
    Create { fields: Vec<String> },
    Edit { username: String, fields: Vec<String> },
    Set { fields: Vec<String> },
    Save,
    Close,
    Delete { username: String },
    #[command(alias = "y")]
    Yes,
    #[command(alias = "n")]
    No,
    Html { path: PathBuf },
    Help,
    #[command(alias = "exit")]
    Quit,
}

/// Parse one console line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<PanelCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = split_args(trimmed)?;
    PanelLine::try_parse_from(words)
        .map(|l| Some(l.command))
        .map_err(|e| e.to_string().lines().next().unwrap_or("invalid command").to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct PanelSession<A: UserApi> {
    controller: UserTableController<A>,
    config: PanelConfig,
    html_out: Option<PathBuf>,
}

impl<A: UserApi> PanelSession<A> {
    pub fn new(controller: UserTableController<A>, config: PanelConfig, html_out: Option<PathBuf>) -> Self {
        Self {
            controller,
            config,
            html_out,
        }
    }

    pub fn controller(&self) -> &UserTableController<A> {
        &self.controller
    }

    pub fn render_html(&self) -> Result<String, PanelError> {
        Ok(render_panel(
            self.controller.table(),
            self.controller.banners(),
            self.controller.delete_dialog(),
            self.controller.edit_dialog(),
            &self.config,
        )?)
    }

    pub fn write_html(&self, path: &Path) -> Result<(), PanelError> {
        std::fs::write(path, self.render_html()?)?;
        tracing::debug!(path = %path.display(), "panel page written");
        Ok(())
    }

    /// Run one command; banners stay queued until [`Self::flush`].
    pub async fn execute<W: Write>(&mut self, command: PanelCommand, out: &mut W) -> Result<Flow, PanelError> {
        match command {
            PanelCommand::Show => {
                writeln!(out, "{}", self.controller.table().render_terminal())?;
            }
            PanelCommand::Create { fields } => {
                let form = self.controller.create_form_mut();
                if let Err(e) = form.assign_all(fields.iter().map(String::as_str)) {
                    form.reset();
                    writeln!(out, "{}", e)?;
                    return Ok(Flow::Continue);
                }
                form.normalize_role();
                let pb = spinner("Creating user");
                let n = self.controller.submit_create().await;
                pb.finish_and_clear();
                if !n.is_error() {
                    writeln!(out, "{}", self.controller.table().render_terminal())?;
                }
            }
            PanelCommand::Edit { username, fields } => {
                self.controller.open_edit_dialog(&username);
                self.fill_edit(&fields, out)?;
                writeln!(out, "Editing {}: set name=value, then save or close", username)?;
            }
            PanelCommand::Set { fields } => {
                if !self.controller.edit_dialog().open {
                    writeln!(out, "No user is being edited")?;
                    return Ok(Flow::Continue);
                }
                self.fill_edit(&fields, out)?;
            }
            PanelCommand::Save => {
                let pb = spinner("Saving user");
                let outcome = self.controller.save_edit().await;
                pb.finish_and_clear();
                match outcome {
                    EditOutcome::NotSent => writeln!(out, "No user is being edited")?,
                    EditOutcome::Saved(_) => {
                        writeln!(out, "{}", self.controller.table().render_terminal())?;
                    }
                    EditOutcome::Failed(_) => {}
                }
            }
            PanelCommand::Close => self.controller.close_edit_dialog(),
            PanelCommand::Delete { username } => {
                self.controller.open_delete_dialog(&username);
                writeln!(out, "Delete {}? (yes/no)", username)?;
            }
            PanelCommand::Yes => {
                let pb = spinner("Deleting user");
                let n = self.controller.confirm_delete().await;
                pb.finish_and_clear();
                if n.is_none() {
                    writeln!(out, "Nothing to confirm")?;
                }
            }
            PanelCommand::No => self.controller.cancel_delete(),
            PanelCommand::Html { path } => {
                self.write_html(&path)?;
                writeln!(out, "Wrote {}", path.display())?;
            }
            PanelCommand::Help => writeln!(out, "{}", HELP)?,
            PanelCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn fill_edit<W: Write>(&mut self, fields: &[String], out: &mut W) -> Result<(), PanelError> {
        let form = self.controller.edit_form_mut();
        if let Err(e) = form.assign_all(fields.iter().map(String::as_str)) {
            writeln!(out, "{}", e)?;
        }
        form.normalize_role();
        Ok(())
    }

    /// Refresh the HTML page, then print and dismiss the queued banners.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> Result<(), PanelError> {
        if let Some(path) = self.html_out.clone() {
            self.write_html(&path)?;
        }
        for n in self.controller.take_banners() {
            writeln!(out, "{}", render_terminal(&n))?;
        }
        Ok(())
    }

    /// Read commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), PanelError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", self.controller.table().render_terminal())?;
        self.flush(out)?;
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match parse_command(&line) {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{} (try `help`)", e)?;
                    continue;
                }
            };
            let flow = self.execute(command, out).await?;
            self.flush(out)?;
            if flow == Flow::Quit {
                break;
            }
        }
        tracing::info!("panel session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("show").unwrap(), Some(PanelCommand::Show));
        assert_eq!(parse_command("  # note").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(
            parse_command(r#"edit kim fullname="Jane Doe""#).unwrap(),
            Some(PanelCommand::Edit {
                username: "kim".into(),
                fields: vec!["fullname=Jane Doe".into()],
            })
        );
        assert_eq!(parse_command("y").unwrap(), Some(PanelCommand::Yes));
        assert_eq!(parse_command("exit").unwrap(), Some(PanelCommand::Quit));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(parse_command("frobnicate").is_err());
        assert!(parse_command("delete").is_err());
    }
}
