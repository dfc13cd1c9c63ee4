use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::config::ShellConfig;
use crate::filesystem::{FsError, Listing};
use crate::session::{CdOutcome, Session};
use crate::shell::content_reader::{read_content, read_line_lossy};
use crate::shell::{Command, CommandError};

const UNKNOWN_COMMAND_MESSAGE: &str =
    "ERROR : Incorrect command or file/directory name not entered or other error";
const FAREWELL_MESSAGE: &str = "Exiting the FileSys program.";

/// Line oriented front end over a [`Session`].
///
/// Reads one command per line from `input`, writes results and command
/// errors to `output` and complaints about unknown verbs to `errors`.
pub struct Shell<R, W, E> {
    session: Session,
    config: ShellConfig,
    color: bool,
    input: R,
    output: W,
    errors: E,
}

impl<R: BufRead, W: Write, E: Write> Shell<R, W, E> {
    pub fn new(
        session: Session,
        config: ShellConfig,
        color: bool,
        input: R,
        output: W,
        errors: E,
    ) -> Self {
        Self {
            session,
            config,
            color,
            input,
            output,
            errors,
        }
    }

    /// Runs commands until `exit` or the end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        info!("Shell started");
        while let ControlFlow::Continue(()) = self.step()? {}
        info!("Shell stopped");
        Ok(())
    }

    fn step(&mut self) -> Result<ControlFlow<()>, ShellError> {
        write!(self.output, "{}", self.config.prompt).context(WriteSnafu)?;
        self.output.flush().context(WriteSnafu)?;

        let Some(line) = read_line_lossy(&mut self.input).context(ReadSnafu)? else {
            debug!("End of input reached");
            return Ok(ControlFlow::Break(()));
        };

        match Command::try_from(line.as_str()) {
            Ok(command) => {
                debug!("Executing '{}' in {}", command, self.session.cwd());
                self.execute(command)
            }
            Err(error) => {
                let CommandError::MissingArgument { verb } = &error;
                debug!("Missing argument for '{}' in {:?}", verb, line);
                self.report(&error)?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<ControlFlow<()>, ShellError> {
        match command {
            Command::Create(name) => self.create(&name)?,
            Command::Cat(name) => {
                let shown = self
                    .session
                    .cat(&name)
                    .map(|content| format!("File content of {}\n{}", name, content));
                match shown {
                    Ok(text) => self.say(text)?,
                    Err(error) => self.report(&error)?,
                }
            }
            Command::Rm(name) => match self.session.rm(&name) {
                Ok(()) => self.say(format!("File removed: {}", name))?,
                Err(error) => self.report(&error)?,
            },
            Command::Mkdir(name) => match self.session.mkdir(&name) {
                Ok(_) => self.say(format!("Directory created: {}", name))?,
                Err(error) => self.report(&error)?,
            },
            Command::Rmdir(name) => match self.session.rmdir(&name) {
                Ok(_) => self.say(format!("Directory removed: {}", name))?,
                Err(error) => self.report(&error)?,
            },
            Command::Cd(path) => match self.session.cd(&path) {
                Ok(CdOutcome::Root) => self.say(format!(
                    "Current directory set to root: {}",
                    self.session.pwd()
                ))?,
                Ok(CdOutcome::Parent(name)) => {
                    self.say(format!("Current directory set to parent: {}", name))?
                }
                Ok(CdOutcome::Other(name)) => {
                    self.say(format!("Current directory set: {}", name))?
                }
                Err(error) => self.report(&error)?,
            },
            Command::Ls => self.ls()?,
            Command::Du => self.say(self.session.du())?,
            Command::Pwd => self.say(format!("Current directory path: {}", self.session.pwd()))?,
            Command::Find(name) => {
                for path in self.session.find(&name) {
                    self.say(path)?;
                }
            }
            Command::Exit => {
                self.say(FAREWELL_MESSAGE)?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Unknown(verb) => {
                debug!("Unknown command '{}'", verb);
                let message = self.paint_error(UNKNOWN_COMMAND_MESSAGE);
                writeln!(self.errors, "{}", message).context(WriteSnafu)?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// The name is checked before content is asked for, and the file is
    /// only linked once non-empty content has been collected.
    fn create(&mut self, name: &str) -> Result<(), ShellError> {
        if let Err(error) = self.session.ensure_available(name) {
            return self.report(&error);
        }

        self.say(format!(
            "Enter the content of the file. Type '{}' to finish.",
            self.config.terminator
        ))?;
        let content = read_content(&mut self.input, self.config.terminator).context(ReadSnafu)?;

        match self.session.create_file(name, content) {
            Ok(_) => self.say(format!("File created: {}", name)),
            Err(error) => self.report(&error),
        }
    }

    fn ls(&mut self) -> Result<(), ShellError> {
        match self.session.ls() {
            Listing::Empty => self.say("Empty directory"),
            Listing::Entries { directories, files } => {
                for directory in directories {
                    let entry = format!("{}{}", directory, self.config.directory_marker);
                    let entry = if self.color {
                        entry.as_str().blue().bold().to_string()
                    } else {
                        entry
                    };
                    self.say(entry)?;
                }
                for file in files {
                    self.say(file)?;
                }
                Ok(())
            }
        }
    }

    fn say(&mut self, line: impl Display) -> Result<(), ShellError> {
        writeln!(self.output, "{}", line).context(WriteSnafu)
    }

    fn report(&mut self, error: &dyn ReportableError) -> Result<(), ShellError> {
        let message = self.paint_error(&format!("ERROR: {}", error));
        self.say(message)
    }

    fn paint_error(&self, message: &str) -> String {
        if self.color {
            message.red().to_string()
        } else {
            message.to_string()
        }
    }
}

/// Errors a command can fail with without stopping the shell.
trait ReportableError: Display {}

impl ReportableError for FsError {}
impl ReportableError for CommandError {}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read from the shell input"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Failed to write shell output"))]
    WriteError { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Transcript {
        output: String,
        errors: String,
        session: Session,
    }

    fn run_script(script: &str) -> Transcript {
        run_script_with(script, ShellConfig::default())
    }

    fn run_script_with(script: &str, config: ShellConfig) -> Transcript {
        run_bytes_with(script.as_bytes(), config)
    }

    fn run_bytes_with(script: &[u8], config: ShellConfig) -> Transcript {
        let mut shell = Shell::new(
            Session::new(),
            config,
            false,
            Cursor::new(script),
            Vec::new(),
            Vec::new(),
        );
        shell.run().expect("Shell run failed");
        Transcript {
            output: String::from_utf8(shell.output).expect("Output is not UTF-8"),
            errors: String::from_utf8(shell.errors).expect("Errors are not UTF-8"),
            session: shell.session,
        }
    }

    fn lines(output: &str) -> Vec<&str> {
        output
            .split('\n')
            .map(|line| line.trim_start_matches("prompt> "))
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn pwd_after_navigation() {
        let transcript = run_script("mkdir a\ncd a\nmkdir b\ncd ..\npwd\nfind b\nexit\n");
        assert_eq!(
            lines(&transcript.output),
            vec![
                "Directory created: a",
                "Current directory set: a",
                "Directory created: b",
                "Current directory set to root: /",
                "Current directory path: /",
                "/a/b",
                "Exiting the FileSys program.",
            ]
        );
    }

    #[test]
    fn nested_pwd_and_find_from_root() {
        let transcript = run_script("mkdir a\ncd a\nmkdir b\ncd b\ncd ..\npwd\ncd /\nfind b\n");
        let output = lines(&transcript.output);
        assert!(output.contains(&"Current directory set to parent: a"));
        assert!(output.contains(&"Current directory path: /a"));
        assert_eq!(output.last(), Some(&"/a/b"));
    }

    #[test]
    fn create_and_cat_a_file() {
        let transcript = run_script("create f\nhello~\ncat f\ndu\n");
        assert_eq!(
            lines(&transcript.output),
            vec![
                "Enter the content of the file. Type '~' to finish.",
                "File created: f",
                "File content of f",
                "hello",
                "5",
            ]
        );
        assert_eq!(transcript.session.cat("f").unwrap(), "hello");
    }

    #[test]
    fn create_with_no_content_leaves_no_file() {
        let transcript = run_script("create ghost\n~\nls\n");
        let output = lines(&transcript.output);
        assert!(output.contains(&"ERROR: File 'ghost' not created. No content provided"));
        assert_eq!(output.last(), Some(&"Empty directory"));
        assert_eq!(transcript.session.ls(), Listing::Empty);
    }

    #[test]
    fn create_existing_name_does_not_ask_for_content() {
        let transcript = run_script("mkdir x\ncreate x\nls\n");
        assert_eq!(
            lines(&transcript.output),
            vec![
                "Directory created: x",
                "ERROR: Directory or file with the name 'x' already exists",
                "x (*)",
            ]
        );
    }

    #[test]
    fn duplicate_mkdir_is_reported() {
        let transcript = run_script("mkdir x\nmkdir x\n");
        let output = lines(&transcript.output);
        assert_eq!(output[1], "ERROR: Directory or file with the name 'x' already exists");
        let session = &transcript.session;
        assert_eq!(session.tree().child_count(session.cwd()), 1);
    }

    #[test]
    fn rm_missing_file_is_reported() {
        let transcript = run_script("rm nope\nls\n");
        assert_eq!(
            lines(&transcript.output),
            vec!["ERROR: No file named 'nope' found", "Empty directory"]
        );
    }

    #[test]
    fn ls_lists_directories_first() {
        let transcript = run_script("create b\nx~\nmkdir z\ncreate a\ny~\nmkdir c\nls\n");
        let output = lines(&transcript.output);
        assert_eq!(output[output.len() - 4..], ["c (*)", "z (*)", "a", "b"]);
    }

    #[test]
    fn rmdir_and_rm_report_success() {
        let transcript = run_script("mkdir d\ncreate f\ndata~\nrmdir d\nrm f\nls\n");
        let output = lines(&transcript.output);
        assert!(output.contains(&"Directory removed: d"));
        assert!(output.contains(&"File removed: f"));
        assert_eq!(output.last(), Some(&"Empty directory"));
    }

    #[test]
    fn cd_errors_leave_directory_unchanged() {
        let transcript = run_script("cd ..\ncd missing\npwd\n");
        assert_eq!(
            lines(&transcript.output),
            vec![
                "ERROR: Already at the root directory",
                "ERROR: No directory named 'missing' found",
                "Current directory path: /",
            ]
        );
    }

    #[test]
    fn missing_arguments_are_invalid_commands() {
        let transcript = run_script("create\ncat\nrm\ncd\nfind\n");
        assert_eq!(lines(&transcript.output), vec!["ERROR: Invalid command"; 5]);
    }

    #[test]
    fn unknown_verbs_go_to_the_error_stream() {
        let transcript = run_script("format c:\nexit\n");
        assert_eq!(transcript.errors.trim_end(), UNKNOWN_COMMAND_MESSAGE);
        assert_eq!(lines(&transcript.output), vec![FAREWELL_MESSAGE]);
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_session() {
        let transcript = run_bytes_with(b"mkdir a\n\xff\xfe\npwd\n", ShellConfig::default());
        assert_eq!(
            lines(&transcript.output),
            vec!["Directory created: a", "Current directory path: /"]
        );
        assert_eq!(transcript.errors.trim_end(), UNKNOWN_COMMAND_MESSAGE);
    }

    #[test]
    fn invalid_utf8_content_still_creates_the_file() {
        let transcript = run_bytes_with(b"create f\nna\xefve~\ncat f\n", ShellConfig::default());
        assert!(lines(&transcript.output).contains(&"File created: f"));
        assert_eq!(transcript.session.cat("f").unwrap(), "na\u{FFFD}ve");
    }

    #[test]
    fn exit_stops_reading_input() {
        let transcript = run_script("exit\nmkdir never\n");
        assert_eq!(transcript.session.ls(), Listing::Empty);
    }

    #[test]
    fn config_changes_prompt_marker_and_terminator() {
        let config = ShellConfig {
            prompt: "$ ".to_string(),
            terminator: '#',
            directory_marker: "/".to_string(),
            color: None,
        };
        let transcript = run_script_with("mkdir d\ncreate f\nhi~there#\nls\n", config);
        assert!(transcript.output.starts_with("$ "));
        assert!(transcript.output.contains("Type '#' to finish."));
        assert!(transcript.output.contains("d/\n"));
        assert_eq!(transcript.session.cat("f").unwrap(), "hi~there");
    }
}
