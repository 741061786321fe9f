//! Typed console command records and session script assembly.
//!
//! Scripts are ordered sequences of [`ConsoleCommand`] values rendered to
//! the console's wire text only at invocation time. The fixed preamble
//! and postamble wrapped around every session are structural constants of
//! [`ConsoleScript::session`], which keeps them testable in isolation and
//! keeps caller data out of string concatenation until render time.

use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};

/// Object-display cap set before any caller command runs, bounding
/// runaway output from large result graphs.
pub const OOPS_DISPLAY_LIMIT: u32 = 100;

/// Byte-display cap set before any caller command runs.
pub const BYTES_DISPLAY_LIMIT: u32 = 1000;

/// Login details for one console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLogin {
    /// Administrative user to authenticate as.
    pub user: String,
    /// The user's password.
    pub password: String,
    /// Stone the session attaches to.
    pub stone: String,
}

/// One command in a console session script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Redirects session output to a log file, appending.
    OutputAppend(Utf8PathBuf),
    /// Records credentials and the target stone for the next login.
    SetLogin(SessionLogin),
    /// Authenticates with the recorded credentials.
    Login,
    /// Caps the number of objects displayed per result.
    LimitOops(u32),
    /// Caps the number of bytes displayed per result.
    LimitBytes(u32),
    /// Displays results as object references.
    DisplayOops,
    /// Prints a full stack when a command raises an error.
    IfErrorStack,
    /// Executes Smalltalk expressions in a single `run` block.
    Run(Vec<String>),
    /// Sources a script file shipped on disk.
    Input(Utf8PathBuf),
    /// Commits the current transaction.
    Commit,
    /// Pops the output redirection installed by `OutputAppend`.
    OutputPop,
    /// Ends the session.
    Exit,
}

impl ConsoleCommand {
    fn render_into(&self, script: &mut String) {
        match self {
            Self::OutputAppend(path) => {
                let _ = writeln!(script, "output append {path}");
            }
            Self::SetLogin(login) => {
                let _ = writeln!(
                    script,
                    "set u {} p {} gemstone {}",
                    login.user, login.password, login.stone
                );
            }
            Self::Login => script.push_str("login\n"),
            Self::LimitOops(limit) => {
                let _ = writeln!(script, "limit oops {limit}");
            }
            Self::LimitBytes(limit) => {
                let _ = writeln!(script, "limit bytes {limit}");
            }
            Self::DisplayOops => script.push_str("display oops\n"),
            Self::IfErrorStack => script.push_str("iferror stack\n"),
            Self::Run(expressions) => {
                script.push_str("run\n");
                script.push_str(&expressions.join(". "));
                script.push_str("\n%\n");
            }
            Self::Input(path) => {
                let _ = writeln!(script, "input {path}");
            }
            Self::Commit => script.push_str("commit\n"),
            Self::OutputPop => script.push_str("output pop\n"),
            Self::Exit => script.push_str("exit\n"),
        }
    }
}

/// An ordered console script, rendered at invocation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleScript {
    commands: Vec<ConsoleCommand>,
}

impl ConsoleScript {
    /// An empty script.
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Assembles the standard session: output redirection to the stone's
    /// console log, login, conservative display limits, error trapping,
    /// then the caller's commands, then output pop and exit.
    pub fn session(
        login: SessionLogin,
        console_log: &Utf8Path,
        commands: Vec<ConsoleCommand>,
    ) -> Self {
        let mut script = Self::new();
        script.push(ConsoleCommand::OutputAppend(console_log.to_path_buf()));
        script.push(ConsoleCommand::SetLogin(login));
        script.push(ConsoleCommand::Login);
        script.push(ConsoleCommand::LimitOops(OOPS_DISPLAY_LIMIT));
        script.push(ConsoleCommand::LimitBytes(BYTES_DISPLAY_LIMIT));
        script.push(ConsoleCommand::DisplayOops);
        script.push(ConsoleCommand::IfErrorStack);
        for command in commands {
            script.push(command);
        }
        script.push(ConsoleCommand::OutputPop);
        script.push(ConsoleCommand::Exit);
        script
    }

    /// Appends one command.
    pub fn push(&mut self, command: ConsoleCommand) {
        self.commands.push(command);
    }

    /// The commands in execution order.
    pub fn commands(&self) -> &[ConsoleCommand] {
        &self.commands
    }

    /// Renders the script to the text fed to the console on stdin.
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for command in &self.commands {
            command.render_into(&mut rendered);
        }
        rendered
    }
}
