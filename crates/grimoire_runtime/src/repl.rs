//! The interactive REPL and script runner.

use std::io::{self, Write};
use std::path::Path;

use grimoire_foundation::{Error, Result};

use crate::editor::{LineEditor, ReadResult, RustylineEditor, default_keywords};
use crate::session::Session;

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    editor: E,
    session: Session,
    show_banner: bool,
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialise.
    pub fn new() -> Result<Self> {
        Ok(Self::with_editor(RustylineEditor::new()?))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL reading from the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            prompt: "grimoire> ".to_string(),
        }
    }

    /// Builder method to set the session.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Builder method to set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Consumes the REPL, returning its session.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Runs the loop until end of input or `quit`.
    ///
    /// Command errors are printed and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            print_banner();
        }
        self.refresh_keywords();
        while self.read_eval_print()? {}
        println!();
        Ok(())
    }

    /// Returns `Ok(false)` when the loop should stop.
    fn read_eval_print(&mut self) -> Result<bool> {
        let line = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(true);
        }
        if matches!(trimmed, "quit" | "exit") {
            return Ok(false);
        }

        self.editor.add_history(trimmed);
        match self.session.execute(trimmed) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => println!("{output}"),
            Err(e) => print_error(&e),
        }
        self.refresh_keywords();
        Ok(true)
    }

    /// Offers the known owners for completion alongside the commands.
    fn refresh_keywords(&mut self) {
        let mut keywords = default_keywords();
        keywords.extend(self.session.store().owners().map(ToString::to_string));
        self.editor.set_keywords(keywords);
    }

    /// Runs a command file through the session.
    ///
    /// # Errors
    ///
    /// See [`Session::run_script`].
    pub fn eval_file(&mut self, path: &Path) -> Result<Vec<String>> {
        self.session.run_script(path)
    }
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}

fn print_banner() {
    println!("\x1b[1;35mGrimoire\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for commands, Ctrl+D to exit.\n");
    let _ = io::stdout().flush();
}
