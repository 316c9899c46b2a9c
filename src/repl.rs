use crate::interpreter::TreeWalkInterpreter;
use crate::parser::Parser;
use crate::value::formatter::{BasicFormatter, ValueFormatter};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

/// A read-eval loop that keeps its environment across lines.
pub struct Repl {
    interpreter: TreeWalkInterpreter,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> rustyline::Result<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Self {
            interpreter: TreeWalkInterpreter::new(),
            editor,
        })
    }

    /// Reads lines until end of input or a quit command.
    pub fn run(&mut self) -> rustyline::Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    if input == ":q" || input == ":quit" {
                        break;
                    }
                    self.eval_line(&line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn eval_line(&mut self, line: &str) {
        let (program, errors) = Parser::new(line).parse_program();
        if !errors.is_empty() {
            for error in errors.iter() {
                eprintln!("\t{error}");
            }
            return;
        }

        let formatter = BasicFormatter;
        match self.interpreter.run(&program) {
            Ok(value) => println!("{}", formatter.format(&value)),
            Err(error) => println!("{}", formatter.format_error(&error)),
        }
    }
}
