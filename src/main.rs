use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use macaque::repl::Repl;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(name = "macaque", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: MacaqueCommand,
}

#[derive(Debug, Subcommand)]
pub enum MacaqueCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
    },
    Evaluate {
        path: PathBuf,
    },
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

enum EvalOutcome {
    Success,
    ParseError,
    RuntimeError,
}

fn main() -> ExitCode {
    macaque_main().expect("Encountered an error!")
}

fn macaque_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    let args = CLArgs::parse();
    match args.routine {
        MacaqueCommand::Tokenize { path, format } => {
            let src = read_to_string(path)?;
            if !tokenize(&src, &format) {
                return Ok(ExitCode::from(65));
            }
        }
        MacaqueCommand::Parse { path } => {
            let src = read_to_string(&path)?;
            if !parse(&src, &path) {
                return Ok(ExitCode::from(65));
            }
        }
        MacaqueCommand::Evaluate { path } => {
            let src = read_to_string(&path)?;
            match evaluate(&src, &path) {
                EvalOutcome::Success => {}
                EvalOutcome::ParseError => return Ok(ExitCode::from(65)),
                EvalOutcome::RuntimeError => return Ok(ExitCode::from(70)),
            }
        }
        MacaqueCommand::Repl => {
            let mut repl = Repl::new()?;
            repl.run()?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn tokenize(src: &str, format: &TokenFormat) -> bool {
    use macaque::lexer::formatter::{BasicFormatter, DebugFormatter, LineFormatter, TokenFormatter};
    use macaque::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter::new(src)),
        TokenFormat::Line => Box::new(LineFormatter::new(src, scanner.get_line_breaks())),
    };
    let mut succeeded = true;
    loop {
        let token = scanner.next_token();
        eprintln!("{}", formatter.format(&token));
        if matches!(token.kind, TokenKind::Illegal) {
            succeeded = false;
        }
        if matches!(token.kind, TokenKind::Eof) {
            return succeeded;
        }
    }
}

fn parse(src: &str, path: &Path) -> bool {
    use macaque::parser::formatter::{ParserFormatter, PrettyFormatter};
    use macaque::parser::Parser;

    let (program, errors) = Parser::new(src).parse_program();
    if !errors.is_empty() {
        let formatter = PrettyFormatter::new(src, path);
        for error in errors.iter() {
            eprintln!("{}", formatter.format_error(error));
        }
        return false;
    }
    println!("{program}");
    true
}

fn evaluate(src: &str, path: &Path) -> EvalOutcome {
    use macaque::interpreter::TreeWalkInterpreter;
    use macaque::parser::formatter::{ParserFormatter, PrettyFormatter};
    use macaque::parser::Parser;
    use macaque::value::formatter::{PrettyFormatter as ValuePrettyFormatter, ValueFormatter};

    let (program, errors) = Parser::new(src).parse_program();
    if !errors.is_empty() {
        let formatter = PrettyFormatter::new(src, path);
        for error in errors.iter() {
            eprintln!("{}", formatter.format_error(error));
        }
        return EvalOutcome::ParseError;
    }

    let formatter = ValuePrettyFormatter::new(src, path);
    let mut interpreter = TreeWalkInterpreter::new();
    match interpreter.run(&program) {
        Ok(value) => {
            println!("{}", formatter.format(&value));
            EvalOutcome::Success
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            EvalOutcome::RuntimeError
        }
    }
}
