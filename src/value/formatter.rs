use super::error::RuntimeError;
use super::MonkeyValue;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    /// Formats a value the way the runtime presents it.
    fn format(&self, value: &MonkeyValue) -> String;
    /// Formats a runtime error into a string.
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct BasicFormatter;

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &MonkeyValue) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("ERROR: {error}")
    }
}

/// Emits a source-annotated report for errors.
pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &MonkeyValue) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, error.span.range()))
            .with_code(error.code())
            .with_message("Encountered an error during evaluation")
            .with_label(
                Label::new((path, error.span.range()))
                    .with_message(format!("{}", error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
