use super::error::ParserError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ParserFormatter {
    /// Formats a parse error into a string.
    fn format_error(&self, error: &ParserError) -> String;
}

/// Emits the bare error message.
pub struct BasicFormatter;

impl ParserFormatter for BasicFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error}")
    }
}

/// Emits a source-annotated report.
pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, error.span.range()))
            .with_code(error.code())
            .with_message("Encountered an error during parsing")
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
