//! Diagnostic rendering for marshalling errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use pkginfo_parse::{LexErrorKind, SyntaxErrorKind};
use pkginfo_tokenizer::Span;

use crate::MarshalError;

impl MarshalError {
    /// Source location of the failure.
    pub fn span(&self) -> Span {
        match self {
            MarshalError::Syntax(err) => err.span,
            MarshalError::Semantic { span, .. } => *span,
            MarshalError::Schema { span, .. } => *span,
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source
    /// context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span().into();

        match self {
            MarshalError::Syntax(err) => match &err.kind {
                SyntaxErrorKind::Lexical(kind) => {
                    let report = Report::build(ReportKind::Error, (filename, range.clone()))
                        .with_message(kind.to_string())
                        .with_label(
                            Label::new((filename, range))
                                .with_message("scanning stopped here")
                                .with_color(Color::Red),
                        );
                    match kind {
                        LexErrorKind::UnclosedString => {
                            report.with_help("add a closing '\"' before the end of the line")
                        }
                        LexErrorKind::MalformedNumber => {
                            report.with_help("a fraction needs digits after the '.'")
                        }
                        LexErrorKind::MalformedVersion => {
                            report.with_help("version suffixes look like `-1.0` or `-1.0.Extra`")
                        }
                        LexErrorKind::UnexpectedChar => report,
                    }
                }
                SyntaxErrorKind::Parse(kind) => {
                    let label_message = match &err.found {
                        Some(found) => format!("unexpected `{}`", found),
                        None => "unexpected".to_string(),
                    };
                    Report::build(ReportKind::Error, (filename, range.clone()))
                        .with_message(kind.to_string())
                        .with_label(
                            Label::new((filename, range))
                                .with_message(label_message)
                                .with_color(Color::Red),
                        )
                }
            },

            MarshalError::Semantic { message, .. } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(message.clone())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("invalid value")
                            .with_color(Color::Red),
                    )
            }

            MarshalError::Schema { message, .. } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(message.clone())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("does not match the manifest schema")
                            .with_color(Color::Red),
                    )
                    .with_help("`base` is an object of string values; `packages` maps package names to locations")
            }
        }
    }
}
