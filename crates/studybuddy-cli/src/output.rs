//! Output formatting for studybuddy (text, json)

use std::time::Duration;

use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use studybuddy_client::DisplayContent;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// The result display text (default)
    #[default]
    Text,
    /// Only the response body, as JSON
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Spinner that shows the in-flight status text, starting at `status`
    pub fn spinner(&self, status: &'static str) -> ProgressBar {
        if self.quiet || self.format == OutputFormat::Json {
            return ProgressBar::hidden().with_message(status);
        }

        let pb = ProgressBar::new_spinner().with_message(status);
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Print the final display content in the configured format
    pub fn print_outcome(&self, content: &DisplayContent) {
        match self.format {
            OutputFormat::Text => self.print_text(content),
            OutputFormat::Json => match content {
                DisplayContent::Success(body) | DisplayContent::ServerError(body) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
                    );
                }
                DisplayContent::Exception(_) => self.error(&content.render()),
                DisplayContent::Empty | DisplayContent::Status(_) => {}
            },
        }
    }

    fn print_text(&self, content: &DisplayContent) {
        let text = content.render();
        match content {
            DisplayContent::Success(_) => print_framed(&text, |head| head.green().bold()),
            DisplayContent::ServerError(_) => print_framed(&text, |head| head.red().bold()),
            DisplayContent::Exception(_) => self.error(&text),
            // a finished submission never leaves these behind
            DisplayContent::Empty | DisplayContent::Status(_) => {}
        }
    }
}

/// Print text with its first line styled
fn print_framed(text: &str, style: impl Fn(&str) -> colored::ColoredString) {
    match text.split_once('\n') {
        Some((head, rest)) => println!("{}\n{}", style(head), rest),
        None => println!("{}", style(text)),
    }
}
