//! `sanitize` command handler.

use serde::Serialize;

use wifisafe_core::validate::sanitize_search_query;

use crate::cli::{GlobalOpts, OutputFormat, SanitizeArgs};
use crate::output;

#[derive(Debug, Serialize)]
struct Sanitized<'a> {
    input: &'a str,
    /// `None` means the query filters nothing.
    sanitized: Option<String>,
}

pub fn handle(args: &SanitizeArgs, global: &GlobalOpts) {
    let result = Sanitized {
        input: &args.query,
        sanitized: sanitize_search_query(&args.query),
    };

    let out = match global.output_format() {
        OutputFormat::Table => result
            .sanitized
            .clone()
            .unwrap_or_else(|| "(no filter)".to_owned()),
        format => output::render_single(
            format,
            &result,
            |_| String::new(),
            |r| r.sanitized.clone().unwrap_or_default(),
        ),
    };
    output::print_output(&out, global.quiet);
}
