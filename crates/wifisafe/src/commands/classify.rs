//! `classify` command handler.

use serde::Serialize;
use tabled::Tabled;

use wifisafe_core::classify;
use wifisafe_core::{SecurityScheme, Severity};

use crate::cli::{ClassifyArgs, GlobalOpts};
use crate::output;

#[derive(Debug, Serialize)]
struct Classification {
    capabilities: String,
    scheme: SecurityScheme,
    baseline: Severity,
}

#[derive(Tabled)]
struct ClassificationRow {
    #[tabled(rename = "Capabilities")]
    capabilities: String,
    #[tabled(rename = "Scheme")]
    scheme: String,
    #[tabled(rename = "Baseline")]
    baseline: String,
}

pub fn handle(args: &ClassifyArgs, global: &GlobalOpts) {
    let color = output::should_color(global.color_mode());
    let items: Vec<Classification> = args
        .capabilities
        .iter()
        .map(|raw| Classification {
            capabilities: raw.clone(),
            scheme: classify::classify(raw),
            baseline: classify::baseline(raw),
        })
        .collect();

    let out = output::render_list(
        global.output_format(),
        &items,
        |c| ClassificationRow {
            capabilities: if c.capabilities.is_empty() {
                output::dim("<empty>", color)
            } else {
                c.capabilities.clone()
            },
            scheme: c.scheme.label().to_owned(),
            baseline: output::paint_severity(c.baseline, color),
        },
        |c| c.scheme.to_string(),
    );
    output::print_output(&out, global.quiet);
}
