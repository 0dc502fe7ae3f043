// src/output/export.rs

use crate::constants::EXPORT_HEADER_PREFIX;
use crate::core_types::Analysis;

/// Assembles the downloadable document from the sections of an analysis.
///
/// The LICENSE section is left out when no license was found.
pub fn build_export(analysis: &Analysis) -> String {
    let mut doc = String::with_capacity(
        analysis.readme.len() + analysis.license.len() + analysis.structure.len()
            + analysis.contents.len()
            + 128,
    );
    doc.push_str(&format!("{} {}\n\n", EXPORT_HEADER_PREFIX, analysis.repo_url));
    doc.push_str(&format!("## README\n{}\n\n", analysis.readme));
    if analysis.has_license() {
        doc.push_str(&format!("## LICENSE\n{}\n\n", analysis.license));
    }
    doc.push_str(&format!("## Structure\n```\n{}\n```\n\n", analysis.structure));
    doc.push_str(&format!("## Contents\n{}", analysis.contents));
    doc
}

/// Appends a summary section to an export document.
pub fn append_summary(doc: &mut String, summary: &str) {
    if !doc.ends_with('\n') {
        doc.push('\n');
    }
    doc.push_str(&format!("\n## Summary\n{}\n", summary));
}
