use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use obsidiana_core::glossary::{self, GLOSSARY, GlossaryTerm};

use crate::output::Output;

/// Search terms, definitions, and keywords (accent-insensitive)
pub fn search(query: &str) {
    let output = Output::new();
    let hits = glossary::search(query);

    if hits.is_empty() {
        output.status(&format!("No glossary terms match '{}'", query));
        return;
    }

    for term in hits {
        print_term(&output, term);
    }
    println!();
}

/// The whole glossary at a glance
pub fn list() {
    let output = Output::new();
    output.section(&format!("Glossary ({} terms)", GLOSSARY.len()));

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Term", "Definition"]);
    for term in &GLOSSARY {
        table.add_row(vec![term.term.to_string(), term.definition.to_string()]);
    }
    println!("{table}");
    println!();
    output.status("Read a term in depth with: obsidiana glossary search \"<term>\"");
}

fn print_term(output: &Output, term: &GlossaryTerm) {
    output.section(term.term);
    println!("  {}", term.definition);
    println!();
    println!("  {}", term.perspective.italic());
    output.kv("more", term.wiki_url);
    if !term.keywords.is_empty() {
        let keywords: Vec<String> = term.keywords.iter().map(|k| format!("#{k}")).collect();
        println!("  {}", keywords.join(" ").bright_blue());
    }
}
