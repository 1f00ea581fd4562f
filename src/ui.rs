use std::io::{self, IsTerminal};

use crate::app::{BlockLookup, Recommendation, Resolution};
use crate::check::CheckReport;
use crate::insights::BlockInsight;
use crate::resolver::{SearchOutcome, SearchResult};
use crate::sync::SyncReport;

pub fn print_recommendation(rec: &Recommendation) {
    let palette = Palette::auto();
    let preset = &rec.preset;

    println!("{}", palette.heading("Recommended Tone Preset"));
    println!("  band:    {}", preset.band);
    println!("  preset:  {}", preset.preset_name);
    println!("  genre:   {}", preset.genre);
    println!("  amp:     {}", preset.amp_model);
    println!("  cab ir:  {}", preset.cab_ir);
    println!("  effects: {}", preset.effects.join(", "));
    if !preset.summary.is_empty() {
        println!("  summary: {}", preset.summary);
    }
    println!();
    println!("{}", palette.heading("Block Insights"));
    for insight in &rec.insights {
        print_insight_row(insight, &palette);
    }
}

pub fn print_block_lookup(lookup: &BlockLookup) {
    let palette = Palette::auto();
    match &lookup.resolution {
        Resolution::Exact => {}
        Resolution::Fuzzy { score } => println!(
            "{}",
            palette.dim(&format!(
                "closest match for '{}' (score {:.0})",
                lookup.query, score
            ))
        ),
        Resolution::Miss => println!(
            "{}",
            palette.flag(&format!("no block matched '{}'", lookup.query))
        ),
    }
    print_insight_row(&lookup.insight, &palette);
}

pub fn print_insights(insights: &[BlockInsight]) {
    let palette = Palette::auto();
    for insight in insights {
        print_insight_row(insight, &palette);
    }
}

fn print_insight_row(insight: &BlockInsight, palette: &Palette) {
    let required = if insight.required { "yes" } else { "no" };
    let mut line = if insight.is_placeholder() {
        format!(
            "{} {}",
            palette.name(&insight.name),
            palette.flag(&insight.description)
        )
    } else {
        format!("{} {}", palette.name(&insight.name), insight.description)
    };
    if let Some(category) = insight.category.as_deref() {
        line.push(' ');
        line.push_str(&palette.dim(&format!("({category})")));
    }
    println!("{line}");
    println!("  required: {required}");
    if insight.key_parameters.is_empty() {
        println!("  key parameters: n/a");
    } else {
        println!("  key parameters: {}", insight.key_parameters.join(", "));
    }
}

pub fn print_search_result(query: &str, result: &SearchResult) {
    let palette = Palette::auto();
    match &result.outcome {
        SearchOutcome::Alias { target, value } => {
            println!("{} {}", palette.kind(target.as_str()), palette.name(value));
        }
        SearchOutcome::Fuzzy {
            target,
            value,
            score,
        } => {
            println!(
                "{} {} {}",
                palette.kind(target.as_str()),
                palette.name(value),
                palette.dim(&format!("(score {score:.0})"))
            );
        }
        SearchOutcome::Suggestions { bands, genres } => {
            println!("{}", palette.dim(&format!("no confident match for '{query}'")));
            if !bands.is_empty() {
                println!("  bands:  {}", bands.join(", "));
            }
            if !genres.is_empty() {
                println!("  genres: {}", genres.join(", "));
            }
            if bands.is_empty() && genres.is_empty() {
                println!("  nothing close enough to suggest");
            }
        }
    }
    if !result.matched_tags.is_empty() {
        println!(
            "{}",
            palette.dim(&format!("tags: #{}", result.matched_tags.join(" #")))
        );
    }
}

pub fn print_genres(genres: &[String]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Available Genres"));
    if genres.is_empty() {
        println!("{}", palette.dim("no tone files found"));
        return;
    }
    for genre in genres {
        println!("  {genre}");
    }
    println!("{}", palette.dim(&format!("{} genre(s)", genres.len())));
}

pub fn print_sync_report(report: &SyncReport) {
    let palette = Palette::auto();
    println!(
        "{}",
        palette.dim(&format!("{} valid blocks loaded", report.valid_blocks))
    );
    for file in &report.files {
        if file.rewritten {
            println!(
                "{} {} ({} preset(s), {} flagged)",
                palette.flag("corrected"),
                file.genre,
                file.presets_checked,
                file.flagged.len()
            );
            for flagged in &file.flagged {
                println!(
                    "  - '{}' in preset '{}' not found in catalog",
                    flagged.effect, flagged.preset_name
                );
            }
        } else {
            println!(
                "{} {} ({} preset(s))",
                palette.pass("ok"),
                file.genre,
                file.presets_checked
            );
        }
    }
    if report.flagged_count() > 0 {
        println!(
            "{}",
            palette.flag(&format!(
                "{} effect(s) flagged for review",
                report.flagged_count()
            ))
        );
    }
}

pub fn print_check_report(report: &CheckReport) {
    let palette = Palette::auto();
    println!(
        "check scanned_files={} issues={}",
        report.files_scanned,
        report.issues.len()
    );
    for issue in &report.issues {
        println!("  - {}: {}", palette.dim(&issue.path), issue.message);
    }
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn name(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    pub fn kind(&self, text: &str) -> String {
        self.paint("35", &format!("[{}]", text.to_ascii_uppercase()))
    }

    pub fn pass(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn flag(&self, text: &str) -> String {
        self.paint("33", text)
    }
}
