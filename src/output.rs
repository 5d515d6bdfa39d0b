use owo_colors::OwoColorize;

/// sync結果の1行サマリー
pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(published: usize, failures: usize) -> Self {
        match (published, failures) {
            (_, f) if f > 0 => Self {
                prefix: "✗".red().to_string(),
                message: format!(
                    "Done with failures: {} mirrored, {} failed",
                    published.green(),
                    f.red()
                ),
            },
            (p, _) if p > 0 => Self {
                prefix: "✓".green().to_string(),
                message: format!("Done! Total extensions: {}", p.green()),
            },
            _ => Self {
                prefix: "•".yellow().to_string(),
                message: "No matching extensions found".to_string(),
            },
        }
    }
}
