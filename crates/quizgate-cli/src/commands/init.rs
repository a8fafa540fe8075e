//! The `quizgate init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgate.toml").exists() {
        println!("quizgate.toml already exists, skipping.");
    } else {
        std::fs::write("quizgate.toml", SAMPLE_CONFIG)?;
        println!("Created quizgate.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust the thresholds in quizgate.toml");
    println!("  2. Run: quizgate check --candidates output.json --context source.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgate configuration

# Questions whose tokens overlap the context less than this are dropped.
min_grounding = 0.25

# Context is cut to this many characters before scoring.
max_context_chars = 50000

# Label written into response envelopes.
provider = "offline"

# Choice lengths outside [lower * mean, upper * mean] raise an advisory.
[distractor_band]
lower = 0.6
upper = 1.4
"#;
