//! The `trailmap init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("trailmap.toml").exists() {
        println!("trailmap.toml already exists, skipping.");
    } else {
        std::fs::write("trailmap.toml", SAMPLE_CONFIG)?;
        println!("Created trailmap.toml");
    }

    std::fs::create_dir_all("datasets")?;
    let example_path = std::path::Path::new("datasets/example.toml");
    if example_path.exists() {
        println!("datasets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: trailmap validate --dataset datasets/example.toml");
    println!("  2. Run: trailmap leaderboard --dataset datasets/example.toml --course intro");
    println!("  3. Run: trailmap report --dataset datasets/example.toml --user alice");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# trailmap configuration

output_dir = "./trailmap-reports"
default_format = "html"
leaderboard_top = 10

# Wave shape for pathways with more than five stops.
[layout]
base_y = 85.0
end_y = 25.0
amplitude = 20.0
frequency = 2.0
"#;

const EXAMPLE_DATASET: &str = r#"[dataset]
id = "example"
name = "Example Cohort"

[[learners]]
id = "alice"
name = "Alice"

[[learners]]
id = "bob"
name = "Bob"

[[courses]]
id = "intro"
name = "Introduction"

[[courses.sections]]
id = "welcome"
name = "Welcome"

[[courses.sections.items]]
id = "orientation"
name = "Orientation"

[[courses.sections.items]]
id = "first-quiz"
name = "First quiz"

[[completions]]
user_id = "alice"
item_id = "orientation"

[[scores]]
user_id = "bob"
course_id = "intro"
score = 40.0
"#;
