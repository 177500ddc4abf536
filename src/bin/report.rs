use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tmdb_explorer::config::PipelineConfig;

fn main() -> Result<()> {
    env_logger::init();

    let mut json = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args_os().skip(1) {
        if arg == "--json" {
            json = true;
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument: {}", arg.to_string_lossy());
        }
    }
    let Some(path) = path else {
        bail!("usage: report <movies.csv|.json|.parquet> [--json]");
    };

    let report = tmdb_explorer::run(&path, &PipelineConfig::default())
        .with_context(|| format!("analysing {}", path.display()))?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("serialising report")?;
        println!("{text}");
    } else {
        print!("{report}");
    }
    Ok(())
}
