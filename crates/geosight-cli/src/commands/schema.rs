//! Print the generation config sent with every analysis.

use anyhow::Result;
use geosight_core::analysis::gemini::GenerationConfig;

pub fn execute() -> Result<()> {
    let config = GenerationConfig::for_analysis();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
