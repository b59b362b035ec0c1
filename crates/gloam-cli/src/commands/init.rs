use std::path::Path;

use crate::story;

pub fn run(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("{} already exists", path.display()));
    }

    let json = story::builtin()
        .to_json()
        .map_err(|e| format!("cannot serialize story: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    println!("  Created story template '{}'", path.display());
    println!("  Edit it, then: gloam check --story {}", path.display());
    Ok(())
}
