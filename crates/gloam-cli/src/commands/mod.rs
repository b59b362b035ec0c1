pub mod check;
pub mod init;
pub mod play;
pub mod replay;

use std::path::Path;

use gloam_engine::StoryPack;

use crate::story;

/// Load and validate a story file, or fall back to the built-in story.
pub fn load_story(path: Option<&Path>) -> Result<StoryPack, String> {
    match path {
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .map_err(|e| format!("cannot read {}: {e}", p.display()))?;
            let pack = StoryPack::from_json(&json).map_err(|e| e.to_string())?;
            pack.validate().map_err(|e| e.to_string())?;
            Ok(pack)
        }
        None => Ok(story::builtin()),
    }
}
