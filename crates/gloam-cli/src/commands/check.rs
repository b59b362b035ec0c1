use std::path::Path;

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;

use gloam_core::NodeKind;

pub fn run(story: Option<&Path>) -> Result<(), String> {
    let pack = super::load_story(story)?;

    println!("  Story: {}", pack.name);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["node", "kind", "requires", "site", "start"]);
    for node in &pack.content.nodes {
        let requires: Vec<&str> = node.requires.iter().map(|id| id.as_str()).collect();
        table.add_row(vec![
            node.id.as_str().to_string(),
            node.kind.to_string(),
            requires.join(", "),
            node.site
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            if node.unlocked { "open".to_string() } else { String::new() },
        ]);
    }
    println!("{table}");

    let rooms = pack
        .content
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Room)
        .count();
    println!(
        "  {} nodes ({rooms} rooms), {} beats, start: {}",
        pack.content.nodes.len(),
        pack.beats.len(),
        pack.content.start
    );
    println!(
        "  presence: watch {} / active {} / breach {} (max {}), countdown {} ticks",
        pack.presence.watch_at,
        pack.presence.active_at,
        pack.presence.breach_at,
        pack.presence.max_score,
        pack.presence.breach_countdown
    );

    Ok(())
}
