//! Postpad smoke binary.
//!
//! # Responsibility
//! - Exercise the core crate end to end against a throwaway in-memory
//!   database: create one tagged post, read it back, delete it.
//! - Keep output deterministic for quick local sanity checks.

use postpad_core::db::open_db_in_memory;
use postpad_core::{default_log_level, init_logging, PostDraft, PostService, SqlitePostRepository};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("postpad_core version={}", postpad_core::core_version());

    let log_dir = std::env::temp_dir().join("postpad-logs");
    match log_dir.to_str() {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        None => eprintln!("logging disabled: temp dir is not valid UTF-8"),
    }

    let mut conn = open_db_in_memory()?;
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let created = service.create(&PostDraft {
        title: "smoke".to_string(),
        content: "probe".to_string(),
        tags: vec![
            "Smoke".to_string(),
            "smoke".to_string(),
            "probe".to_string(),
        ],
    })?;
    println!(
        "created post id={} stored_tags={:?}",
        created.id, created.tags
    );

    let loaded = service.get(created.id)?;
    println!("read back display_tags={:?}", loaded.tags);

    service.delete_by_id(created.id)?;
    println!("deleted post id={}", created.id);

    Ok(())
}
