/// Catalog Linter — validates storyline catalogs before they ship.
///
/// Usage: catalog_linter <catalog_path>
///
/// Accepts a single .ron file or a directory of them; every authoring error
/// (dangling chapter references, conflicting branch mechanisms, dead ends,
/// ungated cycles) is reported and the process exits non-zero.

use std::path::Path;
use std::process;
use storyline_engine::core::catalog::StorylineCatalog;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog_path>");
        process::exit(0);
    }

    let catalog_path = Path::new(&args[1]);
    let mut catalog = StorylineCatalog::new();
    let mut failures = 0usize;

    if catalog_path.is_file() {
        lint_file(catalog_path, &mut catalog, &mut failures);
    } else if catalog_path.is_dir() {
        lint_dir(catalog_path, &mut catalog, &mut failures);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }

    println!(
        "Loaded {} storyline(s), {} chapter(s) total",
        catalog.len(),
        catalog.iter().map(|d| d.chapters.len()).sum::<usize>()
    );

    for definition in catalog.iter() {
        let terminals = definition
            .chapters
            .iter()
            .filter(|c| c.resolution)
            .count();
        if terminals == 0 {
            // Reachable only through gated loops; still worth flagging.
            println!(
                "WARN: storyline '{}' has no resolution chapter",
                definition.id
            );
        }
    }

    if failures > 0 {
        eprintln!("{} file(s) failed validation", failures);
        process::exit(1);
    }
    println!("OK");
}

fn lint_file(path: &Path, catalog: &mut StorylineCatalog, failures: &mut usize) {
    match StorylineCatalog::load_from_ron(path) {
        Ok(loaded) => {
            println!("  {} ... ok", path.display());
            catalog.merge(loaded);
        }
        Err(e) => {
            eprintln!("  {} ... ERROR: {}", path.display(), e);
            *failures += 1;
        }
    }
}

fn lint_dir(dir: &Path, catalog: &mut StorylineCatalog, failures: &mut usize) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("ERROR: cannot read '{}': {}", dir.display(), e);
            process::exit(1);
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            lint_dir(&path, catalog, failures);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            lint_file(&path, catalog, failures);
        }
    }
}
