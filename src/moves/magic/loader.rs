//! Loads magic tables from a cache file when present, otherwise generates
//! them and writes the cache for next time.

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;
use std::path::{Path, PathBuf};

fn cache_path() -> PathBuf {
    std::env::var_os("OPERA_MAGIC_CACHE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("magic_tables.bin"))
}

fn load_from_path(path: &Path) -> Option<MagicTables> {
    let bytes = std::fs::read(path).ok()?;
    bincode::deserialize(&bytes).ok()
}

fn store_to_path(path: &Path, tables: &MagicTables) {
    if let Ok(bytes) = bincode::serialize(tables) {
        if let Err(e) = std::fs::write(path, bytes) {
            tracing::warn!(error = %e, path = %path.display(), "failed to write magic table cache");
        }
    }
}

/// Returns a working set of magic tables: loaded from the on-disk cache
/// (when the `load_magic` feature is enabled and the cache is valid), or
/// freshly generated otherwise.
pub fn load_magic_tables() -> MagicTables {
    let path = cache_path();

    #[cfg(feature = "load_magic")]
    {
        if let Some(tables) = load_from_path(&path) {
            return tables;
        }
    }

    let tables = generate_magic_tables(MagicTableSeed::Random)
        .expect("magic number search should not exhaust its attempt budget");
    store_to_path(&path, &tables);
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_magic_tables_produces_working_queen_attacks() {
        let tables = load_magic_tables();
        let blockers = 0u64;
        // d4 queen attacks with an empty board should include both the full
        // rank/file (rook component) and both diagonals (bishop component).
        let attacks = tables.queen_attacks(27, blockers);
        assert!(attacks & (1u64 << 31) != 0); // h4, rook ray
        assert!(attacks & (1u64 << 63) != 0); // h8, bishop ray
    }
}
