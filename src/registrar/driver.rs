use std::path::PathBuf;

use crate::spooler::models::ResolvedDriver;

/// CUPS ships this model with every install, so falling back to it always
/// yields a working (if featureless) PostScript queue.
pub const GENERIC_FALLBACK_DRIVER: &str = "drv:///sample.drv/generic.ppd";

/// Picks the first driver candidate that exists on disk, in the order the
/// configuration lists them. Resolution is computed fresh on every install and
/// never persisted.
pub fn resolve_driver(candidates: &[PathBuf], generic: &str) -> ResolvedDriver {
    candidates
        .iter()
        .find(|path| path.is_file())
        .map(|path| ResolvedDriver::Ppd(path.clone()))
        .unwrap_or_else(|| ResolvedDriver::Model(generic.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn no_existing_candidate_resolves_to_generic_fallback() {
        let candidates = vec![PathBuf::from("/nope/a.ppd"), PathBuf::from("/nope/b.ppd")];
        assert_eq!(
            resolve_driver(&candidates, GENERIC_FALLBACK_DRIVER),
            ResolvedDriver::Model(GENERIC_FALLBACK_DRIVER.to_string())
        );
    }

    #[test]
    fn empty_candidate_list_resolves_to_generic_fallback() {
        assert_eq!(
            resolve_driver(&[], GENERIC_FALLBACK_DRIVER),
            ResolvedDriver::Model(GENERIC_FALLBACK_DRIVER.to_string())
        );
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.ppd");
        let second = dir.path().join("second.ppd");
        fs::write(&first, "*PPD-Adobe: \"4.3\"\n").unwrap();
        fs::write(&second, "*PPD-Adobe: \"4.3\"\n").unwrap();

        let candidates = vec![first.clone(), second];
        assert_eq!(
            resolve_driver(&candidates, GENERIC_FALLBACK_DRIVER),
            ResolvedDriver::Ppd(first)
        );
    }

    #[test]
    fn missing_candidates_are_skipped_in_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ppd");
        let present = dir.path().join("present.ppd");
        fs::write(&present, "*PPD-Adobe: \"4.3\"\n").unwrap();

        let candidates = vec![missing, present.clone()];
        assert_eq!(
            resolve_driver(&candidates, GENERIC_FALLBACK_DRIVER),
            ResolvedDriver::Ppd(present)
        );
    }

    #[test]
    fn directories_do_not_count_as_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![dir.path().to_path_buf()];
        assert_eq!(
            resolve_driver(&candidates, GENERIC_FALLBACK_DRIVER),
            ResolvedDriver::Model(GENERIC_FALLBACK_DRIVER.to_string())
        );
    }
}
