//! Download saver

use std::path::PathBuf;

use stock_storage::Database;

use crate::direct::DirectPath;
use crate::managed::ManagedInsertion;
use crate::registry::MediaRegistry;
use crate::request::{SaveRequest, SaveResult};
use crate::strategy::{StorageCapability, StorageStrategy};
use crate::Result;

/// Entry point for saving byte buffers into Downloads.
///
/// Holds no per-call state, so one saver can serve concurrent callers.
pub struct DownloadSaver {
    strategy: Box<dyn StorageStrategy>,
}

impl DownloadSaver {
    pub fn new<S: StorageStrategy + 'static>(strategy: S) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Saver backed by the shared storage registry in `db`, publishing under
    /// `volume_root`.
    pub fn managed(db: Database, volume_root: PathBuf) -> Self {
        Self::new(ManagedInsertion::new(MediaRegistry::new(db, volume_root)))
    }

    /// Saver writing straight into `downloads_dir`.
    pub fn direct(downloads_dir: PathBuf) -> Self {
        Self::new(DirectPath::new(downloads_dir))
    }

    pub fn capability(&self) -> StorageCapability {
        self.strategy.capability()
    }

    /// Validate the arguments, then write them as one file in Downloads.
    pub fn save(&self, bytes: Option<&[u8]>, file_name: Option<&str>) -> Result<SaveResult> {
        let request = SaveRequest::new(bytes, file_name)?;
        self.save_request(&request)
    }

    pub fn save_request(&self, request: &SaveRequest<'_>) -> Result<SaveResult> {
        tracing::debug!(
            file_name = request.file_name(),
            size = request.bytes().len(),
            strategy = self.capability().as_str(),
            "Saving to Downloads"
        );

        self.strategy.save(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaveError;
    use crate::registry::DOWNLOADS_FOLDER_NAME;
    use std::fs;

    fn savers(root: &std::path::Path) -> Vec<DownloadSaver> {
        vec![
            DownloadSaver::direct(root.join("direct")),
            DownloadSaver::managed(Database::open_in_memory().unwrap(), root.join("managed")),
        ]
    }

    #[test]
    fn test_round_trip_on_both_strategies() {
        let dir = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

        for saver in savers(dir.path()) {
            let result = saver.save(Some(bytes.as_slice()), Some("export.bin")).unwrap();
            assert_eq!(fs::read(&result.path).unwrap(), bytes, "{:?}", saver.capability());
        }
    }

    #[test]
    fn test_invalid_arguments_perform_no_io() {
        let dir = tempfile::tempdir().unwrap();

        for saver in savers(dir.path()) {
            let err = saver.save(None, Some("a.txt")).unwrap_err();
            assert!(matches!(err, SaveError::InvalidArgument(_)));

            let err = saver.save(Some(&b"data"[..]), None).unwrap_err();
            assert!(matches!(err, SaveError::InvalidArgument(_)));

            let err = saver.save(Some(&b"data"[..]), Some("")).unwrap_err();
            assert!(matches!(err, SaveError::InvalidArgument(_)));
        }

        assert!(!dir.path().join("direct").exists());
        assert!(!dir.path().join("managed").join(DOWNLOADS_FOLDER_NAME).exists());
    }

    #[test]
    fn test_concurrent_saves_are_independent() {
        let dir = tempfile::tempdir().unwrap();

        for saver in savers(dir.path()) {
            let results: Vec<(String, SaveResult)> = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|i| {
                        let saver = &saver;
                        scope.spawn(move || {
                            let contents = format!("file number {i}");
                            let name = format!("part-{i}.txt");
                            let result = saver
                                .save(Some(contents.as_bytes()), Some(name.as_str()))
                                .unwrap();
                            (contents, result)
                        })
                    })
                    .collect();

                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let mut paths: Vec<&str> = results.iter().map(|(_, r)| r.path.as_str()).collect();
            paths.sort();
            paths.dedup();
            assert_eq!(paths.len(), 8);

            for (contents, result) in &results {
                assert_eq!(fs::read_to_string(&result.path).unwrap(), *contents);
            }
        }
    }

    #[test]
    fn test_concurrent_managed_saves_with_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DownloadSaver::managed(Database::open_in_memory().unwrap(), dir.path().into());

        let mut paths: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| saver.save(Some(&b"same"[..]), Some("dup.txt")).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap().path).collect()
        });

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_capability() {
        let dir = tempfile::tempdir().unwrap();
        let kinds: Vec<StorageCapability> =
            savers(dir.path()).iter().map(DownloadSaver::capability).collect();
        assert_eq!(
            kinds,
            vec![StorageCapability::DirectPath, StorageCapability::ManagedInsertion]
        );
    }
}
