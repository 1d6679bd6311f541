use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::LoadError;
use crate::kernel::{ProcessControlBlock, PCB_SIZE};

/// Copies the PCB file so the original is never touched, returning the
/// path to read from.
pub fn make_working_copy(source: &Path, copy: &Path) -> Result<PathBuf, LoadError> {
    fs::copy(source, copy).map_err(|source| LoadError::Io {
        path: copy.to_path_buf(),
        source,
    })?;

    info!("copied {} to {}", source.display(), copy.display());
    Ok(copy.to_path_buf())
}

/// Reads every PCB record in file order.
pub fn load_pcbs(path: &Path) -> Result<Vec<ProcessControlBlock>, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let pcbs = parse_pcbs(&data)?;
    debug!("loaded {} PCB(s) from {}", pcbs.len(), path.display());
    Ok(pcbs)
}

/// Decodes a whole job stream. The length is checked before anything is built.
pub fn parse_pcbs(data: &[u8]) -> Result<Vec<ProcessControlBlock>, LoadError> {
    if data.len() % PCB_SIZE != 0 {
        return Err(LoadError::Truncated(data.len()));
    }

    let mut pcbs = Vec::with_capacity(data.len() / PCB_SIZE);
    for chunk in data.chunks_exact(PCB_SIZE) {
        let record: &[u8; PCB_SIZE] = chunk
            .try_into()
            .map_err(|_| LoadError::Truncated(data.len()))?;
        pcbs.push(ProcessControlBlock::from_bytes(record));
    }

    Ok(pcbs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn record(process_id: i32, burst_time: i32) -> [u8; PCB_SIZE] {
        ProcessControlBlock {
            priority: 2,
            name: *b"worker\0\0\0\0\0\0\0\0\0\0",
            process_id,
            activity_status: 1,
            base_register: 0,
            limit_register: 512,
            burst_time,
        }
        .to_bytes()
    }

    #[test]
    fn test_loader_parse_in_order() {
        let data: Vec<u8> = [record(1, 10), record(2, 20)].concat();
        let pcbs = parse_pcbs(&data).unwrap();

        assert_eq!(pcbs.len(), 2);
        assert_eq!(pcbs[0].process_id, 1);
        assert_eq!(pcbs[1].burst_time, 20);
        assert_eq!(pcbs[1].get_name(), "worker");
    }

    #[test]
    fn test_loader_empty_stream() {
        assert!(parse_pcbs(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_loader_rejects_partial_record() {
        let mut data = record(1, 10).to_vec();
        data.pop();
        assert!(matches!(parse_pcbs(&data), Err(LoadError::Truncated(37))));
    }

    #[test]
    fn test_loader_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(&record(7, 45)).unwrap();

        let pcbs = load_pcbs(file.path()).unwrap();
        assert_eq!(pcbs.len(), 1);
        assert_eq!(pcbs[0].process_id, 7);
    }

    #[test]
    fn test_loader_missing_file() {
        let err = load_pcbs(Path::new("/nonexistent/jobs.bin")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_loader_working_copy_leaves_original() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("jobs.bin");
        fs::write(&original, record(3, 30)).unwrap();

        let copy = make_working_copy(&original, &dir.path().join("pcbFile.bin")).unwrap();
        let pcbs = load_pcbs(&copy).unwrap();

        assert_eq!(pcbs[0].process_id, 3);
        assert_eq!(fs::read(&original).unwrap(), record(3, 30));
    }
}
