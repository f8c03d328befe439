//! Segment chain accumulation.

use crate::cancel::CancelToken;
use crate::error::SizeResult;
use crate::layout::Layout;
use relsize_fs::FsProbe;
use std::path::Path;
use tracing::trace;

/// Sums the on-disk bytes of one fork of one storage object.
///
/// Segment 0 is the bare `base` path; segment N appends `.N`. The walk
/// stops at the first missing segment, so a fork with no segment 0
/// sizes to zero. Files growing, shrinking, or vanishing while the walk
/// runs shift the snapshot but never fail it.
///
/// # Errors
///
/// Fails when a stat fails for a reason other than absence, or when
/// `cancel` trips between segments.
pub fn segment_chain_size<F>(probe: &F, base: &Path, cancel: &CancelToken) -> SizeResult<u64>
where
    F: FsProbe + ?Sized,
{
    let mut total: u64 = 0;
    let mut segment: u32 = 0;

    loop {
        cancel.check()?;

        let path = Layout::segment_path(base, segment);
        match probe.stat(&path)? {
            Some(stat) => total += stat.len,
            None => break,
        }
        segment += 1;
    }

    trace!("sized chain at {:?}: {} segments, {} bytes", base, segment, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SizeError;
    use relsize_fs::MemFs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    fn base() -> PathBuf {
        PathBuf::from("/cluster/base/5/1259")
    }

    #[test]
    fn missing_chain_sizes_to_zero() {
        let fs = MemFs::new();
        let total = segment_chain_size(&fs, &base(), &CancelToken::new()).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn single_segment() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 8192);
        let total = segment_chain_size(&fs, &base(), &CancelToken::new()).unwrap();
        assert_eq!(total, 8192);
    }

    #[test]
    fn sums_consecutive_segments() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 1_073_741_824);
        fs.add_file("/cluster/base/5/1259.1", 1_073_741_824);
        fs.add_file("/cluster/base/5/1259.2", 4096);
        let total = segment_chain_size(&fs, &base(), &CancelToken::new()).unwrap();
        assert_eq!(total, 2 * 1_073_741_824 + 4096);
    }

    #[test]
    fn stops_at_the_first_gap() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.add_file("/cluster/base/5/1259.1", 200);
        fs.add_file("/cluster/base/5/1259.3", 400);
        let total = segment_chain_size(&fs, &base(), &CancelToken::new()).unwrap();
        assert_eq!(total, 300);
    }

    #[test]
    fn stat_failures_propagate() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.inject_error("/cluster/base/5/1259.1", ErrorKind::PermissionDenied);
        let err = segment_chain_size(&fs, &base(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, SizeError::Fs(_)));
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = segment_chain_size(&fs, &base(), &cancel).unwrap_err();
        assert!(matches!(err, SizeError::Cancelled));
    }
}
