//! Directory tree summation.

use crate::cancel::CancelToken;
use crate::error::SizeResult;
use relsize_fs::FsProbe;
use std::path::Path;
use tracing::debug;

/// Sums the sizes of every entry in a directory, without recursing.
///
/// Subdirectory entries contribute their inode size, the same number a
/// plain stat reports for them. An entry that vanishes between listing
/// and stat is skipped. Returns `None` when the directory itself does
/// not exist; callers decide whether that means zero or something worth
/// distinguishing.
///
/// # Errors
///
/// Fails when the listing or an entry stat fails for a reason other
/// than absence, or when `cancel` trips mid-walk.
pub fn directory_size<F>(probe: &F, path: &Path, cancel: &CancelToken) -> SizeResult<Option<u64>>
where
    F: FsProbe + ?Sized,
{
    let Some(entries) = probe.list_dir(path)? else {
        return Ok(None);
    };

    let mut total: u64 = 0;
    for name in entries {
        cancel.check()?;

        let entry_path = path.join(&name);
        match probe.stat(&entry_path)? {
            Some(stat) => total += stat.len,
            None => debug!("entry vanished during scan: {:?}", entry_path),
        }
    }
    Ok(Some(total))
}

/// Sums a tablespace root: every entry's own size, plus the
/// non-recursive contents of entries that are directories. One level
/// deep matches the per-database layout inside a tablespace.
///
/// Returns `None` when the root does not exist, which tells a
/// tablespace that was never created apart from one that is merely
/// empty.
pub fn tablespace_dir_size<F>(probe: &F, root: &Path, cancel: &CancelToken) -> SizeResult<Option<u64>>
where
    F: FsProbe + ?Sized,
{
    let Some(entries) = probe.list_dir(root)? else {
        return Ok(None);
    };

    let mut total: u64 = 0;
    for name in entries {
        cancel.check()?;

        let entry_path = root.join(&name);
        let stat = match probe.stat(&entry_path)? {
            Some(stat) => stat,
            None => continue,
        };

        if stat.is_dir {
            total += directory_size(probe, &entry_path, cancel)?.unwrap_or(0);
        }
        total += stat.len;
    }
    Ok(Some(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SizeError;
    use relsize_fs::{MemFs, DIR_LEN};
    use std::io::ErrorKind;
    use std::path::Path;

    #[test]
    fn missing_directory_is_none() {
        let fs = MemFs::new();
        let cancel = CancelToken::new();
        assert_eq!(directory_size(&fs, Path::new("/cluster/base/5"), &cancel).unwrap(), None);
        assert_eq!(tablespace_dir_size(&fs, Path::new("/cluster/base"), &cancel).unwrap(), None);
    }

    #[test]
    fn empty_directory_is_zero() {
        let fs = MemFs::new();
        fs.add_dir("/cluster/base/5");
        let total = directory_size(&fs, Path::new("/cluster/base/5"), &CancelToken::new()).unwrap();
        assert_eq!(total, Some(0));
    }

    #[test]
    fn sums_flat_entries() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.add_file("/cluster/base/5/1259_fsm", 20);
        fs.add_file("/cluster/base/5/2000", 300);
        let total = directory_size(&fs, Path::new("/cluster/base/5"), &CancelToken::new()).unwrap();
        assert_eq!(total, Some(420));
    }

    #[test]
    fn subdirectories_count_their_inode_size_only() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.add_file("/cluster/base/5/junk/inner", 5000);
        let total = directory_size(&fs, Path::new("/cluster/base/5"), &CancelToken::new()).unwrap();
        assert_eq!(total, Some(100 + DIR_LEN));
    }

    #[test]
    fn vanished_entries_are_skipped() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.add_file("/cluster/base/5/2000", 300);
        // A NotFound fault reads as absence, like a file unlinked
        // between listing and stat.
        fs.inject_error("/cluster/base/5/2000", ErrorKind::NotFound);
        let total = directory_size(&fs, Path::new("/cluster/base/5"), &CancelToken::new()).unwrap();
        assert_eq!(total, Some(100));
    }

    #[test]
    fn entry_stat_failures_are_fatal() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.inject_error("/cluster/base/5/1259", ErrorKind::PermissionDenied);
        let err = directory_size(&fs, Path::new("/cluster/base/5"), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, SizeError::Fs(_)));
    }

    #[test]
    fn tablespace_sum_descends_one_level() {
        let fs = MemFs::new();
        fs.add_file("/cluster/tablespaces/7/v1/5/4000", 700);
        fs.add_file("/cluster/tablespaces/7/v1/5/4000_vm", 30);
        fs.add_file("/cluster/tablespaces/7/v1/9/5000", 1000);
        fs.add_file("/cluster/tablespaces/7/v1/loose", 11);
        let total =
            tablespace_dir_size(&fs, Path::new("/cluster/tablespaces/7/v1"), &CancelToken::new()).unwrap();
        // Two database directories contribute their contents plus their
        // own inode size; the loose file only itself.
        assert_eq!(total, Some(700 + 30 + 1000 + 11 + 2 * DIR_LEN));
    }

    #[test]
    fn tablespace_sum_does_not_recurse_deeper() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        fs.add_file("/cluster/base/5/nested/deep", 9999);
        let total = tablespace_dir_size(&fs, Path::new("/cluster/base"), &CancelToken::new()).unwrap();
        // db dir inode + contents; the nested dir counts as an inode
        // inside the db dir, its contents stay invisible.
        assert_eq!(total, Some(DIR_LEN + 100 + DIR_LEN));
    }

    #[test]
    fn cancellation_propagates_from_inner_walks() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1259", 100);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = tablespace_dir_size(&fs, Path::new("/cluster/base"), &cancel).unwrap_err();
        assert!(matches!(err, SizeError::Cancelled));
    }
}
