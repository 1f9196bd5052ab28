//! Writing a downloaded track to disk: body, timestamps, extended attribute.

use std::fs::{File, FileTimes};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Extended attribute recording the server-provided filename.
/// Linux only accepts namespaced names, so the `user.` namespace is used there.
#[cfg(target_os = "linux")]
pub const ORIGINAL_FILENAME_ATTR: &str = "user.original.filename";
#[cfg(not(target_os = "linux"))]
pub const ORIGINAL_FILENAME_ATTR: &str = "original.filename";

/// Sets extended attributes on written files.
pub trait AttributeStore: Send + Sync {
    fn set(&self, path: &Path, name: &str, value: &[u8]) -> io::Result<()>;
}

/// `setxattr(2)` through libc.
#[derive(Debug, Default, Clone, Copy)]
pub struct XattrStore;

impl AttributeStore for XattrStore {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    fn set(&self, path: &Path, name: &str, value: &[u8]) -> io::Result<()> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let c_name =
            CString::new(name).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let value_ptr = value.as_ptr() as *const libc::c_void;

        #[cfg(target_os = "linux")]
        let r = unsafe { libc::setxattr(c_path.as_ptr(), c_name.as_ptr(), value_ptr, value.len(), 0) };
        #[cfg(target_os = "macos")]
        let r = unsafe {
            libc::setxattr(c_path.as_ptr(), c_name.as_ptr(), value_ptr, value.len(), 0, 0)
        };

        if r == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn set(&self, _path: &Path, _name: &str, _value: &[u8]) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "extended attributes are not supported on this platform",
        ))
    }
}

/// Create or truncate `path` and write `body` to it.
pub fn write_file(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(body)?;
    file.sync_all()
}

/// Set access and modification time of `path` to `when`.
pub fn set_file_times(path: &Path, when: DateTime<Utc>) -> io::Result<()> {
    let t = SystemTime::from(when);
    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(t).set_modified(t))
}
