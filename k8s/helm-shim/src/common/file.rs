use crate::common::error::{Result, TempFileCreation, WriteToTempFile};
use snafu::ResultExt;
use std::io::Write;
use tempfile::{NamedTempFile as TempFile, TempPath};

/// Create a new uniquely named temporary file and write the buffer to it. The file handle is
/// closed, the returned path deletes the file when it is dropped.
pub(crate) fn write_to_tempfile(buf: &[u8]) -> Result<TempPath> {
    let mut handle = TempFile::new().context(TempFileCreation)?;

    handle.write_all(buf).context(WriteToTempFile {
        filepath: handle.path().to_path_buf(),
    })?;
    handle.flush().context(WriteToTempFile {
        filepath: handle.path().to_path_buf(),
    })?;

    Ok(handle.into_temp_path())
}
