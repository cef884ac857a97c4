//! Tar archive creation for staged releases.
//!
//! Archives are uncompressed and rooted at the staging directory's own name,
//! so unpacking `MagicGS-v42.tar` yields a `MagicGS-v42/` directory. Entries
//! are written in sorted order with deterministic headers, which makes two
//! archives of the same tree byte-identical.
//!
//! The archive is built in a temporary file beside the destination and only
//! renamed over `archive_path` once complete, so a failed run leaves any
//! earlier archive at that path untouched.

use camino::Utf8Path;
use std::fs;
use std::io::{self, BufWriter, Write};
use tar::{Builder, HeaderMode};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Write an uncompressed tar of `source_dir` to `archive_path`.
///
/// # Errors
///
/// Returns an I/O error if the source tree cannot be walked or read, or the
/// archive cannot be written. `archive_path` is not modified on error.
pub fn write_tar(source_dir: &Utf8Path, archive_path: &Utf8Path) -> io::Result<()> {
    let root_name = source_dir.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source_dir} has no directory name"),
        )
    })?;

    let parent = archive_path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".gs-package")
        .suffix(".tar.tmp")
        .tempfile_in(parent)?;

    let mut builder = Builder::new(BufWriter::new(temp));
    builder.mode(HeaderMode::Deterministic);
    builder.follow_symlinks(true);

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let name = std::path::Path::new(root_name).join(relative);

        if entry.file_type().is_dir() {
            builder.append_dir(&name, entry.path())?;
        } else {
            builder.append_path_with_name(entry.path(), &name)?;
        }
    }

    let mut writer = builder.into_inner()?;
    writer.flush()?;
    let temp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    set_archive_permissions(temp.as_file())?;
    temp.persist(archive_path).map_err(|e| e.error)?;
    Ok(())
}

/// Give the finished archive ordinary file permissions instead of the
/// owner-only mode temporary files are created with.
#[cfg(unix)]
fn set_archive_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_archive_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_entries(archive_path: &Utf8Path) -> Vec<(String, Vec<u8>)> {
        let file = fs::File::open(archive_path).expect("open archive");
        let mut archive = tar::Archive::new(file);
        archive
            .entries()
            .expect("entries")
            .map(|e| {
                let mut entry = e.expect("entry");
                let path = entry.path().expect("path").to_string_lossy().into_owned();
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).expect("read entry");
                (path, bytes)
            })
            .collect()
    }

    fn staged_tree(root: &Utf8Path) -> Utf8PathBuf {
        let staging = root.join("MagicGS-v3");
        fs::create_dir_all(staging.join("lang")).expect("mkdir");
        fs::write(staging.join("main.nut"), "function Start() {}").expect("write main");
        fs::write(staging.join("lang/en.txt"), "STR_X :x").expect("write lang");
        staging
    }

    #[test]
    fn entries_are_rooted_at_the_directory_name() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let staging = staged_tree(&root);
        let archive = root.join("MagicGS-v3.tar");

        write_tar(&staging, &archive).expect("archive written");

        let names: Vec<String> = read_entries(&archive).into_iter().map(|(n, _)| n).collect();
        assert!(names.iter().all(|n| n.starts_with("MagicGS-v3")));
        assert!(names.contains(&"MagicGS-v3/main.nut".to_owned()));
        assert!(names.contains(&"MagicGS-v3/lang/en.txt".to_owned()));
    }

    #[test]
    fn file_contents_survive_archiving() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let staging = staged_tree(&root);
        let archive = root.join("MagicGS-v3.tar");

        write_tar(&staging, &archive).expect("archive written");

        let entries = read_entries(&archive);
        let (_, bytes) = entries
            .iter()
            .find(|(n, _)| n == "MagicGS-v3/lang/en.txt")
            .expect("lang entry present");
        assert_eq!(bytes.as_slice(), b"STR_X :x");
    }

    #[test]
    fn repeated_archives_are_byte_identical() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let staging = staged_tree(&root);

        write_tar(&staging, &root.join("first.tar")).expect("first archive");
        write_tar(&staging, &root.join("second.tar")).expect("second archive");

        assert_eq!(
            fs::read(root.join("first.tar")).expect("read first"),
            fs::read(root.join("second.tar")).expect("read second")
        );
    }

    #[test]
    fn failed_write_keeps_the_previous_archive() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let archive = root.join("MagicGS-v3.tar");
        fs::write(&archive, "previous release").expect("write previous archive");

        let result = write_tar(&root.join("MagicGS-v3"), &archive);

        assert!(result.is_err());
        assert_eq!(
            fs::read_to_string(&archive).expect("read previous archive"),
            "previous release"
        );
        let leftovers: Vec<_> = fs::read_dir(&root)
            .expect("read root")
            .filter_map(Result::ok)
            .map(|e| e.file_name())
            .collect();
        assert_eq!(leftovers, ["MagicGS-v3.tar"]);
    }

    #[test]
    fn successful_write_replaces_the_previous_archive() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let staging = staged_tree(&root);
        let archive = root.join("MagicGS-v3.tar");
        fs::write(&archive, "previous release").expect("write previous archive");

        write_tar(&staging, &archive).expect("archive written");

        let names: Vec<String> = read_entries(&archive).into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"MagicGS-v3/main.nut".to_owned()));
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");

        let result = write_tar(&root.join("absent"), &root.join("absent.tar"));
        assert!(result.is_err());
    }
}
