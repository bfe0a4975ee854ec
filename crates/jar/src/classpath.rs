//! Classpath entries: jar archives and class directories.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;
use zip::ZipArchive;

/// One element of an artifact's classpath.
pub enum ClasspathEntry {
    Archive(JarArchive),
    Directory(PathBuf),
}

impl ClasspathEntry {
    /// Open `path`, detecting archives by their zip magic rather than extension.
    pub fn open(path: &Path) -> io::Result<Self> {
        let path = fs::canonicalize(path)?;
        if path.is_dir() {
            return Ok(ClasspathEntry::Directory(path));
        }

        let mut file = File::open(&path)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;

        match &magic {
            // ZIP magic: PK\x03\x04 or PK\x05\x06 (empty) or PK\x07\x08 (spanned)
            [0x50, 0x4B, _, _] => {
                file.seek(SeekFrom::Start(0))?;
                Ok(ClasspathEntry::Archive(JarArchive::new(path, file)?))
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is neither a directory nor a jar archive", path.display()),
            )),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::Archive(jar) => &jar.path,
            ClasspathEntry::Directory(root) => root,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            ClasspathEntry::Archive(jar) => jar.entries.contains(name),
            ClasspathEntry::Directory(root) => {
                is_relative_entry(name) && root.join(name).is_file()
            }
        }
    }

    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        match self {
            ClasspathEntry::Archive(jar) => jar.read(name),
            ClasspathEntry::Directory(root) if is_relative_entry(name) => fs::read(root.join(name)),
            ClasspathEntry::Directory(root) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} escapes classpath directory {}", name, root.display()),
            )),
        }
    }

    /// Every file name in this entry, `/`-separated and relative to its root.
    pub fn entry_names(&self) -> Vec<String> {
        match self {
            ClasspathEntry::Archive(jar) => {
                let mut names: Vec<String> = jar.entries.iter().cloned().collect();
                names.sort();
                names
            }
            ClasspathEntry::Directory(root) => WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| {
                    let relative = entry.path().strip_prefix(root).ok()?;
                    let parts: Vec<String> = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    Some(parts.join("/"))
                })
                .collect(),
        }
    }
}

/// Entry names stay inside their root: no absolute paths, no `..` segments.
fn is_relative_entry(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.split(['/', '\\']).any(|segment| segment == "..")
}

/// A jar archive with its entry names indexed up front.
///
/// Name lookups use the index and take no lock; reading bytes locks the
/// archive for the duration of one entry read.
pub struct JarArchive {
    path: PathBuf,
    entries: HashSet<String>,
    archive: Mutex<ZipArchive<File>>,
}

impl JarArchive {
    fn new(path: PathBuf, file: File) -> io::Result<Self> {
        let archive = ZipArchive::new(file).map_err(io::Error::other)?;
        let entries = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        Ok(Self {
            path,
            entries,
            archive: Mutex::new(archive),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut archive = self
            .archive
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entry = archive.by_name(name).map_err(io::Error::other)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
