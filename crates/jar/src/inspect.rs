//! Class-file inspection for loaded classes.

use artiscope_api::{LoadedClass, LoaderError, LoaderResult};
use ristretto_classfile::{ClassAccessFlags, ClassFile};
use std::fmt;
use std::io::Cursor;

pub const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "annotation",
        })
    }
}

/// Reject bytes that cannot be a class file before defining them.
pub fn check_magic(class_name: &str, bytes: &[u8]) -> LoaderResult<()> {
    if bytes.starts_with(&CLASS_MAGIC) {
        Ok(())
    } else {
        Err(LoaderError::InvalidClass {
            class_name: class_name.to_string(),
            reason: "missing CAFEBABE magic".to_string(),
        })
    }
}

/// Parse the class file behind `class` and report what kind of type it is.
pub fn inspect_class(class: &LoadedClass) -> LoaderResult<ClassKind> {
    let parsed = ClassFile::from_bytes(&mut Cursor::new(class.bytes.to_vec())).map_err(|e| {
        LoaderError::InvalidClass {
            class_name: class.name.clone(),
            reason: format!("Failed to parse class: {e:?}"),
        }
    })?;

    // Annotations carry INTERFACE too, so test them first.
    let kind = if parsed.access_flags.contains(ClassAccessFlags::ANNOTATION) {
        ClassKind::Annotation
    } else if parsed.access_flags.contains(ClassAccessFlags::INTERFACE) {
        ClassKind::Interface
    } else if parsed.access_flags.contains(ClassAccessFlags::ENUM) {
        ClassKind::Enum
    } else {
        ClassKind::Class
    };
    Ok(kind)
}
