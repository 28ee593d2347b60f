//! File stat fields: `size`, `uid`, `gid`, `user`, `group`.
//!
//! `size` is available everywhere. Ownership fields are Unix-only and
//! resolve to `Null` elsewhere; `user` and `group` additionally require a
//! passwd/group entry for the id, so they are registered with the soft
//! error policy.

use std::fs;

use anyhow::{Context, Result, bail};

use super::{FileContext, Provider};
use crate::value::MetaValue;

/// Resolves the stat-derived fields.
pub struct FileStatProvider;

impl Provider for FileStatProvider {
    fn lookup(&self, name: &str, _subfield: Option<&str>, ctx: &FileContext) -> Result<MetaValue> {
        let path = ctx.path();
        let metadata = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;

        if name == "size" {
            return Ok(MetaValue::scalar(metadata.len().to_string()));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            let value = match name {
                "uid" => MetaValue::scalar(metadata.uid().to_string()),
                "gid" => MetaValue::scalar(metadata.gid().to_string()),
                "user" => match uzers::get_user_by_uid(metadata.uid()) {
                    Some(user) => MetaValue::scalar(user.name().to_string_lossy().into_owned()),
                    None => bail!("no passwd entry for uid {}", metadata.uid()),
                },
                "group" => match uzers::get_group_by_gid(metadata.gid()) {
                    Some(group) => MetaValue::scalar(group.name().to_string_lossy().into_owned()),
                    None => bail!("no group entry for gid {}", metadata.gid()),
                },
                other => bail!("unsupported stat field '{other}'"),
            };
            Ok(value)
        }

        #[cfg(not(unix))]
        {
            match name {
                "uid" | "gid" | "user" | "group" => Ok(MetaValue::Null),
                other => bail!("unsupported stat field '{other}'"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn size_matches_file_length() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"12345").unwrap();
        let ctx = FileContext::new(file.path());
        let value = FileStatProvider.lookup("size", None, &ctx).unwrap();
        assert_eq!(value, MetaValue::scalar("5"));
    }

    #[cfg(unix)]
    #[test]
    fn ownership_ids_are_numeric() {
        let file = NamedTempFile::new().unwrap();
        let ctx = FileContext::new(file.path());
        for name in ["uid", "gid"] {
            let value = FileStatProvider.lookup(name, None, &ctx).unwrap();
            match value {
                MetaValue::List(values) => {
                    assert_eq!(values.len(), 1);
                    values[0].parse::<u32>().expect("numeric id");
                }
                other => panic!("unexpected value for {name}: {other:?}"),
            }
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let ctx = FileContext::new("/no/such/file/anywhere");
        assert!(FileStatProvider.lookup("size", None, &ctx).is_err());
    }
}
