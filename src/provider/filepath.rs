//! The `filepath` field.
//!
//! Resolves to the full path of the file being processed. Path components
//! are reached with dot attributes handled by the renderer:
//! `{filepath.name}`, `{filepath.stem}`, `{filepath.suffix}`,
//! `{filepath.parent}`, and chains such as `{filepath.parent.name}`.

use anyhow::Result;

use super::{FileContext, Provider};
use crate::value::MetaValue;

/// Resolves `filepath` to the context's source path.
pub struct FilepathProvider;

impl Provider for FilepathProvider {
    fn lookup(&self, _name: &str, _subfield: Option<&str>, ctx: &FileContext) -> Result<MetaValue> {
        Ok(MetaValue::scalar(ctx.path().display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_full_path() {
        let ctx = FileContext::new("/music/track.mp3");
        let value = FilepathProvider.lookup("filepath", None, &ctx).unwrap();
        assert_eq!(value, MetaValue::scalar("/music/track.mp3"));
    }
}
