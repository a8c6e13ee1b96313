//! Copy a template tree into a new project directory
//!
//! Names are substituted with `__key__` markers. Files ending in one of
//! [`TEMPLATE_SUFFIXES`] lose the suffix and have their content rendered with
//! tera; every other file is copied byte-for-byte.

use std::path::{Path, PathBuf};
use tera::Tera;
use tokio::fs;
use tracing::{debug, info};

use crate::core::Result;
use crate::templates::TemplateContext;

/// Suffixes marking a file whose content must be rendered
pub const TEMPLATE_SUFFIXES: &[&str] = &[".hbs", ".tera"];

/// Mirror `template_dir` into `target_dir`, which must not exist yet.
///
/// Returns the number of files written. I/O errors are returned as-is;
/// nothing already written is removed.
pub async fn materialize(
    template_dir: &Path,
    target_dir: &Path,
    context: &TemplateContext,
) -> Result<usize> {
    info!(
        template = %template_dir.display(),
        target = %target_dir.display(),
        "Materializing template tree"
    );

    let tera_context = context.to_tera_context();
    let mut pending: Vec<(PathBuf, PathBuf)> =
        vec![(template_dir.to_path_buf(), target_dir.to_path_buf())];
    let mut written = 0;

    while let Some((source_dir, dest_dir)) = pending.pop() {
        fs::create_dir_all(&dest_dir).await?;

        let mut entries = fs::read_dir(&source_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let dest_name = context.substitute_name(&file_name);

            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), dest_dir.join(dest_name)));
                continue;
            }

            match strip_template_suffix(&dest_name) {
                Some(stripped) => {
                    let dest = dest_dir.join(stripped);
                    let source = fs::read_to_string(entry.path()).await?;
                    let rendered = Tera::one_off(&source, &tera_context, false)?;
                    fs::write(&dest, rendered).await?;
                    debug!(file = %dest.display(), "Rendered template file");
                }
                None => {
                    let dest = dest_dir.join(&dest_name);
                    fs::copy(entry.path(), &dest).await?;
                    debug!(file = %dest.display(), "Copied static file");
                }
            }
            written += 1;
        }
    }

    info!(files = written, "Template tree materialized");
    Ok(written)
}

/// The name without its template suffix, or `None` for static files
pub fn strip_template_suffix(name: &str) -> Option<&str> {
    TEMPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stripped| !stripped.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::templates::context::PROJECT_NAME_SNAKE;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_strip_template_suffix() {
        assert_eq!(strip_template_suffix("main.py.hbs"), Some("main.py"));
        assert_eq!(strip_template_suffix("Cargo.toml.tera"), Some("Cargo.toml"));
        assert_eq!(strip_template_suffix("logo.png"), None);
        assert_eq!(strip_template_suffix(".hbs"), None);
    }

    #[tokio::test]
    async fn test_materialize_substitutes_names_and_content() {
        let template = TempDir::new().unwrap();
        let nested = template.path().join("__projectNameSnake__");
        std_fs::create_dir_all(&nested).unwrap();
        std_fs::write(
            nested.join("__projectNameSnake__.conf.hbs"),
            "name={{ projectNameSnake }}\n",
        )
        .unwrap();
        std_fs::write(template.path().join("static.bin"), [0u8, 159, 146, 150]).unwrap();

        let out = TempDir::new().unwrap();
        let target = out.path().join("project");
        let mut context = TemplateContext::new();
        context.insert(PROJECT_NAME_SNAKE, "foo_bar");

        let written = materialize(template.path(), &target, &context).await.unwrap();

        assert_eq!(written, 2);
        let conf = target.join("foo_bar").join("foo_bar.conf");
        assert_eq!(std_fs::read_to_string(conf).unwrap(), "name=foo_bar\n");
        assert_eq!(
            std_fs::read(target.join("static.bin")).unwrap(),
            vec![0u8, 159, 146, 150]
        );
    }

    #[tokio::test]
    async fn test_materialize_reports_render_errors() {
        let template = TempDir::new().unwrap();
        std_fs::write(template.path().join("broken.txt.hbs"), "{{ missingKey }}").unwrap();

        let out = TempDir::new().unwrap();
        let result = materialize(
            template.path(),
            &out.path().join("project"),
            &TemplateContext::new(),
        )
        .await;

        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[tokio::test]
    async fn test_materialize_missing_template_dir_is_io_error() {
        let out = TempDir::new().unwrap();
        let result = materialize(
            &out.path().join("nope"),
            &out.path().join("project"),
            &TemplateContext::new(),
        )
        .await;

        assert!(matches!(result, Err(Error::Io(_))));
    }
}
