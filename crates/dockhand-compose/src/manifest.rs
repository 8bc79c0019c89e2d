//! Manifest rendering: environment substitution and temp-file placement.
//!
//! Placeholders have the form `${NAME}`. Whitespace inside the braces is
//! ignored and unset variables render as the empty string. No default-value
//! or escape syntax is recognized.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use dockhand_common::constants::MANIFEST_TEMP_PREFIX;
use dockhand_common::error::{DockhandError, Result};
use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"));

/// Replaces every `${NAME}` with the value of `NAME` in the process environment.
#[must_use]
pub fn substitute_env(manifest: &str) -> String {
    substitute_with(manifest, |name| std::env::var(name).ok())
}

/// Replaces every `${NAME}` with `lookup(NAME)`, or nothing if it returns `None`.
pub fn substitute_with<F>(manifest: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(manifest, |caps: &Captures<'_>| {
            lookup(caps[1].trim()).unwrap_or_default()
        })
        .into_owned()
}

/// Writes a rendered manifest to a new file in the temp directory.
///
/// The file is kept on disk so that later teardown commands can reference
/// it; nothing in this crate deletes it.
///
/// # Errors
///
/// Returns [`DockhandError::Io`] if the file cannot be created or written.
pub fn write_manifest(rendered: &str) -> Result<PathBuf> {
    write_manifest_in(&std::env::temp_dir(), rendered)
}

/// Writes a rendered manifest to a new, kept file inside `dir`.
///
/// # Errors
///
/// Returns [`DockhandError::Io`] if the file cannot be created or written.
pub fn write_manifest_in(dir: &Path, rendered: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(MANIFEST_TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| DockhandError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

    file.write_all(rendered.as_bytes())
        .map_err(|e| DockhandError::Io {
            path: file.path().to_path_buf(),
            source: e,
        })?;

    let path = file.into_temp_path().keep().map_err(|e| DockhandError::Io {
        path: dir.to_path_buf(),
        source: e.error,
    })?;
    tracing::debug!(path = %path.display(), "wrote rendered manifest");
    Ok(path)
}

/// Lists the services a rendered manifest declares.
///
/// Compose files with a top-level `services` mapping list its keys; legacy
/// files without one list their top-level keys.
///
/// # Errors
///
/// Returns [`DockhandError::Config`] if the manifest is not a YAML mapping.
pub fn service_names(rendered: &str) -> Result<Vec<String>> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(rendered).map_err(|e| DockhandError::Config {
            message: format!("manifest is not valid YAML: {e}"),
        })?;

    let root = doc.as_mapping().ok_or_else(|| DockhandError::Config {
        message: "manifest must be a YAML mapping".into(),
    })?;

    let services = match root.get("services") {
        Some(serde_yaml::Value::Mapping(services)) => services,
        Some(_) => {
            return Err(DockhandError::Config {
                message: "manifest `services` must be a mapping".into(),
            });
        }
        None => root,
    };

    Ok(services
        .keys()
        .filter_map(serde_yaml::Value::as_str)
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "FOO" => Some("bar".into()),
            "TAG" => Some("1.25".into()),
            _ => None,
        }
    }

    #[test]
    fn set_variable_is_substituted_in_place() {
        let out = substitute_with("image: nginx-${FOO}:latest", env);
        assert_eq!(out, "image: nginx-bar:latest");
    }

    #[test]
    fn unset_variable_becomes_empty() {
        let out = substitute_with("a${MISSING}b", env);
        assert_eq!(out, "ab");
    }

    #[test]
    fn whitespace_inside_braces_is_trimmed() {
        let out = substitute_with("tag: ${ TAG }", env);
        assert_eq!(out, "tag: 1.25");
    }

    #[test]
    fn text_without_placeholders_is_untouched() {
        let text = "web:\n  image: nginx\n  ports:\n    - \"80\"\n  command: echo $HOME {x}\n";
        assert_eq!(substitute_with(text, env), text);
    }

    #[test]
    fn multiple_placeholders_on_one_line() {
        let out = substitute_with("${FOO}/${TAG}/${FOO}", env);
        assert_eq!(out, "bar/1.25/bar");
    }

    #[test]
    fn process_environment_is_consulted() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        assert_eq!(substitute_env("p=${PATH}"), format!("p={path}"));
    }

    #[test]
    fn written_manifest_persists_with_prefix() {
        let path = write_manifest("web:\n  image: nginx\n").expect("write");
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name");
        assert!(name.starts_with("docker-compose-"));
        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "web:\n  image: nginx\n");
        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn manifest_is_written_inside_requested_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_manifest_in(dir.path(), "db: {}\n").expect("write");
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "db: {}\n");
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent");
        let err = write_manifest_in(&missing, "db: {}\n").expect_err("should fail");
        assert!(matches!(err, DockhandError::Io { path, .. } if path == missing));
    }

    #[test]
    fn service_names_from_services_section() {
        let manifest = "version: '2'\nservices:\n  web:\n    image: nginx\n  db:\n    image: postgres\n";
        assert_eq!(service_names(manifest).expect("parse"), vec!["web", "db"]);
    }

    #[test]
    fn service_names_from_legacy_layout() {
        let manifest = "redis:\n  image: redis\n";
        assert_eq!(service_names(manifest).expect("parse"), vec!["redis"]);
    }

    #[test]
    fn non_mapping_manifest_is_a_config_error() {
        let err = service_names("- just\n- a list\n").expect_err("should fail");
        assert!(matches!(err, DockhandError::Config { .. }));
    }
}
