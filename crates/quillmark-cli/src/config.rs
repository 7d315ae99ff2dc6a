//! KDL configuration file.
//!
//! ```kdl
//! max-depth 6
//! block-types "header-one" "header-two" "code-block"
//! inline-styles "bold" "italic"
//! persist-styles "BOLD"
//! links true
//! images false
//! link-target "_self"
//! decorate-raw-syntax false
//! ```
//!
//! Every node is optional; missing nodes keep the default.

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlValue};
use miette::{IntoDiagnostic, Result, WrapErr};
use quillmark_core::{InlineStyle, ShortcutConfig, SmolStr};

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quillmark").join("config.kdl"))
}

/// Load the config at `path`, or the default location when `path` is `None`.
///
/// A missing default file is fine; a missing explicit file is an error.
pub fn load(path: Option<&Path>) -> Result<ShortcutConfig> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ShortcutConfig::default()),
        },
    };

    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ShortcutConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let config = parse(&text).wrap_err_with(|| format!("in config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse(text: &str) -> Result<ShortcutConfig> {
    let doc: KdlDocument = text
        .parse()
        .into_diagnostic()
        .wrap_err("config is not valid KDL")?;
    let mut config = ShortcutConfig::default();

    if let Some(value) = arg(&doc, "max-depth") {
        let depth = value
            .as_i64()
            .and_then(|d| usize::try_from(d).ok())
            .ok_or_else(|| miette::miette!("max-depth must be a positive integer, got {value}"))?;
        config.max_depth = depth;
    }
    if let Some(names) = string_args(&doc, "block-types")? {
        config = config.with_block_type_names(names.iter().map(String::as_str))?;
    }
    if let Some(names) = string_args(&doc, "inline-styles")? {
        config = config.with_inline_style_names(names.iter().map(String::as_str))?;
    }
    if let Some(names) = string_args(&doc, "persist-styles")? {
        config.persisted_inline_styles = names
            .iter()
            .map(|name| name.parse::<InlineStyle>())
            .collect::<Result<_, _>>()?;
    }
    if let Some(enabled) = bool_arg(&doc, "links")? {
        config.links = enabled;
    }
    if let Some(enabled) = bool_arg(&doc, "images")? {
        config.images = enabled;
    }
    if let Some(value) = arg(&doc, "link-target") {
        config.link_target = match value {
            KdlValue::Null => None,
            value => Some(SmolStr::new(value.as_string().ok_or_else(|| {
                miette::miette!("link-target must be a string or null, got {value}")
            })?)),
        };
    }
    if let Some(enabled) = bool_arg(&doc, "decorate-raw-syntax")? {
        config.decorate_raw_syntax = enabled;
    }

    config.validate()?;
    Ok(config)
}

fn arg<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)?.entries().first().map(|entry| entry.value())
}

fn bool_arg(doc: &KdlDocument, name: &str) -> Result<Option<bool>> {
    arg(doc, name)
        .map(|value| {
            value
                .as_bool()
                .ok_or_else(|| miette::miette!("{name} must be a boolean, got {value}"))
        })
        .transpose()
}

fn string_args(doc: &KdlDocument, name: &str) -> Result<Option<Vec<String>>> {
    let Some(node) = doc.get(name) else {
        return Ok(None);
    };
    node.entries()
        .iter()
        .map(|entry| {
            entry
                .value()
                .as_string()
                .map(str::to_string)
                .ok_or_else(|| {
                    miette::miette!("{name} takes string arguments, got {}", entry.value())
                })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
