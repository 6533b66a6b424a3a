//! Named instruction templates with `{placeholder}` substitution.
//!
//! Templates are the `*.md` files of one directory; a template's name is its
//! file stem. Placeholders are `{name}`. Doubled braces (`{{`, `}}`) produce a
//! literal brace, which lets templates embed JSON examples.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::TemplateError;

/// File extension of template files.
const TEMPLATE_EXTENSION: &str = "md";

/// In-memory set of templates loaded from a directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
    templates: BTreeMap<String, String>,
}

impl TemplateStore {
    /// Load every template in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::DirectoryNotFound` if `dir` does not exist and
    /// `TemplateError::Io` if a file cannot be read.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let templates = read_templates(&dir)?;
        debug!("Loaded {} templates from {}", templates.len(), dir.display());
        Ok(Self { dir, templates })
    }

    /// Build a store from in-memory templates, with no backing directory.
    pub fn from_templates<I, N, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            dir: PathBuf::new(),
            templates: templates
                .into_iter()
                .map(|(name, text)| (name.into(), text.into()))
                .collect(),
        }
    }

    /// Re-read the directory, replacing every loaded template.
    ///
    /// On error the previously loaded set is kept.
    pub fn reload(&mut self) -> Result<(), TemplateError> {
        self.templates = read_templates(&self.dir)?;
        debug!("Reloaded {} templates", self.templates.len());
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the loaded templates, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Resolve `name` with `vars` into ready-to-send instruction text.
    ///
    /// Variables the template does not reference are ignored.
    pub fn render(&self, name: &str, vars: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })?;
        substitute(name, template, vars)
    }
}

fn read_templates(dir: &Path) -> Result<BTreeMap<String, String>, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let io_err = |source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut templates = BTreeMap::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        templates.insert(name.to_string(), text);
    }
    Ok(templates)
}

/// Replace `{key}` placeholders in `template` with values from `vars`.
fn substitute(
    name: &str,
    template: &str,
    vars: &HashMap<&str, &str>,
) -> Result<String, TemplateError> {
    let malformed = |offset: usize, reason: &str| TemplateError::Malformed {
        template: name.to_string(),
        offset,
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut key = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(malformed(offset, "nested '{' in placeholder")),
                        c => key.push(c),
                    }
                }
                if !closed {
                    return Err(malformed(offset, "unterminated placeholder"));
                }
                let key = key.trim();
                if key.is_empty() {
                    return Err(malformed(offset, "empty placeholder"));
                }
                let value = vars.get(key).ok_or_else(|| TemplateError::MissingVariable {
                    template: name.to_string(),
                    variable: key.to_string(),
                })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(malformed(offset, "single '}' outside a placeholder"));
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
