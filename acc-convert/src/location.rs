//! Object path and name derivation.

use serde::Serialize;

/// Tenant that holds objects addressed by two-segment paths.
pub const SHARED_TENANT: &str = "Common";
/// Application that holds objects addressed by two-segment paths.
pub const SHARED_APPLICATION: &str = "Shared";
/// Longest object name the declaration accepts.
pub const MAX_NAME_LEN: usize = 194;

const IAPP_SUFFIX: &str = ".app";

/// Where a source object lands in the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathLocation {
    pub tenant: String,
    pub application: Option<String>,
    pub profile: String,
    pub iapp: bool,
    pub original: String,
}

impl PathLocation {
    /// Application name, falling back to the shared container.
    pub fn application_or_shared(&self) -> &str {
        self.application.as_deref().unwrap_or(SHARED_APPLICATION)
    }

    /// `/<tenant>/<application>/<profile>` of the converted object.
    pub fn declaration_path(&self) -> String {
        format!(
            "/{}/{}/{}",
            self.tenant,
            self.application_or_shared(),
            self.profile
        )
    }
}

/// Split an object path into tenant, application and object name.
///
/// Only `/` separates segments. Two-segment paths are shared objects and
/// land in `Common/Shared`. Deeper folder nesting is flattened into the
/// object name with `_`.
pub fn resolve_path(path: &str) -> PathLocation {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let original = path.to_string();

    match segments.as_slice() {
        [] => PathLocation {
            tenant: SHARED_TENANT.to_string(),
            application: None,
            profile: String::new(),
            iapp: false,
            original,
        },
        [name] => PathLocation {
            tenant: SHARED_TENANT.to_string(),
            application: None,
            profile: (*name).to_string(),
            iapp: false,
            original,
        },
        [_, name] => PathLocation {
            tenant: SHARED_TENANT.to_string(),
            application: Some(SHARED_APPLICATION.to_string()),
            profile: (*name).to_string(),
            iapp: false,
            original,
        },
        [tenant, application, rest @ ..] => {
            let (application, iapp) = match application.strip_suffix(IAPP_SUFFIX) {
                Some(stripped) => (stripped, true),
                None => (*application, false),
            };
            PathLocation {
                tenant: (*tenant).to_string(),
                application: Some(application.to_string()),
                profile: rest.join("_"),
                iapp,
                original,
            }
        }
    }
}

/// Derive an object name from free text.
///
/// A quoted part wins, with spaces turned into `_`. Otherwise the third
/// whitespace token is used, or the whole text when it is a single token.
/// A leading `_` is dropped and the result is cut to [`MAX_NAME_LEN`].
pub fn format_name(text: &str) -> String {
    let name = match quoted_part(text) {
        Some(quoted) => quoted.replace(' ', "_"),
        None => {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            match tokens.as_slice() {
                [single] => (*single).to_string(),
                [_, _, third, ..] => (*third).to_string(),
                _ => text.trim().to_string(),
            }
        }
    };

    let name = name.strip_prefix('_').unwrap_or(&name);
    name.chars().take(MAX_NAME_LEN).collect()
}

fn quoted_part(text: &str) -> Option<&str> {
    let start = text.find(tmsh_conf_core::lexer::QUOTES)?;
    let quote = text[start..].chars().next()?;
    let body = &text[start + quote.len_utf8()..];
    let end = body.find(quote)?;
    Some(&body[..end])
}
