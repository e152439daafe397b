// Upload pipeline. Each path is prepared (read, typed, encoded) and sent on
// its own; a failure is recorded against that path and the batch moves on.
// Outcomes are collected first and rendered by the caller.

use crate::api::{ApiClient, UploadRequest, PERM_UPLOAD_PATH, TEMP_UPLOAD_PATH};
use crate::error::{Result, TobsmgError};
use crate::media_type;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// How long the server keeps a temporary upload.
pub const TEMP_LIFETIME_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Permanent,
    Temporary,
}

impl UploadKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            UploadKind::Permanent => PERM_UPLOAD_PATH,
            UploadKind::Temporary => TEMP_UPLOAD_PATH,
        }
    }
}

/// A file that passed the local checks and is ready to send.
#[derive(Debug)]
pub struct PreparedImage {
    pub path: PathBuf,
    pub request: UploadRequest,
}

/// Where an uploaded image can be viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub url: String,
    pub kind: UploadKind,
}

impl fmt::Display for ImageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image is available at: {}", self.url)?;
        if self.kind == UploadKind::Temporary {
            write!(f, " for {TEMP_LIFETIME_MINUTES} minutes")?;
        }
        Ok(())
    }
}

/// Result for one input path, in input order.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ImageLink>,
}

/// Join `input` onto `cwd` and fold `.` and `..` lexically. Symlinks are not
/// followed; `..` at the root stays at the root.
pub fn resolve_path(cwd: &Path, input: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in cwd.join(input).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match resolved.components().next_back() {
                Some(Component::Normal(_)) => {
                    resolved.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => resolved.push(component),
            },
            other => resolved.push(other),
        }
    }
    resolved
}

/// Resolve `input` against `cwd`, read it, check it is an image and encode it.
pub fn prepare(input: &Path, cwd: &Path) -> Result<PreparedImage> {
    let path = resolve_path(cwd, input);
    let bytes = std::fs::read(&path).map_err(|source| TobsmgError::FileUnreadable {
        path: path.clone(),
        source,
    })?;

    let content_type = match media_type::from_path(&path) {
        Some(ct) if media_type::is_image(ct) => ct,
        _ => return Err(TobsmgError::NotAnImage { path }),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(PreparedImage {
        request: UploadRequest {
            data: STANDARD.encode(bytes),
            content_type: content_type.to_string(),
            name,
        },
        path,
    })
}

/// Sends images one after another through an [`ApiClient`].
pub struct Uploader<'a> {
    api: &'a ApiClient,
    cwd: &'a Path,
    kind: UploadKind,
}

impl<'a> Uploader<'a> {
    pub fn new(api: &'a ApiClient, cwd: &'a Path, kind: UploadKind) -> Self {
        Uploader { api, cwd, kind }
    }

    /// Prepare and upload a single path. `on_send` is called with the
    /// absolute path right before the request goes out.
    pub fn upload_one(&self, input: &Path, on_send: &mut dyn FnMut(&Path)) -> FileOutcome {
        let prepared = match prepare(input, self.cwd) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(path = %input.display(), error = %e, "skipping file");
                return FileOutcome {
                    path: resolve_path(self.cwd, input),
                    result: Err(e),
                };
            }
        };

        on_send(&prepared.path);
        let result = self
            .api
            .upload(self.kind.endpoint(), &prepared.request)
            .map(|image_ref| ImageLink {
                url: self.api.image_url(&image_ref),
                kind: self.kind,
            });
        if let Err(e) = &result {
            tracing::debug!(path = %prepared.path.display(), error = %e, "upload failed");
        }
        FileOutcome {
            path: prepared.path,
            result,
        }
    }

    /// Upload every path in order. Never stops early.
    pub fn upload_all(
        &self,
        inputs: &[PathBuf],
        on_send: &mut dyn FnMut(&Path),
    ) -> Vec<FileOutcome> {
        inputs
            .iter()
            .map(|input| self.upload_one(input, on_send))
            .collect()
    }
}
