//! Image attachments and external document previews.

use crate::id::RecordId;
use serde::{Deserialize, Serialize};

/// Response of `POST /v1/images`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: RecordId,
    #[serde(default)]
    pub url: Option<String>,
}

/// Public URL of an uploaded image.
///
/// With `via_proxy` the same-origin `/media/<id>` route is used instead of
/// the API host.
pub fn image_url(api_base: &str, id: &RecordId, via_proxy: bool) -> String {
    if via_proxy {
        format!("/media/{id}")
    } else {
        format!("{}/v1/images/{id}", api_base.trim_end_matches('/'))
    }
}

/// Embeddable preview URL for a shared drive document.
///
/// Links ending in `/view` (optionally with a query) become `/preview`;
/// links already pointing at `/preview` are returned unchanged.
pub fn drive_preview_url(link: &str) -> String {
    let (path, _query) = match link.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (link, None),
    };
    if path.ends_with("/preview") {
        return link.to_string();
    }
    match path.strip_suffix("/view") {
        Some(stem) => format!("{stem}/preview"),
        None => link.to_string(),
    }
}
