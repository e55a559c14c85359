#![allow(dead_code)]

use serde_json::{Value, json};

pub const ACCESS: &str = "access-1";
pub const REFRESH: &str = "refresh-1";

pub fn user_json() -> Value {
    json!({"id": 1, "email": "editor@example.org", "name": "Editor", "role": "admin"})
}

pub fn login_json() -> Value {
    json!({
        "data": {
            "access_token": ACCESS,
            "refresh_token": REFRESH,
            "user": user_json()
        }
    })
}

pub fn article_json(id: u64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "author": "Desk",
        "summary": "",
        "content": "Body",
        "tags": ["climate"],
        "image_ids": [],
        "hero_image_id": null,
        "status": status,
        "source": "inline",
        "updated_at": "2025-03-01T10:00:00Z"
    })
}

pub fn file_json(id: u64, title: &str, is_published: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "description": "",
        "links": [{"name": "Report", "href": "https://example.org/r.pdf", "description": null}],
        "is_published": is_published,
        "metadata": {"year": 2025}
    })
}

pub fn page_json(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({"items": items, "total": total, "page": 1, "limit": 10})
}
