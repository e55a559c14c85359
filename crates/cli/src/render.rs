//! Terminal output.

use anyhow::{Context, Result};
use folio_core::media::drive_preview_url;
use folio_core::{Article, ArticleSource, ArticleStats, FileRecord, Page, Tag, UserProfile};
use serde::Serialize;

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{text}");
    Ok(())
}

fn page_footer<T>(page: &Page<T>, noun: &str) {
    println!(
        "Page {}/{} ({} {noun})",
        page.page,
        page.total_pages(),
        page.total
    );
}

pub fn article_list(page: &Page<Article>) {
    if page.items.is_empty() {
        println!("No articles.");
    }
    for article in &page.items {
        println!(
            "{:>6}  {:<10} {}  [{}]",
            article.id.as_str(),
            article.status.as_str(),
            article.title,
            article.slug
        );
    }
    page_footer(page, "articles");
}

pub fn article(article: &Article) {
    println!("ID: {}", article.id);
    println!("Title: {}", article.title);
    println!("Slug: {}", article.slug);
    println!("Status: {}", article.status);
    if !article.author.is_empty() {
        println!("Author: {}", article.author);
    }
    if !article.tags.is_empty() {
        println!("Tags: {}", article.tags.join(", "));
    }
    if let Some(hero) = &article.hero_image_id {
        println!("Hero image: {hero}");
    }
    if let Some(updated) = article.updated_at {
        println!("Updated: {updated}");
    }
    match article.source_mode() {
        ArticleSource::Drive => {
            let link = article.external_link.as_deref().unwrap_or_default();
            println!("Source: drive");
            println!("Link: {link}");
            println!("Preview: {}", drive_preview_url(link));
        }
        ArticleSource::Inline => {
            println!("Source: inline");
            if !article.summary.is_empty() {
                println!();
                println!("{}", article.summary);
            }
            if let Some(content) = article.content.as_deref().filter(|c| !c.is_empty()) {
                println!();
                println!("{content}");
            }
        }
    }
}

pub fn stats(stats: &ArticleStats) {
    println!("Published: {}", stats.published);
    println!("Drafts: {}", stats.drafts);
    println!("Pending: {}", stats.pending);
}

pub fn file_list(page: &Page<FileRecord>) {
    if page.items.is_empty() {
        println!("No file records.");
    }
    for record in &page.items {
        let visibility = if record.is_published { "published" } else { "hidden" };
        println!(
            "{:>6}  {:<10} {}  [{}]",
            record.id.as_str(),
            visibility,
            record.title,
            record.slug
        );
    }
    page_footer(page, "file records");
}

pub fn file(record: &FileRecord) {
    println!("ID: {}", record.id);
    println!("Title: {}", record.title);
    println!("Slug: {}", record.slug);
    println!("Published: {}", if record.is_published { "yes" } else { "no" });
    if !record.description.is_empty() {
        println!("Description: {}", record.description);
    }
    let links = record.initial_links();
    if !links.is_empty() {
        println!("Links:");
        for (index, link) in links.iter().enumerate() {
            println!("  {index}. {} <{}>", link.name, link.href);
        }
    }
    println!("Metadata: {}", record.metadata_text());
}

pub fn tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags.");
    }
    for tag in tags {
        println!("{:>6}  {}", tag.id.as_str(), tag.name);
    }
}

pub fn user(user: &UserProfile) {
    println!("User: {}", user.display_name());
    println!("ID: {}", user.id);
    if let Some(email) = &user.email {
        println!("Email: {email}");
    }
    if let Some(role) = &user.role {
        println!("Role: {role}");
    }
}
