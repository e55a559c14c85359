//! Staff console CLI for folio.

mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_client::{
    ApiError, ArticleDraft, ArticleEditor, ConsoleClient, FileDraft, FileEditor, FileStore,
    FilterStore, GateState, KeyValueStore, SessionGate, ThemePreference,
};
use folio_core::article::CreateArticleRequest;
use folio_core::file_record::{CreateFileRecordRequest, parse_metadata};
use folio_core::media::image_url;
use folio_core::session::RegisterRequest;
use folio_core::{
    ArticleFilters, ArticleSource, ArticleStatus, ConsoleConfig, FileFilters, FileLink, FileSort,
    PublishedFilter, RecordId, ValidationError, to_slug,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folioctl")]
#[command(about = "Staff console for the folio content backend")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// State file holding the session and preferences (overrides state.path)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Print raw JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Password (prefer --password-stdin)
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Read the password from stdin
        #[arg(long, default_value_t = false)]
        password_stdin: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long, default_value_t = false)]
        password_stdin: bool,
    },
    /// Check the stored session against the server
    Whoami,
    /// Article management
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Linked-file record management
    Files {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Image attachments
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Tag management
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Show or change the theme preference
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Published,
    Pending,
}

impl From<StatusArg> for ArticleStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Draft => Self::Draft,
            StatusArg::Published => Self::Published,
            StatusArg::Pending => Self::Pending,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PublishedArg {
    All,
    True,
    False,
}

impl From<PublishedArg> for PublishedFilter {
    fn from(value: PublishedArg) -> Self {
        match value {
            PublishedArg::All => Self::All,
            PublishedArg::True => Self::True,
            PublishedArg::False => Self::False,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
}

impl From<SortArg> for FileSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::CreatedDesc => Self::CreatedDesc,
            SortArg::CreatedAsc => Self::CreatedAsc,
            SortArg::TitleAsc => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Dark,
    Light,
    Toggle,
}

fn parse_id(s: &str) -> Result<RecordId, String> {
    RecordId::parse(s).map_err(|e| e.to_string())
}

/// `NAME=URL` link argument.
fn parse_link(s: &str) -> Result<FileLink, String> {
    let (name, href) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=URL, got {s:?}"))?;
    Ok(FileLink {
        name: name.trim().to_string(),
        href: href.trim().to_string(),
        ..FileLink::default()
    })
}

#[derive(Args)]
struct ArticleListArgs {
    /// Full-text search
    #[arg(long)]
    q: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long)]
    tag_id: Option<String>,
    #[arg(long)]
    category_id: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    /// Forget saved filters before applying these
    #[arg(long, default_value_t = false)]
    reset: bool,
}

#[derive(Args)]
struct ArticleEditArgs {
    #[arg(long)]
    title: Option<String>,
    /// Explicit slug (derived from the title otherwise)
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    summary: Option<String>,
    /// Read the markdown body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Switch to drive mode with this document link
    #[arg(long)]
    external_link: Option<String>,
    #[arg(long = "add-tag")]
    add_tags: Vec<String>,
    #[arg(long = "remove-tag")]
    remove_tags: Vec<String>,
    /// Attached image ids (replaces the current set)
    #[arg(long = "image", value_parser = parse_id)]
    images: Vec<RecordId>,
    /// Hero image; must be one of the attached images
    #[arg(long, value_parser = parse_id)]
    hero: Option<RecordId>,
}

#[derive(Subcommand)]
enum ArticleCommands {
    /// List articles. Filters are remembered between runs.
    List(ArticleListArgs),
    /// Show one article
    Show {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Publication counters
    Stats,
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        external_link: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Edit fields and save them as one update
    Edit {
        #[arg(value_parser = parse_id)]
        id: RecordId,
        #[command(flatten)]
        edits: ArticleEditArgs,
    },
    /// Publish an article
    Publish {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Move an article back to draft
    Unpublish {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Flip between draft and published
    Toggle {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Delete an article
    Delete {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
}

#[derive(Args)]
struct FileListArgs {
    #[arg(long)]
    q: Option<String>,
    #[arg(long, value_enum)]
    published: Option<PublishedArg>,
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, default_value_t = false)]
    reset: bool,
}

#[derive(Args)]
struct FileEditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Metadata as a JSON object
    #[arg(long)]
    metadata: Option<String>,
    /// Append a link (NAME=URL)
    #[arg(long = "add-link", value_parser = parse_link)]
    add_links: Vec<FileLink>,
    /// Remove the link at this position
    #[arg(long = "remove-link")]
    remove_links: Vec<usize>,
}

#[derive(Subcommand)]
enum FileCommands {
    /// List file records. Filters are remembered between runs.
    List(FileListArgs),
    /// Show one file record
    Show {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Create a file record
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        drive_link: Option<String>,
        #[arg(long)]
        metadata: Option<String>,
        #[arg(long, default_value_t = false)]
        published: bool,
    },
    /// Edit fields and save them as one update
    Edit {
        #[arg(value_parser = parse_id)]
        id: RecordId,
        #[command(flatten)]
        edits: FileEditArgs,
    },
    /// Make a file record public
    Publish {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Hide a file record
    Unpublish {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Delete a file record
    Delete {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Upload an image
    Upload {
        path: PathBuf,
        /// Attach to this article
        #[arg(long, value_parser = parse_id)]
        article: Option<RecordId>,
    },
    /// Delete an image
    Delete {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
    /// Print the public URL of an image
    Url {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// List tags
    List,
    /// Create a tag
    Create { name: String },
    /// Rename a tag
    Rename {
        #[arg(value_parser = parse_id)]
        id: RecordId,
        name: String,
    },
    /// Delete a tag
    Delete {
        #[arg(value_parser = parse_id)]
        id: RecordId,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the resolved config and state file paths
    Paths,
}

/// Everything a command needs: configuration, durable state and the client.
struct Console {
    config: ConsoleConfig,
    config_path: PathBuf,
    storage: Arc<FileStore>,
    client: ConsoleClient,
    json: bool,
}

impl Console {
    fn open(global: &GlobalArgs) -> Result<Self> {
        let config_path = config::config_path(global.config.as_deref())?;
        let config = config::load_config(&config_path)?;
        let state_path = config::state_path(global.state.as_deref(), &config)?;
        let storage = Arc::new(FileStore::open(state_path));
        let client = ConsoleClient::from_config(&config, storage.clone())
            .context("failed to set up API client")?;
        Ok(Self {
            config,
            config_path,
            storage,
            client,
            json: global.json,
        })
    }

    fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }
}

/// Attach a sign-in hint to auth failures.
fn api_error(err: ApiError) -> anyhow::Error {
    if err.is_auth_expired() {
        anyhow::Error::new(err).context("not signed in or session expired; run `folioctl login`")
    } else {
        anyhow::Error::new(err)
    }
}

fn read_password(password: Option<String>, password_stdin: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if password_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        let password = buf.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            anyhow::bail!("password read from stdin is empty");
        }
        return Ok(password);
    }
    anyhow::bail!("password required: use --password or --password-stdin");
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { global, command } = Cli::parse();
    let console = Console::open(&global)?;

    match command {
        Commands::Login {
            email,
            password,
            password_stdin,
        } => handle_login(&console, &email, password, password_stdin).await,
        Commands::Logout => handle_logout(&console).await,
        Commands::Register {
            email,
            name,
            password,
            password_stdin,
        } => {
            let password = read_password(password, password_stdin)?;
            let response = console
                .client
                .register(&RegisterRequest {
                    email: email.clone(),
                    password,
                    name,
                })
                .await
                .map_err(api_error)?;
            if console.json {
                return render::json(&response);
            }
            println!("Registered {email}");
            Ok(())
        }
        Commands::Whoami => handle_whoami(&console).await,
        Commands::Articles { command } => handle_article_command(&console, command).await,
        Commands::Files { command } => handle_file_command(&console, command).await,
        Commands::Images { command } => handle_image_command(&console, command).await,
        Commands::Tags { command } => handle_tag_command(&console, command).await,
        Commands::Theme { action } => handle_theme(&console, action),
        Commands::Config { command } => handle_config_command(&console, command),
    }
}

async fn handle_login(
    console: &Console,
    email: &str,
    password: Option<String>,
    password_stdin: bool,
) -> Result<()> {
    let password = read_password(password, password_stdin)?;
    let user = console
        .client
        .login(email, &password)
        .await
        .map_err(api_error)
        .context("login failed")?;
    if console.json {
        return render::json(&user);
    }
    println!("Signed in as {}", user.display_name());
    println!("State file: {}", console.storage.path().display());
    Ok(())
}

async fn handle_logout(console: &Console) -> Result<()> {
    if !console.client.tokens().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    // The local session is gone either way; only report the server failure.
    if let Err(e) = console.client.logout().await {
        warn!(error = %e, "server-side logout failed");
        eprintln!("Warning: server did not confirm logout: {e}");
    }
    println!("Signed out.");
    Ok(())
}

async fn handle_whoami(console: &Console) -> Result<()> {
    let gate = SessionGate::new(console.client.clone());
    match gate.check("/").await.map_err(api_error)? {
        GateState::Authenticated(user) => {
            if console.json {
                return render::json(&user);
            }
            render::user(&user);
            Ok(())
        }
        GateState::Unauthenticated(redirect) => {
            anyhow::bail!(
                "not signed in (sign-in required for {}); run `folioctl login`",
                redirect.next
            )
        }
        GateState::Unchecked | GateState::Checking => {
            anyhow::bail!("session check did not complete")
        }
    }
}

impl ArticleListArgs {
    fn apply(&self, filters: &mut ArticleFilters) {
        if let Some(q) = &self.q {
            filters.q = q.clone();
        }
        if let Some(status) = self.status {
            filters.status = Some(status.into());
        }
        if let Some(tag_id) = &self.tag_id {
            filters.tag_id = tag_id.clone();
        }
        if let Some(category_id) = &self.category_id {
            filters.category_id = category_id.clone();
        }
        if let Some(limit) = self.limit {
            filters.limit = limit.max(1);
        }
    }
}

impl ArticleEditArgs {
    fn apply(self, draft: &mut ArticleDraft) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            draft.set_title(title);
        }
        if let Some(slug) = &self.slug {
            draft.set_slug(slug);
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if let Some(summary) = self.summary {
            draft.summary = summary;
        }
        if let Some(link) = self.external_link {
            draft.source = ArticleSource::Drive;
            draft.external_link = link;
        }
        for tag in &self.add_tags {
            draft.add_tag(tag)?;
        }
        for tag in &self.remove_tags {
            draft.remove_tag(tag);
        }
        if !self.images.is_empty() {
            draft.set_images(self.images, self.hero);
        } else if let Some(hero) = self.hero {
            let images = draft.image_ids.clone();
            draft.set_images(images, Some(hero));
        }
        Ok(())
    }
}

async fn handle_article_command(console: &Console, command: ArticleCommands) -> Result<()> {
    let client = &console.client;
    match command {
        ArticleCommands::List(args) => {
            let mut store = FilterStore::<ArticleFilters>::load(console.storage());
            if args.reset {
                store.clear();
            }
            store.update(|filters| args.apply(filters));
            if let Some(page) = args.page {
                store.set_page(page);
            }
            let page = client
                .list_articles(store.filters())
                .await
                .map_err(api_error)?;
            if console.json {
                return render::json(&page);
            }
            render::article_list(&page);
        }
        ArticleCommands::Show { id } => {
            let article = client.get_article(&id).await.map_err(api_error)?;
            if console.json {
                return render::json(&article);
            }
            render::article(&article);
        }
        ArticleCommands::Stats => {
            let stats = client.article_stats().await.map_err(api_error)?;
            if console.json {
                return render::json(&stats);
            }
            render::stats(&stats);
        }
        ArticleCommands::Create {
            title,
            slug,
            author,
            summary,
            content_file,
            external_link,
            tags,
        } => {
            let content = match &content_file {
                Some(path) => Some(read_text(path).await?),
                None => None,
            };
            let mut normalized = Vec::new();
            for tag in &tags {
                folio_core::tag::add_tag(&mut normalized, tag).context("invalid tag")?;
            }
            let source = if external_link.is_some() {
                ArticleSource::Drive
            } else {
                ArticleSource::Inline
            };
            let slug = to_slug(slug.as_deref().unwrap_or(&title));
            if slug.is_empty() {
                anyhow::bail!("slug is empty; pass --slug");
            }
            let request = CreateArticleRequest {
                title,
                slug,
                author,
                summary,
                content: content.filter(|_| source == ArticleSource::Inline),
                status: ArticleStatus::Draft,
                tags: normalized,
                source,
                external_link,
            };
            let article = client.create_article(&request).await.map_err(api_error)?;
            if console.json {
                return render::json(&article);
            }
            println!("Created article {} ({})", article.id, article.slug);
        }
        ArticleCommands::Edit { id, edits } => {
            let article = client.get_article(&id).await.map_err(api_error)?;
            let content = match &edits.content_file {
                Some(path) => Some(read_text(path).await?),
                None => None,
            };
            let mut editor = ArticleEditor::from_config(client.clone(), &console.config.editor);
            editor.select(&article);
            editor
                .edit(|draft| {
                    if let Some(content) = content {
                        draft.content = content;
                        draft.source = ArticleSource::Inline;
                    }
                    edits.apply(draft)
                })
                .context("no article selected")?
                .context("invalid edit")?;
            save_draft(editor.flush().await)?;
            println!("Saved article {id}");
        }
        ArticleCommands::Publish { id } => {
            client
                .change_article_status(&id, ArticleStatus::Published)
                .await
                .map_err(api_error)?;
            println!("Published article {id}");
        }
        ArticleCommands::Unpublish { id } => {
            client
                .change_article_status(&id, ArticleStatus::Draft)
                .await
                .map_err(api_error)?;
            println!("Article {id} moved to draft");
        }
        ArticleCommands::Toggle { id } => {
            let article = client.get_article(&id).await.map_err(api_error)?;
            let mut editor = ArticleEditor::from_config(client.clone(), &console.config.editor);
            editor.select(&article);
            save_draft(editor.toggle_status().await)?;
            let status = editor
                .draft()
                .map(|d| d.status)
                .unwrap_or(article.status);
            println!("Article {id} is now {status}");
        }
        ArticleCommands::Delete { id } => {
            client.delete_article(&id).await.map_err(api_error)?;
            println!("Deleted article {id}");
        }
    }
    Ok(())
}

/// Turn the outcome of an editor save into a CLI result.
fn save_draft<T>(outcome: Option<Result<T, ApiError>>) -> Result<()> {
    match outcome {
        Some(Ok(_)) => Ok(()),
        Some(Err(e)) => Err(api_error(e)).context("save failed; nothing was changed"),
        None => anyhow::bail!("nothing to save"),
    }
}

impl FileListArgs {
    fn apply(&self, filters: &mut FileFilters) {
        if let Some(q) = &self.q {
            filters.q = q.clone();
        }
        if let Some(published) = self.published {
            filters.published = published.into();
        }
        if let Some(sort) = self.sort {
            filters.sort = sort.into();
        }
        if let Some(limit) = self.limit {
            filters.limit = limit.max(1);
        }
    }
}

impl FileEditArgs {
    fn apply(self, draft: &mut FileDraft) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            draft.set_title(title);
        }
        if let Some(slug) = &self.slug {
            draft.set_slug(slug);
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(metadata) = &self.metadata {
            draft.set_metadata_text(metadata);
        }
        // Highest index first so earlier removals do not shift later ones.
        let mut removals = self.remove_links;
        removals.sort_unstable_by(|a, b| b.cmp(a));
        removals.dedup();
        for index in removals {
            draft.remove_link(index);
        }
        for link in self.add_links {
            draft.add_link();
            if let Some(row) = draft.links.last_mut() {
                *row = link;
            }
        }
        match draft.metadata_error() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

async fn handle_file_command(console: &Console, command: FileCommands) -> Result<()> {
    let client = &console.client;
    match command {
        FileCommands::List(args) => {
            let mut store = FilterStore::<FileFilters>::load(console.storage());
            if args.reset {
                store.clear();
            }
            store.update(|filters| args.apply(filters));
            if let Some(page) = args.page {
                store.set_page(page);
            }
            let page = client.list_files(store.filters()).await.map_err(api_error)?;
            if console.json {
                return render::json(&page);
            }
            render::file_list(&page);
        }
        FileCommands::Show { id } => {
            let record = client.get_file(&id).await.map_err(api_error)?;
            if console.json {
                return render::json(&record);
            }
            render::file(&record);
        }
        FileCommands::Create {
            title,
            slug,
            description,
            drive_link,
            metadata,
            published,
        } => {
            let metadata = parse_metadata(metadata.as_deref().unwrap_or_default())
                .context("invalid --metadata")?;
            let slug = to_slug(slug.as_deref().unwrap_or(&title));
            if slug.is_empty() {
                anyhow::bail!("slug is empty; pass --slug");
            }
            let request = CreateFileRecordRequest {
                title,
                slug,
                description,
                drive_link,
                is_published: published,
                metadata,
            };
            let record = client.create_file(&request).await.map_err(api_error)?;
            if console.json {
                return render::json(&record);
            }
            println!("Created file record {} ({})", record.id, record.slug);
        }
        FileCommands::Edit { id, edits } => {
            let record = client.get_file(&id).await.map_err(api_error)?;
            let mut editor = FileEditor::from_config(client.clone(), &console.config.editor);
            editor.select(&record);
            editor
                .edit(|draft| edits.apply(draft))
                .context("no file record selected")?
                .context("invalid edit")?;
            save_draft(editor.flush().await)?;
            println!("Saved file record {id}");
        }
        FileCommands::Publish { id } => {
            client
                .set_file_published(&id, true)
                .await
                .map_err(api_error)?;
            println!("Published file record {id}");
        }
        FileCommands::Unpublish { id } => {
            client
                .set_file_published(&id, false)
                .await
                .map_err(api_error)?;
            println!("Hid file record {id}");
        }
        FileCommands::Delete { id } => {
            client.delete_file(&id).await.map_err(api_error)?;
            println!("Deleted file record {id}");
        }
    }
    Ok(())
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => return None,
    })
}

async fn handle_image_command(console: &Console, command: ImageCommands) -> Result<()> {
    let client = &console.client;
    match command {
        ImageCommands::Upload { path, article } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            let image = client
                .upload_image(
                    article.as_ref(),
                    &file_name,
                    content_type_for(&path),
                    bytes,
                )
                .await
                .map_err(api_error)?;
            if console.json {
                return render::json(&image);
            }
            println!("Uploaded image {}", image.id);
            let url = image.url.unwrap_or_else(|| {
                image_url(
                    &console.config.api.base_url,
                    &image.id,
                    console.config.api.image_via_proxy,
                )
            });
            println!("URL: {url}");
        }
        ImageCommands::Delete { id } => {
            client.delete_image(&id).await.map_err(api_error)?;
            println!("Deleted image {id}");
        }
        ImageCommands::Url { id } => {
            println!(
                "{}",
                image_url(
                    &console.config.api.base_url,
                    &id,
                    console.config.api.image_via_proxy
                )
            );
        }
    }
    Ok(())
}

async fn handle_tag_command(console: &Console, command: TagCommands) -> Result<()> {
    let client = &console.client;
    match command {
        TagCommands::List => {
            let tags = client.list_tags().await.map_err(api_error)?;
            if console.json {
                return render::json(&tags);
            }
            render::tags(&tags);
        }
        TagCommands::Create { name } => {
            let tag = client.create_tag(&name).await.map_err(api_error)?;
            println!("Created tag {} ({})", tag.name, tag.id);
        }
        TagCommands::Rename { id, name } => {
            let tag = client.rename_tag(&id, &name).await.map_err(api_error)?;
            println!("Renamed tag {id} to {}", tag.name);
        }
        TagCommands::Delete { id } => {
            client.delete_tag(&id).await.map_err(api_error)?;
            println!("Deleted tag {id}");
        }
    }
    Ok(())
}

fn handle_theme(console: &Console, action: ThemeAction) -> Result<()> {
    let theme = ThemePreference::new(console.storage());
    let dark = match action {
        ThemeAction::Show => theme.is_dark(),
        ThemeAction::Dark => {
            theme.set_dark(true);
            true
        }
        ThemeAction::Light => {
            theme.set_dark(false);
            false
        }
        ThemeAction::Toggle => theme.toggle(),
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(())
}

fn handle_config_command(console: &Console, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let text =
                toml::to_string_pretty(&console.config).context("failed to render configuration")?;
            print!("{text}");
        }
        ConfigCommands::Paths => {
            println!("Config: {}", console.config_path.display());
            println!("State: {}", console.storage.path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link() {
        let link = parse_link("Report = https://example.org/r.pdf").unwrap();
        assert_eq!(link.name, "Report");
        assert_eq!(link.href, "https://example.org/r.pdf");
        assert!(parse_link("no-separator").is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a/hero.PNG")), Some("image/png"));
        assert_eq!(content_type_for(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type_for(Path::new("notes.txt")), None);
        assert_eq!(content_type_for(Path::new("noext")), None);
    }

    #[test]
    fn test_article_edits_apply_to_draft() {
        let article: folio_core::Article = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "Old",
            "slug": "old",
            "tags": ["rivers"],
            "image_ids": [7, 8]
        }))
        .unwrap();
        let mut draft = ArticleDraft::from_article(&article);
        let edits = ArticleEditArgs {
            title: Some("New Title".to_string()),
            slug: None,
            author: None,
            summary: Some("Short".to_string()),
            content_file: None,
            external_link: None,
            add_tags: vec!["Lakes".to_string()],
            remove_tags: vec!["rivers".to_string()],
            images: Vec::new(),
            hero: Some(RecordId::from(8)),
        };
        edits.apply(&mut draft).unwrap();
        assert_eq!(draft.slug, "new-title");
        assert_eq!(draft.tags, vec!["Lakes".to_string()]);
        assert_eq!(draft.hero_image_id, Some(RecordId::from(8)));
    }

    #[test]
    fn test_file_edits_reject_bad_metadata() {
        let record: folio_core::FileRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Gauges",
            "links": [
                {"name": "a", "href": "https://example.org/a"},
                {"name": "b", "href": "https://example.org/b"},
                {"name": "c", "href": "https://example.org/c"}
            ]
        }))
        .unwrap();
        let mut draft = FileDraft::from_record(&record);
        let edits = FileEditArgs {
            title: None,
            slug: None,
            description: None,
            metadata: None,
            add_links: vec![parse_link("d=https://example.org/d").unwrap()],
            remove_links: vec![0, 2],
        };
        edits.apply(&mut draft).unwrap();
        let names: Vec<_> = draft.links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["b", "d"]);

        let edits = FileEditArgs {
            title: None,
            slug: None,
            description: None,
            metadata: Some("[1]".to_string()),
            add_links: Vec::new(),
            remove_links: Vec::new(),
        };
        assert!(edits.apply(&mut draft).is_err());
    }
}
