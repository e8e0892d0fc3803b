//! End-to-end bootstrap walkthrough: modules, scopes, observers, and
//! persistence working together.
//!
//! Run with `cargo run --example bootstrap`.

use bindery::{
    ContainerBuilder, ContainerResult, ContextId, Literal, LoggingObserver, MemoryStore, Module,
    PayloadStore, Persist, Resolver, Scope, SerializationAdapter,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ===== Domain Types =====

#[derive(Debug, Clone)]
struct Article {
    slug: String,
    title: String,
}

// ===== Services =====

trait ArticleRepository: Send + Sync {
    fn find(&self, slug: &str) -> Option<Article>;
}

struct InMemoryArticles {
    articles: HashMap<String, Article>,
}

impl InMemoryArticles {
    fn seeded() -> Self {
        let mut articles = HashMap::new();
        for (slug, title) in [
            ("intro", "Getting Started"),
            ("scopes", "Scope Lifecycles Explained"),
            ("persist", "Carrying State Across Requests"),
        ] {
            articles.insert(
                slug.to_string(),
                Article { slug: slug.to_string(), title: title.to_string() },
            );
        }
        Self { articles }
    }
}

impl ArticleRepository for InMemoryArticles {
    fn find(&self, slug: &str) -> Option<Article> {
        self.articles.get(slug).cloned()
    }
}

/// Per-visitor reading history, application scoped and persistable.
#[derive(Default)]
struct ReadingHistory {
    slugs: Mutex<Vec<String>>,
}

impl ReadingHistory {
    fn record(&self, slug: &str) {
        self.slugs.lock().unwrap().push(slug.to_string());
    }

    fn slugs(&self) -> Vec<String> {
        self.slugs.lock().unwrap().clone()
    }
}

impl Persist for ReadingHistory {
    fn selected_fields(&self) -> &'static [&'static str] {
        &["slugs"]
    }

    fn capture_field(&self, field: &str) -> Option<Literal> {
        match field {
            "slugs" => Some(Literal::Seq(
                self.slugs().into_iter().map(Literal::Str).collect(),
            )),
            _ => None,
        }
    }

    fn restore_field(&mut self, field: &str, value: &Literal) {
        if let ("slugs", Literal::Seq(values)) = (field, value) {
            let mut slugs = self.slugs.lock().unwrap();
            slugs.clear();
            for value in values {
                if let Literal::Str(slug) = value {
                    slugs.push(slug.clone());
                }
            }
        }
    }
}

// ===== Modules =====

struct ContentModule;

impl Module for ContentModule {
    fn name(&self) -> &'static str {
        "content"
    }

    fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
        builder
            .bind_trait::<dyn ArticleRepository>()
            .scoped(Scope::Singleton)
            .to_provider(|_| Ok(Arc::new(InMemoryArticles::seeded()) as Arc<dyn ArticleRepository>))
            .register()
    }
}

struct VisitorModule;

impl Module for VisitorModule {
    fn name(&self) -> &'static str {
        "visitor"
    }

    fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
        builder
            .bind::<ReadingHistory>()
            .scoped(Scope::Application)
            .to_provider(|_| Ok(Arc::new(ReadingHistory::default())))
            .register()
    }
}

// ===== Walkthrough =====

fn serve_visit(
    container: &bindery::Container,
    visitor: &str,
    slug: &str,
) -> ContainerResult<()> {
    let ctx = container.context(visitor);

    let repo = ctx.get_trait::<dyn ArticleRepository>()?;
    let history = ctx.get::<ReadingHistory>()?;

    match repo.find(slug) {
        Some(article) => {
            history.record(&article.slug);
            println!("  {} read {:?}", visitor, article.title);
        }
        None => println!("  {} hit a missing article: {}", visitor, slug),
    }
    Ok(())
}

fn main() -> ContainerResult<()> {
    let mut builder = ContainerBuilder::new();
    builder.add_observer(Arc::new(LoggingObserver::new()));
    builder.install(&ContentModule)?;
    builder.install(&VisitorModule)?;

    println!("Registered bindings:");
    for descriptor in builder.descriptors() {
        println!(
            "  {} [{}]{}",
            descriptor.rendered_key(),
            descriptor.scope,
            descriptor
                .declared_by
                .map(|m| format!(" from module {:?}", m))
                .unwrap_or_default()
        );
    }

    let container = builder.build()?;
    let adapter = SerializationAdapter::new();
    let store = MemoryStore::new();

    println!("\nFirst session for visitor-1:");
    serve_visit(&container, "visitor-1", "intro")?;
    serve_visit(&container, "visitor-1", "scopes")?;

    // Capture the visitor's history before their context ends.
    {
        let ctx = container.context("visitor-1");
        let history = ctx.get::<ReadingHistory>()?;
        let payload = adapter.serialize(history.as_ref())?;
        store
            .save(ctx.id().as_str(), &payload)
            .map_err(|e| bindery::ContainerError::Payload(e.to_string()))?;
        println!("  saved history: {}", payload.to_text()?);
    }
    container.reset_scope(&ContextId::new("visitor-1"));

    println!("\nThe visitor returns in a fresh context:");
    let ctx = container.context("visitor-1");
    let history = ctx.get::<ReadingHistory>()?;
    println!("  history starts empty: {:?}", history.slugs());

    if let Some(payload) = store
        .load(ctx.id().as_str())
        .map_err(|e| bindery::ContainerError::Payload(e.to_string()))?
    {
        let mut restored = ReadingHistory::default();
        let drift = adapter.deserialize(&payload, &mut restored)?;
        println!(
            "  restored history: {:?} ({})",
            restored.slugs(),
            drift
        );
    }

    serve_visit(&container, "visitor-1", "persist")?;

    container.teardown();
    Ok(())
}
