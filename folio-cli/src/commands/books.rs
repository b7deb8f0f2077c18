//! Catalog listing commands

use super::{connect, price_label, spinner};
use anyhow::{bail, Context, Result};
use folio_core::format::truncate;
use folio_core::pages::{CatalogOutcome, CatalogPage, LoadState};
use folio_core::{BookRecord, CatalogApi, CoverResolver, FolioConfig, SessionContext, SortKey};
use serde::Serialize;

/// Book row output
#[derive(Serialize)]
struct BookRow {
    id: i64,
    name: String,
    author: Option<String>,
    date: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    available: bool,
    cover: Option<String>,
}

impl BookRow {
    fn new(book: &BookRecord, covers: &CoverResolver) -> Self {
        Self {
            id: book.id,
            name: book.name.clone(),
            author: book.author.clone(),
            date: book.date.clone(),
            price: book.price,
            category: book.primary_category().map(|c| c.name.clone()),
            available: book.is_available(),
            cover: covers.resolve(book),
        }
    }
}

/// List books under a search filter and sort order
pub async fn books(
    config: &FolioConfig,
    search: &str,
    sort: SortKey,
    limit: Option<u32>,
    category: Option<i64>,
    json: bool,
) -> Result<()> {
    let client = connect(config, SessionContext::new())?;
    let covers = CoverResolver::new(client.base_url());

    let mut page = match category {
        Some(id) => CatalogPage::for_category(id),
        None => CatalogPage::new(),
    };

    let pb = spinner("Fetching books...");
    page.load(&client, limit.unwrap_or(config.book_limit)).await;
    pb.finish_and_clear();

    if let LoadState::Failed(message) = page.load_state() {
        bail!("Failed to fetch books: {}", message);
    }

    page.set_search(search);
    page.set_sort(sort);
    tracing::debug!(
        "Showing {} of {} books sorted by {}",
        page.view().len(),
        page.books().len(),
        sort
    );

    let books = match page.outcome() {
        CatalogOutcome::Books(books) => books,
        CatalogOutcome::NoMatch => {
            if !json {
                println!("No books match '{}'", search.trim());
                return Ok(());
            }
            Vec::new()
        }
        CatalogOutcome::Empty | CatalogOutcome::Loading => {
            if !json {
                println!("No books available");
                return Ok(());
            }
            Vec::new()
        }
    };

    let rows: Vec<BookRow> = books.iter().map(|b| BookRow::new(b, &covers)).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (book, row) in books.iter().zip(&rows) {
        println!(
            "{:>5}  {:<40}  {:<24}  {:>10}  {}",
            row.id,
            truncate(&row.name, 37),
            truncate(row.author.as_deref().unwrap_or("-"), 21),
            row.date.as_deref().unwrap_or("-"),
            price_label(book)
        );
    }
    println!("{} books", rows.len());
    Ok(())
}

/// Show one book in detail
pub async fn book(config: &FolioConfig, id: i64, json: bool) -> Result<()> {
    let client = connect(config, SessionContext::new())?;
    let covers = CoverResolver::new(client.base_url());

    let pb = spinner("Fetching book...");
    let result = client.get_book(id).await;
    pb.finish_and_clear();
    let book = result.with_context(|| format!("Failed to fetch book {}", id))?;

    let row = BookRow::new(&book, &covers);
    if json {
        println!("{}", serde_json::to_string_pretty(&row)?);
        return Ok(());
    }

    println!("Title:       {}", row.name);
    if let Some(author) = &row.author {
        println!("Author:      {}", author);
    }
    if let Some(date) = &row.date {
        println!("Published:   {}", date);
    }
    println!("Price:       {}", price_label(&book));
    if let Some(category) = &row.category {
        println!("Category:    {}", category);
    }
    println!(
        "Available:   {}",
        if row.available { "yes" } else { "no" }
    );
    if let Some(cover) = &row.cover {
        println!("Cover:       {}", cover);
    }
    if let Some(description) = book.description.as_deref().filter(|d| !d.is_empty()) {
        println!("Description: {}", truncate(description, 200));
    }
    Ok(())
}

/// List categories with their book counts
pub async fn categories(config: &FolioConfig, json: bool) -> Result<()> {
    let client = connect(config, SessionContext::new())?;

    let pb = spinner("Fetching categories...");
    let result = client.list_categories().await;
    pb.finish_and_clear();
    let categories = result.context("Failed to fetch categories")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories");
    }
    for category in &categories {
        match category.count {
            Some(count) => println!("{:>5}  {} ({})", category.id, category.name, count),
            None => println!("{:>5}  {}", category.id, category.name),
        }
    }
    Ok(())
}
