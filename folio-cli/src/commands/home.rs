//! Landing feed command

use super::{connect, price_label, spinner};
use anyhow::{bail, Context, Result};
use folio_core::pages::{HomePage, LoadState};
use folio_core::{
    BookRecord, CoverResolver, FolioConfig, HeroScheduler, SessionContext, TimerDriver,
    TokioDriver,
};

/// Show the landing feed, then follow the hero rotation for `ticks` periods
pub async fn home(config: &FolioConfig, ticks: u32, start: Option<usize>) -> Result<()> {
    let client = connect(config, SessionContext::new())?;
    let covers = CoverResolver::new(client.base_url());
    let mut page = HomePage::new(TokioDriver::current(), config.hero_period)
        .context("Invalid hero period")?;

    let pb = spinner("Fetching home feed...");
    page.load(&client).await;
    pb.finish_and_clear();

    if let LoadState::Failed(message) = page.load_state() {
        bail!("Failed to fetch home feed: {}", message);
    }

    let feed = page.feed();
    if !feed.categories.is_empty() {
        let names: Vec<&str> = feed.categories.iter().map(|c| c.name.as_str()).collect();
        println!("Categories: {}", names.join(", "));
    }
    print_section("New books", &feed.new_books);
    print_section("Popular", &feed.popular_books);
    print_section("Special offers", &feed.special_books);
    if !feed.previous_reading.is_empty() {
        print_section("Continue reading", &feed.previous_reading);
    }

    let hero = page.hero();
    if hero.is_empty() {
        println!("No featured books");
        return Ok(());
    }

    if let Some(index) = start {
        hero.select(index)
            .with_context(|| format!("Cannot start the rotation at {}", index))?;
    }
    print_hero(hero, &covers);

    if ticks == 0 {
        return Ok(());
    }

    // Sample half a period after each scheduled advance
    let period = hero.period();
    tokio::time::sleep(period / 2).await;
    for _ in 0..ticks {
        tokio::time::sleep(period).await;
        print_hero(page.hero(), &covers);
    }

    page.hero_mut().stop();
    tracing::debug!("Stopped hero rotation after {} ticks", ticks);
    Ok(())
}

fn print_section(title: &str, books: &[BookRecord]) {
    println!("{} ({})", title, books.len());
    for book in books.iter().take(5) {
        println!("  {:>5}  {}  {}", book.id, book.name, price_label(book));
    }
}

fn print_hero<D: TimerDriver>(hero: &HeroScheduler<D>, covers: &CoverResolver) {
    let Some(book) = hero.current_item() else {
        return;
    };
    println!(
        "[{}/{}] {} {}",
        hero.current_index() + 1,
        hero.len(),
        book.name,
        book.author.as_deref().map(|a| format!("by {}", a)).unwrap_or_default()
    );
    if let Some(cover) = covers.resolve(&book) {
        println!("        {}", cover);
    }
}
