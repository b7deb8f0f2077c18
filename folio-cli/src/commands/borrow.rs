//! Borrowing and purchase commands

use super::{account::sign_in, price_label, spinner};
use anyhow::{Context, Result};
use folio_core::pages::ProfilePage;
use folio_core::{BorrowRequest, CatalogApi, FolioConfig};

/// Borrow a book for `days` days
pub async fn borrow(
    config: &FolioConfig,
    username: &str,
    password: &str,
    book_id: i64,
    days: u32,
) -> Result<()> {
    let (client, _, _) = sign_in(config, username, password).await?;

    let pb = spinner("Borrowing...");
    let result = client.borrow(&BorrowRequest::for_days(book_id, days)).await;
    pb.finish_and_clear();
    let receipt = result.with_context(|| format!("Failed to borrow book {}", book_id))?;

    println!("Borrowed:    {} (#{})", receipt.borrow.book.name, receipt.borrow.id);
    println!("Due:         {}", receipt.borrow.return_date.format("%Y-%m-%d"));
    Ok(())
}

/// Give back a borrowed book
pub async fn return_book(
    config: &FolioConfig,
    username: &str,
    password: &str,
    borrow_id: i64,
) -> Result<()> {
    let (client, auth, _) = sign_in(config, username, password).await?;
    let mut page = ProfilePage::new(auth.session().clone());

    let pb = spinner("Returning...");
    let result = page.return_borrow(&client, borrow_id).await;
    pb.finish_and_clear();
    let receipt = result.with_context(|| format!("Failed to return borrow {}", borrow_id))?;

    println!(
        "{}",
        receipt
            .message
            .unwrap_or_else(|| format!("Returned {}", receipt.borrow.book.name))
    );
    println!("Still borrowed: {}", page.borrows().len());
    Ok(())
}

/// Buy a copy of a book
pub async fn buy(config: &FolioConfig, username: &str, password: &str, book_id: i64) -> Result<()> {
    let (client, _, _) = sign_in(config, username, password).await?;

    let pb = spinner("Purchasing...");
    let result = client.purchase(book_id).await;
    pb.finish_and_clear();
    let purchase = result.with_context(|| format!("Failed to buy book {}", book_id))?;

    println!("Bought:      {}", purchase.book.name);
    println!("Price:       {}", price_label(&purchase.book));
    if let Some(copies) = purchase.book.available_copy {
        println!("Left:        {}", copies);
    }
    Ok(())
}
