//! Basic example: assign a document, list assignments, remind, clean up.
//!
//! Run with: `cargo run --example basic_call -- <rss-site> <tss-site> <admin-id> <user-id> <doc-id>`

use uamir::{AssignmentManager, Error, ErrorKind};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("uamir=debug,basic_call=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [rss_url, tss_url, admin_id, user_id, doc_id] = args.as_slice() else {
        eprintln!("usage: basic_call <rss-site> <tss-site> <admin-id> <user-id> <doc-id>");
        std::process::exit(2);
    };

    let mut manager = AssignmentManager::new(rss_url, tss_url, admin_id).await?;

    println!("=== Assign ===");
    let first_attempt = manager.assign_document(user_id, doc_id, "form").await;
    let response = match first_attempt {
        Err(e) if e.kind() == ErrorKind::Protocol => {
            // Stale session: refresh once and try again
            manager.update_session_key().await?;
            manager.assign_document(user_id, doc_id, "form").await?
        }
        other => other?,
    };
    println!("Envelope: {}", response.data["assignobj"]);
    println!("Request latency: {:?}", response.latency);
    println!();

    println!("=== Assigned documents ===");
    for doc in manager.get_assigned_documents(user_id).await? {
        println!(
            "{:>8} {:<10} {} (assigned {})",
            doc.assignment_id, doc.doc_type, doc.credential_name, doc.date_assigned
        );
    }
    println!();

    println!("=== Reminder ===");
    let response = manager.send_reminder_for_all(user_id).await?;
    println!("Envelope: {}", response.data["emailobj"]);
    println!();

    println!("=== Delete ===");
    manager.delete_request(user_id, doc_id, "form").await?;
    println!("Request removed");

    Ok(())
}
