use crate::error::Result;
use crate::traits::AssistantsClient;
use crate::types::{ListMessagesQuery, ListOrder, ThreadMessage};

/// Fetch a thread's full message history, oldest first
///
/// Follows `last_id` cursors until the API reports no more pages.
pub async fn list_all_messages(
    client: &dyn AssistantsClient,
    thread_id: &str,
    page_size: u32,
) -> Result<Vec<ThreadMessage>> {
    let mut messages = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut query = ListMessagesQuery::new()
            .order(ListOrder::Asc)
            .limit(page_size);
        if let Some(after) = cursor.take() {
            query = query.after(after);
        }

        let page = client.list_messages(thread_id, &query).await?;
        let next = page
            .last_id
            .clone()
            .or_else(|| page.data.last().map(|m| m.id.clone()));
        let has_more = page.has_more && !page.data.is_empty();
        messages.extend(page.data);

        match next {
            Some(last_id) if has_more => cursor = Some(last_id),
            _ => break,
        }
    }

    tracing::debug!(thread_id, count = messages.len(), "Fetched thread history");
    Ok(messages)
}
