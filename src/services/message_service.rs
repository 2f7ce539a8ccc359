use std::sync::Arc;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::{
    from_document, to_document, Collection, DeleteResult, DocId, DocumentStore, Filter,
};
use crate::models::{Message, MessageContent};
use crate::services::decode_all;

/// Message Store: direct messages between two users.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn DocumentStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn send(
        &self,
        sender: DocId,
        receiver: DocId,
        content: MessageContent,
    ) -> AppResult<Message> {
        info!("User {} sends a message to {}", sender, receiver);
        let mut doc = to_document(&content)?;
        doc.insert("send".to_string(), sender.into());
        doc.insert("receive".to_string(), receiver.into());
        from_document(self.store.insert_one(Collection::Messages, doc).await?)
    }

    pub async fn delete(&self, msgid: DocId) -> AppResult<DeleteResult> {
        info!("Deleting message {}", msgid);
        self.store
            .delete_one(Collection::Messages, &Filter::by_id(msgid))
            .await
    }

    pub async fn view_received(&self, uid: DocId) -> AppResult<Vec<Message>> {
        let filter = Filter::all().eq("receive", uid);
        decode_all(self.store.find(Collection::Messages, &filter).await?)
    }

    pub async fn view_sent(&self, uid: DocId) -> AppResult<Vec<Message>> {
        let filter = Filter::all().eq("send", uid);
        decode_all(self.store.find(Collection::Messages, &filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{IdGenerator, MemoryDocumentStore};

    #[tokio::test]
    async fn delete_targets_message_id() {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        let messages = MessageService::new(Arc::new(MemoryDocumentStore::new(ids.clone())));
        let (alice, bob) = (ids.next_id(), ids.next_id());

        let first = messages
            .send(alice, bob, MessageContent::new("hi bob"))
            .await
            .unwrap();
        messages
            .send(alice, bob, MessageContent::new("you there?"))
            .await
            .unwrap();

        assert_eq!(messages.delete(first.id).await.unwrap().deleted_count, 1);
        let received = messages.view_received(bob).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].content.msg, "you there?");
        assert!(messages.view_sent(bob).await.unwrap().is_empty());
    }
}
