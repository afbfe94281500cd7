//! Fire-and-forget publishing of edits to the relay.
//!
//! Jobs go through one queue drained by one task, so snapshots reach the
//! relay in edit order. Failures are logged and dropped; the local tree stays
//! authoritative.

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use super::client::RelayClient;
use crate::codec::{Action, Snapshot};
use crate::{debug, log};

enum Job {
    Document(Box<Snapshot>),
    Action(Box<Action>),
    Actions(Vec<Action>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the publishing task. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: mpsc::UnboundedSender<Job>,
}

impl Publisher {
    /// Start the publishing task on `handle`.
    pub fn spawn(client: RelayClient, handle: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(drain(client, rx));
        Self { tx }
    }

    /// Queue a snapshot and its companion action record.
    pub fn publish(&self, snapshot: Snapshot, action: Option<Action>) {
        self.enqueue(Job::Document(Box::new(snapshot)));
        if let Some(action) = action {
            self.enqueue(Job::Action(Box::new(action)));
        }
    }

    /// Queue the whole audit log in one request.
    pub fn publish_actions(&self, actions: Vec<Action>) {
        self.enqueue(Job::Actions(actions));
    }

    /// Wait until every job queued so far has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.enqueue(Job::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn enqueue(&self, job: Job) {
        if self.tx.send(job).is_err() {
            debug!("editor"; "publisher stopped, dropping job");
        }
    }
}

async fn drain(client: RelayClient, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = rx.recv().await {
        let result = match job {
            Job::Document(snapshot) => client.send_document(&snapshot).await,
            Job::Action(action) => client.send_action(&action).await,
            Job::Actions(actions) => client.send_actions(&actions).await,
            Job::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };
        match result {
            Ok(delivered) => debug!("editor"; "published to {} observers", delivered),
            Err(e) => log!("editor"; "publish failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::Codec;
    use crate::model::{Node, Tree};
    use crate::relay::memory::MemoryChannel;
    use crate::relay::http::TestEndpoints;
    use crate::relay::{Envelope, Hub};

    #[tokio::test]
    async fn test_publish_keeps_order() {
        let hub = Arc::new(Hub::new());
        let observer = MemoryChannel::new("o");
        hub.accept(observer.boxed());
        let endpoints = TestEndpoints::start(Arc::clone(&hub));

        let client = RelayClient::new(&endpoints.url()).unwrap();
        let publisher = Publisher::spawn(client, &Handle::current());
        let codec = Codec::new();

        let mut tree = Tree::new();
        for i in 0..5 {
            tree = tree.insert_root(Node::with_id(format!("n{i}"), "div", "Div"));
            let action = codec.element_action(crate::codec::ActionKind::Add, format!("n{i}"), None);
            publisher.publish(codec.snapshot(&tree, None), Some(action));
        }
        publisher.flush().await;

        assert_eq!(observer.kinds().len(), 11);
        let sizes: Vec<usize> = observer
            .sent()
            .iter()
            .filter_map(|text| match Envelope::from_json(text) {
                Some(Envelope::DocumentUpdate { document, .. }) => {
                    Snapshot::from_value(document).ok().map(|s| s.node_count())
                }
                _ => None,
            })
            .collect();
        assert_eq!(sizes, [1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = RelayClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
        let publisher = Publisher::spawn(client, &Handle::current());

        publisher.publish_actions(Vec::new());
        publisher.flush().await;
        // Still usable afterwards
        publisher.flush().await;
    }
}
