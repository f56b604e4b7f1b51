use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::models::message::MessagePriority;
use crate::models::order::{Department, OrderStatus};

/// Events emitted by the service layer. Delivery is best-effort: a failed
/// send degrades to a warning and never fails the originating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    OrderArchived(Uuid),

    // Customer events
    CustomerCreated(Uuid),
    CustomerUpdated(Uuid),
    CustomerDeleted(Uuid),

    // Product events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),

    // Messaging events
    MessageSent {
        message_id: Uuid,
        from_department: Department,
        to_department: Department,
        priority: MessagePriority,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCreated(order_id) => {
                info!(order_id = %order_id, "event: order created");
            }
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    order_id = %order_id,
                    old_status = %old_status,
                    new_status = %new_status,
                    "event: order status changed"
                );
            }
            Event::OrderArchived(order_id) => {
                info!(order_id = %order_id, "event: order archived");
            }
            Event::CustomerCreated(id) => info!(customer_id = %id, "event: customer created"),
            Event::CustomerUpdated(id) => info!(customer_id = %id, "event: customer updated"),
            Event::CustomerDeleted(id) => info!(customer_id = %id, "event: customer deleted"),
            Event::ProductCreated(id) => info!(product_id = %id, "event: product created"),
            Event::ProductUpdated(id) => info!(product_id = %id, "event: product updated"),
            Event::ProductDeleted(id) => info!(product_id = %id, "event: product deleted"),
            Event::MessageSent {
                message_id,
                from_department,
                to_department,
                priority,
            } => {
                info!(
                    message_id = %message_id,
                    from = %from_department,
                    to = %to_department,
                    priority = %priority,
                    "event: message sent"
                );
            }
        }
    }
}
