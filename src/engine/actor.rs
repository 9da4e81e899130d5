// ============================================================================
// Book Actor
// Single-writer task owning one book, driven over a command queue
// ============================================================================

use crate::domain::{
    BookError, BookResult, BookSnapshot, LevelSummary, Match, Order, OrderId, Side,
};
use crate::numeric::{Price, Quantity};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::Book;

enum Command {
    PlaceLimit {
        price: Price,
        side: Side,
        size: Quantity,
        reply: oneshot::Sender<BookResult<OrderId>>,
    },
    PlaceMarket {
        side: Side,
        size: Quantity,
        reply: oneshot::Sender<BookResult<Vec<Match>>>,
    },
    Cancel {
        order_id: OrderId,
        reply: oneshot::Sender<BookResult<()>>,
    },
    BestAsks {
        reply: oneshot::Sender<Vec<LevelSummary>>,
    },
    BestBids {
        reply: oneshot::Sender<Vec<LevelSummary>>,
    },
    Snapshot {
        levels: usize,
        reply: oneshot::Sender<BookSnapshot>,
    },
}

/// Handle to a task that owns a [`Book`] and applies commands one at a time.
///
/// Commands from every clone of the handle are applied in the order the
/// queue receives them. Dropping every handle stops the task, which then
/// yields the book back through its `JoinHandle`.
#[derive(Clone)]
pub struct BookActor {
    sender: mpsc::Sender<Command>,
}

impl BookActor {
    /// Spawn the actor on the current tokio runtime
    pub fn spawn(book: Book, capacity: usize) -> (Self, JoinHandle<Book>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run(book, receiver));
        (Self { sender }, handle)
    }

    pub async fn place_limit_order(
        &self,
        price: impl Into<Price>,
        side: Side,
        size: impl Into<Quantity>,
    ) -> BookResult<OrderId> {
        let (price, size) = (price.into(), size.into());
        self.request(|reply| Command::PlaceLimit {
            price,
            side,
            size,
            reply,
        })
        .await?
    }

    pub async fn place_market_order(
        &self,
        side: Side,
        size: impl Into<Quantity>,
    ) -> BookResult<Vec<Match>> {
        let size = size.into();
        self.request(|reply| Command::PlaceMarket { side, size, reply }).await?
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> BookResult<()> {
        self.request(|reply| Command::Cancel { order_id, reply }).await?
    }

    pub async fn best_asks(&self) -> BookResult<Vec<LevelSummary>> {
        self.request(|reply| Command::BestAsks { reply }).await
    }

    pub async fn best_bids(&self) -> BookResult<Vec<LevelSummary>> {
        self.request(|reply| Command::BestBids { reply }).await
    }

    pub async fn snapshot(&self, levels: usize) -> BookResult<BookSnapshot> {
        self.request(|reply| Command::Snapshot { levels, reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> BookResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| BookError::ActorUnavailable)?;
        response.await.map_err(|_| BookError::ActorUnavailable)
    }
}

async fn run(mut book: Book, mut receiver: mpsc::Receiver<Command>) -> Book {
    tracing::debug!(instrument = book.instrument(), "book actor started");

    // A dropped reply receiver only means the caller stopped waiting
    while let Some(command) = receiver.recv().await {
        match command {
            Command::PlaceLimit {
                price,
                side,
                size,
                reply,
            } => {
                let _ = reply.send(book.place_limit_order(price, Order::new(side, size)));
            },
            Command::PlaceMarket { side, size, reply } => {
                let mut order = Order::new(side, size);
                let _ = reply.send(book.place_market_order(&mut order));
            },
            Command::Cancel { order_id, reply } => {
                let _ = reply.send(book.cancel_order(order_id).map(|_| ()));
            },
            Command::BestAsks { reply } => {
                let _ = reply.send(book.best_asks());
            },
            Command::BestBids { reply } => {
                let _ = reply.send(book.best_bids());
            },
            Command::Snapshot { levels, reply } => {
                let _ = reply.send(book.depth(levels));
            },
        }
    }

    tracing::debug!(instrument = book.instrument(), "book actor stopped");
    book
}
