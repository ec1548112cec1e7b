//! Client-state cart reconciliation.
//!
//! The storefront keeps the cart in two places: a local store that is
//! authoritative while browsing as a guest, and the per-user server document
//! once the user is logged in. `CartSession` owns the in-memory state and
//! write-through policy; persistence sits behind [`CartStore`] so the same
//! session logic runs against the browser-local adapter and the remote one.

use serde::{Deserialize, Serialize};

use crate::models::CartLine;

/// Item as it arrives from the catalog: everything but the quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub image: String,
    pub item_type: String,
    pub weight: String,
}

impl NewCartItem {
    fn into_line(self, quantity: i64) -> CartLine {
        CartLine {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            quantity,
            item_type: self.item_type,
            weight: self.weight,
        }
    }
}

/// Persistence adapter for a cart. Save failures are non-fatal by contract:
/// the session logs them and keeps its optimistic local state.
pub trait CartStore {
    type Error: std::fmt::Display;

    async fn load(&self) -> Result<Vec<CartLine>, Self::Error>;
    async fn save(&mut self, items: &[CartLine]) -> Result<(), Self::Error>;
    async fn clear(&mut self) -> Result<(), Self::Error>;
}

/// In-memory adapter standing in for browser local storage.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    items: Vec<CartLine>,
}

impl CartStore for MemoryCartStore {
    type Error = std::convert::Infallible;

    async fn load(&self) -> Result<Vec<CartLine>, Self::Error> {
        Ok(self.items.clone())
    }

    async fn save(&mut self, items: &[CartLine]) -> Result<(), Self::Error> {
        self.items = items.to_vec();
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), Self::Error> {
        self.items.clear();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CartSession {
    items: Vec<CartLine>,
    logged_in: bool,
}

impl CartSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn total_price(&self) -> i64 {
        self.items.iter().map(|i| i.price * i.quantity).sum()
    }

    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Existing id increments quantity by one, otherwise the item is
    /// appended with quantity 1.
    pub async fn add_item<S: CartStore>(&mut self, store: &mut S, item: NewCartItem) {
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.items.push(item.into_line(1)),
        }
        self.write_through(store).await;
    }

    pub async fn remove_item<S: CartStore>(&mut self, store: &mut S, id: &str) {
        self.items.retain(|line| line.id != id);
        self.write_through(store).await;
    }

    /// Quantity of zero or below removes the line.
    pub async fn update_quantity<S: CartStore>(&mut self, store: &mut S, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(store, id).await;
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
        self.write_through(store).await;
    }

    pub async fn clear<S: CartStore>(&mut self, store: &mut S) {
        self.items.clear();
        if let Err(err) = store.clear().await {
            tracing::warn!(error = %err, "cart clear write failed");
        }
    }

    /// On login, reconcile with the server cart by union: server lines win on
    /// id conflict, local-only lines added while browsing as a guest are
    /// appended after them instead of being dropped.
    pub async fn login<S: CartStore>(&mut self, store: &mut S) {
        self.logged_in = true;
        let server_items = match store.load().await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, "cart load failed on login");
                return;
            }
        };
        if server_items.is_empty() {
            // Nothing persisted yet; push the guest cart up.
            self.write_through(store).await;
            return;
        }
        let mut merged = server_items;
        for local in self.items.drain(..) {
            if !merged.iter().any(|line| line.id == local.id) {
                merged.push(local);
            }
        }
        self.items = merged;
        self.write_through(store).await;
    }

    /// Logout clears the local cart unconditionally; the server document is
    /// left as-is for the next login.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.items.clear();
    }

    /// Optimistic write-through: local state is already updated, a failed
    /// save is logged and not rolled back.
    async fn write_through<S: CartStore>(&self, store: &mut S) {
        if !self.logged_in {
            return;
        }
        if let Err(err) = store.save(&self.items).await {
            tracing::warn!(error = %err, "cart write-through failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            name: format!("Кава {id}"),
            price,
            image: String::new(),
            item_type: "beans".to_string(),
            weight: "250г".to_string(),
        }
    }

    #[tokio::test]
    async fn add_same_item_twice_increments_quantity() {
        let mut session = CartSession::new();
        let mut store = MemoryCartStore::default();
        session.add_item(&mut store, item("p1", 100)).await;
        session.add_item(&mut store, item("p1", 100)).await;

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].quantity, 2);
        assert_eq!(session.total_price(), 200);
        assert_eq!(session.total_items(), 2);
    }

    #[tokio::test]
    async fn update_quantity_to_zero_removes_the_line() {
        let mut session = CartSession::new();
        let mut store = MemoryCartStore::default();
        session.add_item(&mut store, item("p1", 100)).await;
        session.update_quantity(&mut store, "p1", 0).await;

        assert!(session.items().is_empty());
        assert_eq!(session.total_price(), 0);
    }

    #[tokio::test]
    async fn empty_cart_totals_are_zero() {
        let session = CartSession::new();
        assert_eq!(session.total_price(), 0);
        assert_eq!(session.total_items(), 0);
    }

    #[tokio::test]
    async fn guest_mutations_do_not_touch_the_store() {
        let mut session = CartSession::new();
        let mut store = MemoryCartStore::default();
        session.add_item(&mut store, item("p1", 100)).await;

        assert_eq!(session.items().len(), 1);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_merges_server_and_local_carts() {
        let mut store = MemoryCartStore::default();
        store
            .save(&[item("server", 500).into_line(3)])
            .await
            .unwrap();

        let mut session = CartSession::new();
        session.add_item(&mut store, item("local", 100)).await;
        session.add_item(&mut store, item("server", 500)).await;
        session.login(&mut store).await;

        // Server quantity wins for the shared id, the local-only line survives.
        let server = session.items().iter().find(|l| l.id == "server").unwrap();
        assert_eq!(server.quantity, 3);
        assert!(session.items().iter().any(|l| l.id == "local"));
        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn login_with_empty_server_cart_pushes_guest_items() {
        let mut store = MemoryCartStore::default();
        let mut session = CartSession::new();
        session.add_item(&mut store, item("p1", 100)).await;
        session.login(&mut store).await;

        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn logout_clears_local_state_only() {
        let mut store = MemoryCartStore::default();
        let mut session = CartSession::new();
        session.login(&mut store).await;
        session.add_item(&mut store, item("p1", 100)).await;
        session.logout();

        assert!(session.items().is_empty());
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn logged_in_mutations_write_through() {
        let mut store = MemoryCartStore::default();
        let mut session = CartSession::new();
        session.login(&mut store).await;
        session.add_item(&mut store, item("p1", 100)).await;
        session.update_quantity(&mut store, "p1", 5).await;

        let stored = store.load().await.unwrap();
        assert_eq!(stored[0].quantity, 5);
    }
}
