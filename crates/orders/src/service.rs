use catalog::{CatalogStore, Decrement};
use common::{Identity, Money, OrderId, Page, PageRequest, ProductId};

use crate::discount::DiscountPolicy;
use crate::error::{OrderError, Result};
use crate::order::{LineDraft, LineRequest, Order, OrderDraft};
use crate::store::OrderStore;

/// Stock decrement applied to a product, kept for compensation.
struct AppliedDecrement {
    product_id: ProductId,
    amount: u32,
}

/// The order placement engine.
///
/// Coordinates the catalog store, the discount policy, and the order store
/// to turn a line request list into a persisted order. Stock is claimed
/// per line through compare-and-decrement; any failure after the first
/// successful decrement releases every claimed decrement in reverse order
/// before the error is surfaced.
pub struct OrderService<C, O> {
    catalog: C,
    orders: O,
    policy: DiscountPolicy,
}

impl<C, O> OrderService<C, O>
where
    C: CatalogStore,
    O: OrderStore,
{
    /// Creates a new order service.
    pub fn new(catalog: C, orders: O, policy: DiscountPolicy) -> Self {
        Self {
            catalog,
            orders,
            policy,
        }
    }

    /// Places an order for the authenticated user.
    ///
    /// Validation happens before any stock is touched: the caller must be
    /// authenticated, the request must have at least one line, and every
    /// line quantity must be positive. Unit prices are captured at the
    /// moment each line's stock is claimed, so the persisted order reflects
    /// the prices in effect during placement.
    #[tracing::instrument(skip(self, identity, lines), fields(line_count = lines.len()))]
    pub async fn place_order(
        &self,
        identity: Option<&Identity>,
        lines: Vec<LineRequest>,
    ) -> Result<Order> {
        metrics::counter!("orders_placement_attempts_total").increment(1);
        let placement_start = std::time::Instant::now();

        let identity = identity.ok_or(OrderError::NotAuthenticated)?;
        if lines.is_empty() {
            metrics::counter!("orders_rejected_total").increment(1);
            return Err(OrderError::EmptyOrder);
        }
        for line in &lines {
            if line.quantity == 0 {
                metrics::counter!("orders_rejected_total").increment(1);
                return Err(OrderError::InvalidQuantity {
                    product_id: line.product_id,
                    quantity: line.quantity,
                });
            }
        }

        // Claim stock line by line, capturing price snapshots as we go.
        let mut applied: Vec<AppliedDecrement> = Vec::with_capacity(lines.len());
        let mut drafts: Vec<LineDraft> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.reserve_line(line).await {
                Ok(draft) => {
                    applied.push(AppliedDecrement {
                        product_id: line.product_id,
                        amount: line.quantity,
                    });
                    drafts.push(draft);
                }
                Err(e) => {
                    self.release_applied(&applied).await;
                    metrics::counter!("orders_rejected_total").increment(1);
                    return Err(e);
                }
            }
        }

        let subtotal: Money = drafts.iter().map(|d| d.line_total).sum();
        let discount = self.policy.total_discount(subtotal, identity.role);
        if discount < Money::zero() || discount > subtotal {
            self.release_applied(&applied).await;
            metrics::counter!("orders_rejected_total").increment(1);
            return Err(OrderError::Configuration { subtotal, discount });
        }
        let order_total = subtotal - discount;

        let draft = OrderDraft {
            user_id: identity.user_id,
            lines: drafts,
            order_total,
            total_discount: discount,
        };

        match self.orders.insert(draft).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    user_id = %order.user_id,
                    total_cents = order.order_total.cents(),
                    discount_cents = order.total_discount.cents(),
                    "order placed"
                );
                metrics::counter!("orders_placed_total").increment(1);
                metrics::histogram!("order_placement_duration_seconds")
                    .record(placement_start.elapsed().as_secs_f64());
                Ok(order)
            }
            Err(e) => {
                self.release_applied(&applied).await;
                metrics::counter!("orders_rejected_total").increment(1);
                Err(e.into())
            }
        }
    }

    /// Claims stock for one line and captures the product's current price.
    ///
    /// Retries on compare-and-decrement conflict: a conflict means another
    /// placement changed the quantity between our read and our write, so
    /// the line is re-read and re-checked against the fresh quantity.
    async fn reserve_line(&self, line: &LineRequest) -> Result<LineDraft> {
        loop {
            let product = self
                .catalog
                .get(line.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound {
                    product_id: line.product_id,
                })?;

            if product.quantity < line.quantity {
                return Err(OrderError::InsufficientStock {
                    product_name: product.name,
                    requested: line.quantity,
                    available: product.quantity,
                });
            }

            match self
                .catalog
                .compare_and_decrement(line.product_id, line.quantity, product.quantity)
                .await?
            {
                Decrement::Applied => return Ok(LineDraft::capture(&product, line.quantity)),
                Decrement::Conflict => {
                    tracing::debug!(
                        product_id = %line.product_id,
                        "stock decrement conflict, retrying"
                    );
                    continue;
                }
            }
        }
    }

    /// Releases claimed stock in reverse claim order.
    ///
    /// A failed release is logged and skipped; the remaining decrements are
    /// still released, and the caller surfaces the original placement error.
    async fn release_applied(&self, applied: &[AppliedDecrement]) {
        for decrement in applied.iter().rev() {
            match self
                .catalog
                .release(decrement.product_id, decrement.amount)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::error!(
                        product_id = %decrement.product_id,
                        amount = decrement.amount,
                        "stock release target missing during rollback"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %decrement.product_id,
                        amount = decrement.amount,
                        error = %e,
                        "stock release failed during rollback"
                    );
                }
            }
        }
    }

    /// Fetches an order by id for the authenticated user.
    ///
    /// Owners and admins can read an order. Anyone else gets
    /// `OrderNotFound`, indistinguishable from a missing order, so order
    /// ids cannot be probed for existence.
    #[tracing::instrument(skip(self, identity))]
    pub async fn get_order(&self, identity: Option<&Identity>, id: OrderId) -> Result<Order> {
        let identity = identity.ok_or(OrderError::NotAuthenticated)?;
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound { order_id: id })?;

        if order.user_id != identity.user_id && !identity.role.is_admin() {
            return Err(OrderError::OrderNotFound { order_id: id });
        }
        Ok(order)
    }

    /// Lists the authenticated user's own orders, newest first.
    #[tracing::instrument(skip(self, identity))]
    pub async fn list_orders(
        &self,
        identity: Option<&Identity>,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let identity = identity.ok_or(OrderError::NotAuthenticated)?;
        Ok(self.orders.find_by_owner(identity.user_id, page).await?)
    }

    /// Lists every user's orders, newest first. Admin only.
    #[tracing::instrument(skip(self, identity))]
    pub async fn list_all_orders(
        &self,
        identity: Option<&Identity>,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let identity = identity.ok_or(OrderError::NotAuthenticated)?;
        if !identity.role.is_admin() {
            return Err(OrderError::Forbidden);
        }
        Ok(self.orders.find_all(page).await?)
    }

    /// Deletes an order. Owners and admins only; non-owners get
    /// `OrderNotFound` just like reads.
    #[tracing::instrument(skip(self, identity))]
    pub async fn delete_order(&self, identity: Option<&Identity>, id: OrderId) -> Result<()> {
        // Reuses the read path's ownership masking.
        let order = self.get_order(identity, id).await?;
        if !self.orders.delete(order.id).await? {
            return Err(OrderError::OrderNotFound { order_id: id });
        }
        Ok(())
    }
}
