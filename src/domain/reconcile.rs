use std::collections::HashSet;

use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::order::ItemInput;

/// Replacement values for an item that already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: i32,
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

/// An item to insert under the order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInsert {
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

impl From<ItemInput> for ItemInsert {
    /// Used when creating an order: any submitted id is ignored.
    fn from(item: ItemInput) -> Self {
        let total = item.total();
        Self {
            product: item.product,
            quantity: item.quantity,
            price: item.price,
            total,
        }
    }
}

/// Row changes that turn an order's stored items into the submitted list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub delete: Vec<i32>,
    pub update: Vec<ItemUpdate>,
    pub insert: Vec<ItemInsert>,
}

impl ReconcilePlan {
    /// Diff `submitted` against the ids currently stored for `order_id`.
    ///
    /// Stored items missing from the submission are deleted, submitted items
    /// with an id are updated in place and the rest are inserted. Totals are
    /// always recomputed here.
    pub fn build(
        order_id: i32,
        existing_ids: &[i32],
        submitted: Vec<ItemInput>,
    ) -> Result<Self, DomainError> {
        let existing: HashSet<i32> = existing_ids.iter().copied().collect();

        let mut keep = HashSet::new();
        for id in submitted.iter().filter_map(|item| item.id) {
            if !existing.contains(&id) {
                return Err(DomainError::InvalidInput(format!(
                    "item {id} does not belong to order {order_id}"
                )));
            }
            if !keep.insert(id) {
                return Err(DomainError::InvalidInput(format!(
                    "item {id} submitted more than once"
                )));
            }
        }

        let mut plan = ReconcilePlan {
            delete: existing_ids
                .iter()
                .copied()
                .filter(|id| !keep.contains(id))
                .collect(),
            ..Default::default()
        };

        for item in submitted {
            match item.id {
                Some(id) => plan.update.push(ItemUpdate {
                    id,
                    total: item.total(),
                    product: item.product,
                    quantity: item.quantity,
                    price: item.price,
                }),
                None => plan.insert.push(ItemInsert::from(item)),
            }
        }

        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.update.is_empty() && self.insert.is_empty()
    }
}
