use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ItemInput, NewOrder, OrderChanges, OrderView};
use crate::domain::ports::OrderRepository;
use crate::domain::reconcile::{ItemInsert, ReconcilePlan};
use crate::schema::{order_items, orders};

use super::models::{
    NewOrderItemRow, NewOrderRow, OrderChangesetRow, OrderItemChangeset, OrderItemRow, OrderRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Query helpers ────────────────────────────────────────────────────────────

fn load_order(conn: &mut PgConnection, id: i32) -> Result<Option<OrderView>, DomainError> {
    let order: Option<OrderRow> = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&order)
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load(conn)?;

    order.into_view(items).map(Some)
}

fn insert_items(
    conn: &mut PgConnection,
    order_id: i32,
    items: Vec<ItemInsert>,
) -> Result<Vec<OrderItemRow>, DomainError> {
    if items.is_empty() {
        return Ok(vec![]);
    }

    let rows: Vec<NewOrderItemRow> = items
        .into_iter()
        .map(|item| NewOrderItemRow::new(order_id, item))
        .collect();

    Ok(diesel::insert_into(order_items::table)
        .values(&rows)
        .returning(OrderItemRow::as_returning())
        .get_results(conn)?)
}

fn apply_plan(
    conn: &mut PgConnection,
    order_id: i32,
    plan: ReconcilePlan,
) -> Result<(), DomainError> {
    if plan.is_empty() {
        return Ok(());
    }

    if !plan.delete.is_empty() {
        diesel::delete(
            order_items::table
                .filter(order_items::order_id.eq(order_id))
                .filter(order_items::id.eq_any(&plan.delete)),
        )
        .execute(conn)?;
    }

    for update in plan.update {
        let item_id = update.id;
        diesel::update(
            order_items::table
                .filter(order_items::order_id.eq(order_id))
                .filter(order_items::id.eq(item_id)),
        )
        .set(&OrderItemChangeset::from(update))
        .execute(conn)?;
    }

    insert_items(conn, order_id, plan.insert)?;
    Ok(())
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder, items: Vec<ItemInput>) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order header; status and flags come from defaults.
            let order: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow::from(order))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert its items with server-computed totals.
            let items = insert_items(
                conn,
                order.id,
                items.into_iter().map(ItemInsert::from).collect(),
            )?;

            order.into_view(items)
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, id)
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows: Vec<OrderRow> = orders::table
                .select(OrderRow::as_select())
                .order(orders::id.desc())
                .load(conn)?;

            let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&rows)
                .select(OrderItemRow::as_select())
                .order(order_items::id.asc())
                .load(conn)?;

            items
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(items, order)| order.into_view(items))
                .collect()
        })
    }

    fn update(
        &self,
        id: i32,
        changes: OrderChanges,
        items: Vec<ItemInput>,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let exists = orders::table
                .find(id)
                .select(orders::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(DomainError::NotFound);
            }

            // 1. Reconcile the item set against what is stored.
            let existing_ids: Vec<i32> = order_items::table
                .filter(order_items::order_id.eq(id))
                .select(order_items::id)
                .load(conn)?;
            let plan = ReconcilePlan::build(id, &existing_ids, items)?;
            apply_plan(conn, id, plan)?;

            // 2. Overwrite the header. Last write wins.
            diesel::update(orders::table.find(id))
                .set(&OrderChangesetRow::from(changes))
                .execute(conn)?;

            load_order(conn, id)?.ok_or(DomainError::NotFound)
        })
    }

    fn set_highlight(&self, id: i32, highlighted: bool) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.find(id))
                .set(orders::is_highlighted.eq(highlighted))
                .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound);
            }

            load_order(conn, id)?.ok_or(DomainError::NotFound)
        })
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                .execute(conn)?;

            let deleted = diesel::delete(orders::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::NotFound);
            }
            Ok(())
        })
    }
}
