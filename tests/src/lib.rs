//! Helpers shared by the integration tests.

use rowbind::memory::Table;
use rowbind::{Type, Value};

pub use rowbind;

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a mapper with the given models registered.
#[macro_export]
macro_rules! mapper {
    (
        $( $model:ident ),*
    ) => {{
        $crate::init_logging();
        let mut builder = $crate::rowbind::Mapper::builder();
        $( builder.register::<$model>(); )*
        builder.build().unwrap()
    }};
}

/// Customers 72 and 34, plus one without an id.
pub fn customers() -> Table {
    Table::new("Customer")
        .column("Id", Type::I32)
        .column("Name", Type::String)
        .row([Value::from(72), Value::from("Ann")])
        .row([Value::from(34), Value::from("Bob")])
        .row([Value::Null, Value::from("Nobody")])
}

/// Orders 1 and 2 belong to customer 72, order 3 to customer 34 and order 4
/// to nobody. The parent key column is wider than the customer id on
/// purpose.
pub fn orders() -> Table {
    Table::new("Order")
        .column("OrderId", Type::I32)
        .column("ParentId", Type::I64)
        .column("Total", Type::F64)
        .row([Value::from(1), Value::I64(72), Value::F64(10.0)])
        .row([Value::from(3), Value::I64(34), Value::F64(5.5)])
        .row([Value::from(2), Value::I64(72), Value::F64(7.25)])
        .row([Value::from(4), Value::Null, Value::F64(1.0)])
}

/// `customers()` owning `orders()` through the `Orders` relation.
pub fn customers_with_orders() -> Table {
    let mut customers = customers();
    customers
        .relate("Orders", orders(), &["Id"], &["ParentId"])
        .unwrap();
    customers
}
