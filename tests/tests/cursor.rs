use pretty_assertions::assert_eq;
use rowbind::memory::{Table, TableCursor};
use rowbind::{Column, Cursor, Model, Record, Result, Type, Value};
use tests::{customers, customers_with_orders, mapper};

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Customer {
    #[column("Id")]
    id: Option<i32>,

    #[column("Name")]
    name: String,

    #[relation("Orders", parent_key = "Id", child_key = "ParentId")]
    orders: Vec<Order>,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Order {
    #[column("OrderId")]
    id: i32,
}

/// Lines of comma separated text with untyped columns. A line starting with
/// `!` replaces the header.
struct CsvCursor {
    columns: Vec<Column>,
    lines: std::vec::IntoIter<&'static str>,
    current: Vec<Value>,
}

impl CsvCursor {
    fn new(header: &str, lines: Vec<&'static str>) -> CsvCursor {
        CsvCursor {
            columns: parse_header(header),
            lines: lines.into_iter(),
            current: vec![],
        }
    }
}

fn parse_header(header: &str) -> Vec<Column> {
    header
        .split(',')
        .map(|name| Column {
            name: name.to_string(),
            ty: None,
        })
        .collect()
}

impl Record for CsvCursor {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn value(&self, column: usize) -> &Value {
        &self.current[column]
    }
}

impl Cursor for CsvCursor {
    fn advance(&mut self) -> Result<bool> {
        let mut line = match self.lines.next() {
            Some(line) => line,
            None => return Ok(false),
        };

        while let Some(header) = line.strip_prefix('!') {
            self.columns = parse_header(header);

            line = match self.lines.next() {
                Some(line) => line,
                None => return Ok(false),
            };
        }

        self.current = line
            .split(',')
            .map(|field| match field {
                "" => Value::Null,
                field => Value::from(field),
            })
            .collect();

        Ok(true)
    }
}

#[test]
fn reads_every_record() {
    let mapper = mapper!(Customer);
    let table = customers();

    let mut dest: Vec<Customer> = vec![];
    mapper
        .fill_cursor(&mut TableCursor::new(&table), 0, &mut dest)
        .unwrap();

    let names: Vec<_> = dest.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Ann", "Bob", "Nobody"]);
    assert_eq!(dest[2].id, None);
}

#[test]
fn children_are_not_filled_from_a_cursor() {
    let mapper = mapper!(Customer);
    let table = customers_with_orders();

    let mut dest: Vec<Customer> = vec![];
    mapper
        .fill_cursor(&mut TableCursor::new(&table), 0, &mut dest)
        .unwrap();

    assert_eq!(dest.len(), 3);
    assert!(dest.iter().all(|customer| customer.orders.is_empty()));

    // The same table as a row set does fill them
    let mut dest: Vec<Customer> = vec![];
    mapper.fill_list(&table, 0, &mut dest).unwrap();
    assert_eq!(dest[0].orders.len(), 2);
}

#[test]
fn filter_skips_records() {
    let mapper = mapper!(Customer);
    let table = customers();

    let mut seen = 0;
    let mut dest: Vec<Customer> = vec![];
    mapper
        .fill_cursor_filtered(&mut TableCursor::new(&table), 0, &mut dest, |cursor| {
            seen += 1;
            !cursor.is_null(0)
        })
        .unwrap();

    assert_eq!(seen, 3);
    assert_eq!(dest.len(), 2);
    assert_eq!(dest[1].id, Some(34));
}

#[test]
fn current_record_only() {
    let mapper = mapper!(Customer);
    let table = customers();
    let mut cursor = TableCursor::new(&table);

    cursor.advance().unwrap();
    cursor.advance().unwrap();

    let customer: Customer = mapper.fill_current(&cursor, 0).unwrap();
    assert_eq!(customer.name, "Bob");
    assert_eq!(cursor.position(), Some(1));
}

#[test]
fn untyped_text_columns_are_converted() {
    let mapper = mapper!(Customer);
    let mut cursor = CsvCursor::new("Name,Id", vec!["Ann,72", "Bob,", "Eve,5"]);

    let mut dest: Vec<Customer> = vec![];
    mapper.fill_cursor(&mut cursor, 0, &mut dest).unwrap();

    let ids: Vec<_> = dest.iter().map(|c| c.id).collect();
    assert_eq!(ids, [Some(72), None, Some(5)]);
}

#[test]
fn a_new_header_remaps_the_columns() {
    let mapper = mapper!(Customer);
    let mut cursor = CsvCursor::new(
        "Name,Id",
        vec!["Ann,72", "!Id,Name", "5,Eve", "!Name", "Bob"],
    );

    let mut dest: Vec<Customer> = vec![];
    mapper.fill_cursor(&mut cursor, 0, &mut dest).unwrap();

    let read: Vec<_> = dest.iter().map(|c| (c.id, c.name.as_str())).collect();
    assert_eq!(read, [(Some(72), "Ann"), (Some(5), "Eve"), (None, "Bob")]);
}

#[test]
fn conversion_failures_stop_the_read() {
    let mapper = mapper!(Customer);
    let mut cursor = CsvCursor::new("Name,Id", vec!["Ann,72", "Bob,many", "Eve,5"]);

    let mut dest: Vec<Customer> = vec![];
    let err = mapper.fill_cursor(&mut cursor, 0, &mut dest).unwrap_err();

    assert!(err.is_type_conversion());
    assert_eq!(dest.len(), 1);
}

#[test]
fn nested_objects_come_from_the_same_record() {
    #[derive(Debug, Default, Clone, PartialEq, Model)]
    struct Point {
        #[column("X")]
        #[column("X2", scheme = 1)]
        x: f64,

        #[column("Y")]
        #[column("Y2", scheme = 1)]
        y: f64,
    }

    #[derive(Debug, Default, Clone, PartialEq, Model)]
    struct Segment {
        #[complex]
        from: Point,

        #[complex(scheme = 0, nested = 1)]
        to: Option<Point>,
    }

    let mapper = mapper!(Segment);
    let table = Table::new("Segment")
        .column("X", Type::F64)
        .column("Y", Type::F64)
        .column("X2", Type::I32)
        .column("Y2", Type::I32)
        .row([Value::F64(0.5), Value::F64(1.5), Value::I32(3), Value::I32(4)]);

    let mut dest: Vec<Segment> = vec![];
    mapper
        .fill_cursor(&mut TableCursor::new(&table), 0, &mut dest)
        .unwrap();

    assert_eq!(
        dest,
        [Segment {
            from: Point { x: 0.5, y: 1.5 },
            to: Some(Point { x: 3.0, y: 4.0 }),
        }]
    );
}
