use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rowbind::memory::Table;
use rowbind::{Enum, Model, Type, Value};
use tests::mapper;
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Enum)]
enum Status {
    #[default]
    Pending = 0,
    Shipped = 1,
    Lost = 7,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Money {
    #[column("Amount")]
    amount: i64,

    #[column("Currency")]
    currency: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Everything {
    #[column("Int")]
    int: i32,

    #[column("NullableInt")]
    nullable_int: Option<i64>,

    #[column("Flag")]
    flag: bool,

    #[column("Ratio")]
    ratio: f64,

    #[column("Text")]
    text: String,

    #[column("NullableText")]
    nullable_text: Option<String>,

    #[column("Blob")]
    blob: Vec<u8>,

    #[column("Key")]
    key: Uuid,

    #[column("Day")]
    day: NaiveDate,

    #[column("At")]
    at: Option<NaiveDateTime>,

    #[column("Status")]
    status: Status,

    #[column("NullableStatus")]
    nullable_status: Option<Status>,

    #[complex]
    price: Money,
}

fn table(types: [Type; 14]) -> Table {
    let names = [
        "Int",
        "NullableInt",
        "Flag",
        "Ratio",
        "Text",
        "NullableText",
        "Blob",
        "Key",
        "Day",
        "At",
        "Status",
        "NullableStatus",
        "Amount",
        "Currency",
    ];

    names
        .into_iter()
        .zip(types)
        .fold(Table::new("Everything"), |table, (name, ty)| {
            table.column(name, ty)
        })
}

fn exact_types() -> [Type; 14] {
    [
        Type::I32,
        Type::I64,
        Type::Bool,
        Type::F64,
        Type::String,
        Type::String,
        Type::Bytes,
        Type::Uuid,
        Type::Date,
        Type::DateTime,
        Type::I32,
        Type::I32,
        Type::I64,
        Type::String,
    ]
}

#[test]
fn null_columns_load_zero_values() {
    let mapper = mapper!(Everything);
    let table = table(exact_types()).row(vec![Value::Null; 14]);

    let everything: Everything = mapper.fill_one(&table, 0, 0).unwrap();
    assert_eq!(everything, Everything::default());

    assert_eq!(everything.status, Status::Pending);
    assert_eq!(everything.key, Uuid::nil());
    assert_eq!(everything.nullable_text, None);
    assert_eq!(everything.price, Money::default());
}

#[test]
fn null_overwrites_existing_values() {
    let mapper = mapper!(Everything);
    let table = table(exact_types()).row(vec![Value::Null; 14]);

    let mut everything = Everything {
        int: 5,
        nullable_int: Some(6),
        text: "before".to_string(),
        status: Status::Lost,
        ..Default::default()
    };

    mapper.fill_one_into(&table, 0, 0, &mut everything).unwrap();
    assert_eq!(everything, Everything::default());
}

#[test]
fn exact_types_load_unchanged() {
    let mapper = mapper!(Everything);

    let key = Uuid::new_v4();
    let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    let at = day.and_hms_opt(8, 30, 0).unwrap();

    let table = table(exact_types()).row([
        Value::I32(-3),
        Value::I64(1 << 40),
        Value::Bool(true),
        Value::F64(0.25),
        Value::from("text"),
        Value::from("more"),
        Value::Bytes(vec![1, 2, 3]),
        Value::Uuid(key),
        Value::Date(day),
        Value::DateTime(at),
        Value::I32(1),
        Value::I32(7),
        Value::I64(1999),
        Value::from("EUR"),
    ]);

    let everything: Everything = mapper.fill_one(&table, 0, 0).unwrap();

    assert_eq!(
        everything,
        Everything {
            int: -3,
            nullable_int: Some(1 << 40),
            flag: true,
            ratio: 0.25,
            text: "text".to_string(),
            nullable_text: Some("more".to_string()),
            blob: vec![1, 2, 3],
            key,
            day,
            at: Some(at),
            status: Status::Shipped,
            nullable_status: Some(Status::Lost),
            price: Money {
                amount: 1999,
                currency: "EUR".to_string(),
            },
        }
    );
}

#[test]
fn convertible_types_are_converted() {
    let mapper = mapper!(Everything);

    let key = Uuid::new_v4();

    let table = table([
        Type::String,
        Type::I16,
        Type::I32,
        Type::String,
        Type::I64,
        Type::F64,
        Type::String,
        Type::String,
        Type::String,
        Type::String,
        Type::I64,
        Type::String,
        Type::I32,
        Type::String,
    ])
    .row([
        Value::from("42"),
        Value::I16(9),
        Value::I32(1),
        Value::from("1.5"),
        Value::I64(12),
        Value::F64(0.5),
        Value::from("abc"),
        Value::from(key.to_string()),
        Value::from("2020-01-31"),
        Value::from("2020-01-31 23:59:58"),
        Value::I64(7),
        Value::from("1"),
        Value::I32(5),
        Value::from("USD"),
    ]);

    let everything: Everything = mapper.fill_one(&table, 0, 0).unwrap();

    assert_eq!(everything.int, 42);
    assert_eq!(everything.nullable_int, Some(9));
    assert!(everything.flag);
    assert_eq!(everything.ratio, 1.5);
    assert_eq!(everything.text, "12");
    assert_eq!(everything.nullable_text.as_deref(), Some("0.5"));
    assert_eq!(everything.blob, b"abc");
    assert_eq!(everything.key, key);
    assert_eq!(everything.day, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
    assert_eq!(
        everything.at,
        NaiveDate::from_ymd_opt(2020, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
    );
    assert_eq!(everything.status, Status::Lost);
    assert_eq!(everything.nullable_status, Some(Status::Shipped));
    assert_eq!(everything.price.amount, 5);
}

#[test]
fn untyped_columns_take_the_conversion_path() {
    #[derive(Debug, Default, Clone, Model)]
    struct Loose {
        #[column("N")]
        n: u16,
    }

    let mapper = mapper!(Loose);
    let table = Table::new("Loose").column("N", None).row([Value::from("17")]);

    let loose: Loose = mapper.fill_one(&table, 0, 0).unwrap();
    assert_eq!(loose.n, 17);
}

#[test]
fn failed_conversion_names_the_column() {
    let mapper = mapper!(Everything);

    let mut row = vec![Value::Null; 14];
    row[0] = Value::from("not a number");
    let table = table(exact_types().map(|_| Type::String)).row(row);

    let err = mapper.fill_one::<Everything>(&table, 0, 0).unwrap_err();
    assert!(err.is_type_conversion());
    assert!(err.to_string().contains("`Int`"), "{err}");
}

#[test]
fn unknown_enum_discriminant_is_a_conversion_error() {
    let mapper = mapper!(Everything);

    let mut row = vec![Value::Null; 14];
    row[10] = Value::I32(3);
    let table = table(exact_types()).row(row);

    let err = mapper.fill_one::<Everything>(&table, 0, 0).unwrap_err();
    assert!(err.is_type_conversion());
}
