use chrono::NaiveDate;
use roster_domain::record::Record;
use roster_macros::record;

#[record(
    entity = "sales_order",
    id = order_id,
    category = status,
    categories = ["Pending", "Shipped"]
)]
struct SalesOrder {
    #[field(label = "Order ID")]
    order_id: String,
    order_date: NaiveDate,
    status: String,
    total_amount: Option<f64>,
}

#[record(id = id, category = department, identifier = generated)]
struct StaffMember {
    id: i64,
    #[field(rename = "dept")]
    department: String,
}

fn main() {
    let schema = SalesOrder::schema().unwrap();
    assert_eq!(schema.id_field(), "orderId");
    assert_eq!(schema.fields().len(), 4);

    let order = SalesOrder {
        order_id: "SO001".into(),
        order_date: NaiveDate::from_ymd_opt(2023, 10, 26).unwrap(),
        status: "Shipped".into(),
        total_amount: None,
    };
    let entity = order.clone().into_entity();
    assert_eq!(SalesOrder::from_entity(&entity).unwrap(), order);

    let staff = StaffMember::schema().unwrap();
    assert_eq!(staff.entity(), "staff_member");
    assert_eq!(staff.category_field(), "dept");
}
