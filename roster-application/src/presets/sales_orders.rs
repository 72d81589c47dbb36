use std::sync::Arc;

use chrono::NaiveDate;
use roster_domain::error::DomainResult;
use roster_domain::record::Record;
use roster_domain::source::{RawRecord, StaticSource};
use roster_macros::record;
use serde_json::json;

use crate::config::ControllerConfig;
use crate::controller::EntityCollectionController;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to fetch orders. Please try again.";

/// 销售订单
#[record(
    entity = "sales_order",
    id = order_id,
    category = status,
    categories = ["Pending", "Shipped", "Completed", "Cancelled"]
)]
pub struct SalesOrder {
    #[field(label = "Order ID")]
    pub order_id: String,
    #[field(label = "Customer Name")]
    pub customer_name: String,
    #[field(label = "Order Date")]
    pub order_date: NaiveDate,
    #[field(label = "Status")]
    pub status: String,
    #[field(label = "Total Amount")]
    pub total_amount: f64,
    #[field(label = "Item Count")]
    pub item_count: i64,
}

/// 看板初始的四条订单
pub fn seed() -> Vec<RawRecord> {
    vec![
        json!({ "orderId": "SO001", "customerName": "Alice Wonderland", "orderDate": "2023-10-26", "status": "Shipped", "totalAmount": 150.00, "itemCount": 3 }),
        json!({ "orderId": "SO002", "customerName": "Bob The Builder", "orderDate": "2023-10-27", "status": "Pending", "totalAmount": 200.50, "itemCount": 5 }),
        json!({ "orderId": "SO003", "customerName": "Charlie Brown", "orderDate": "2023-10-28", "status": "Completed", "totalAmount": 75.20, "itemCount": 2 }),
        json!({ "orderId": "SO004", "customerName": "Diana Prince", "orderDate": "2023-10-29", "status": "Cancelled", "totalAmount": 120.00, "itemCount": 1 }),
    ]
}

pub fn config() -> ControllerConfig {
    ControllerConfig::builder()
        .load_error_message(LOAD_ERROR_MESSAGE)
        .build()
}

/// 以静态种子构建（尚未加载的）控制器
pub fn controller() -> DomainResult<EntityCollectionController> {
    Ok(EntityCollectionController::builder()
        .schema(SalesOrder::schema()?)
        .source(Arc::new(StaticSource::new(seed())))
        .config(config())
        .build())
}
