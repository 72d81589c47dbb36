//! 现成部署
//!
//! - `sales_orders`：销售订单看板，手工订单号，静态种子
//! - `users`：用户目录，远程获取（自动分配标识）或手工标识两种形态
//!
pub mod sales_orders;
pub mod users;
