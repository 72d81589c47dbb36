use roster_macros::entity_id;

#[entity_id(ord = true)]
struct OrderId(String);

#[entity_id(debug = false)]
struct UserId(i64);

impl std::fmt::Debug for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserId(..)")
    }
}

fn main() {
    let id = OrderId::new("SO001".to_string());
    let _ = format!("{:?}", id); // 默认启用 Debug
    assert_eq!(id.to_string(), "SO001");

    let parsed: UserId = "42".parse().unwrap();
    let _ = format!("{:?}", parsed); // 使用手写 Debug
    let raw: i64 = parsed.into();
    assert_eq!(raw, 42);

    let from_ref = OrderId::from(&"SO002".to_string());
    assert_eq!(from_ref.as_ref(), "SO002");

    // String 内部类型额外提供 as_str 与 From<&str>
    let from_str = OrderId::from("SO003");
    assert_eq!(from_str.as_str(), "SO003");
    assert!(from_ref < from_str);
}
