use roster_macros::value_object;

#[value_object]
struct Amount {
    value: i64,
}

#[value_object(debug = false)]
struct NonDebugVO(i32);

#[value_object(eq = false, default = false)]
struct Price {
    amount: f64,
}

#[value_object]
enum Level {
    #[default]
    Low,
    High,
}

fn main() {
    // Debug 默认开启，应可格式化
    let _ = format!("{:?}", Amount { value: 0 });

    let a = Amount::default();
    let _b = a.clone();
    let _eq = a == Amount { value: 0 };

    // debug = false 的不强制使用 Debug，只做构造以确保通过
    let _ = NonDebugVO(1);

    // 浮点字段：仅 PartialEq，无 Default
    let p = Price { amount: 1.5 };
    let _ = p == p.clone();

    let _lv: Level = Default::default();
    let _ = Level::High;
}
