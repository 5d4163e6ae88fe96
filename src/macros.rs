/// Builds a [`Value`](crate::Value) tree from a JSON-like literal.
///
/// Object keys are stored as written; they are not qualified with any key
/// path. Other expressions go through [`to_value`](crate::to_value) with the
/// default options and become `Null` if they cannot be encoded.
///
/// ```rust
/// use serde_linecoder::{line_value, Value};
///
/// let record = line_value!({ "int": 12, "tags": ["a", "b"], "gone": null });
/// assert_eq!(record.to_string(), "[gone:null,int:12,tags:[a,b]]");
/// ```
#[macro_export]
macro_rules! line_value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::line_value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::line_value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression is encoded like a top-level value.
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Value, ValueMap};

    #[test]
    fn test_line_value_primitives() {
        assert_eq!(line_value!(null), Value::Null);
        assert_eq!(line_value!(true), Value::Bool(true));
        assert_eq!(line_value!(false), Value::Bool(false));
        assert_eq!(line_value!(42), Value::number("42"));
        assert_eq!(line_value!(3.5), Value::number("3.5"));
        assert_eq!(line_value!("hello"), Value::string("hello"));
    }

    #[test]
    fn test_line_value_arrays() {
        assert_eq!(line_value!([]), Value::Array(vec![]));
        assert_eq!(
            line_value!([1, "two", null]),
            Value::Array(vec![Value::number("1"), Value::string("two"), Value::Null])
        );
    }

    #[test]
    fn test_line_value_objects() {
        assert_eq!(line_value!({}), Value::Object(ValueMap::new()));

        let obj = line_value!({ "name": "Alice", "age": 30 });
        let map = obj.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(&Value::string("Alice")));
        assert_eq!(map.get("age"), Some(&Value::number("30")));
    }

    #[test]
    fn test_unencodable_expression_becomes_null() {
        assert_eq!(line_value!(f64::NAN), Value::Null);
    }
}
