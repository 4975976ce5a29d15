//! Classify JavaScript query results into [`RawResult`] shapes

use crate::raw::{ColumnarAccessor, RawResult, RawRow, RawValue, ShapeHint};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Decide which shape a result has by probing its capabilities
pub fn classify(value: &JsValue) -> RawResult {
    let has_child_accessor =
        method(value, "getChildAt").is_some() || method(value, "getChild").is_some();
    match ShapeHint::detect(Array::is_array(value), has_child_accessor) {
        ShapeHint::RowArray => {
            RawResult::Rows(Array::from(value).iter().map(|row| object_row(&row)).collect())
        }
        ShapeHint::ColumnarAccessor => RawResult::Columnar(Box::new(JsTable {
            table: value.clone(),
        })),
        ShapeHint::Unknown => RawResult::Unknown(describe(value)),
    }
}

fn describe(value: &JsValue) -> String {
    if value.is_null() || value.is_undefined() {
        return "null".to_string();
    }
    value
        .dyn_ref::<Object>()
        .map(|o| String::from(o.constructor().name()))
        .unwrap_or_else(|| format!("{:?}", value))
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    if !target.is_object() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

fn object_row(row: &JsValue) -> RawRow {
    match row.dyn_ref::<Object>() {
        Some(obj) => Object::entries(obj)
            .iter()
            .filter_map(|entry| {
                let pair = Array::from(&entry);
                let key = pair.get(0).as_string()?;
                Some((key, to_raw(&pair.get(1))))
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Arrow table exposing `getChildAt(i).toArray()` per column
struct JsTable {
    table: JsValue,
}

impl ColumnarAccessor for JsTable {
    fn num_rows(&self) -> usize {
        Reflect::get(&self.table, &JsValue::from_str("numRows"))
            .ok()
            .and_then(|n| n.as_f64())
            .map_or(0, |n| n as usize)
    }

    fn column_names(&self) -> Vec<String> {
        Reflect::get(&self.table, &JsValue::from_str("schema"))
            .and_then(|schema| Reflect::get(&schema, &JsValue::from_str("fields")))
            .map(|fields| {
                Array::from(&fields)
                    .iter()
                    .map(|field| {
                        Reflect::get(&field, &JsValue::from_str("name"))
                            .ok()
                            .and_then(|n| n.as_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn child(&self, index: usize) -> Option<Vec<RawValue>> {
        let column = match method(&self.table, "getChildAt") {
            Some(get_child_at) => get_child_at
                .call1(&self.table, &JsValue::from(index as u32))
                .ok()?,
            None => {
                let name = self.column_names().get(index)?.clone();
                method(&self.table, "getChild")?
                    .call1(&self.table, &JsValue::from_str(&name))
                    .ok()?
            }
        };
        if column.is_null() || column.is_undefined() {
            return None;
        }
        let values = method(&column, "toArray")?.call0(&column).ok()?;
        Some(Array::from(&values).iter().map(|v| to_raw(&v)).collect())
    }
}

/// Convert one JavaScript cell to a raw value
fn to_raw(value: &JsValue) -> RawValue {
    if value.is_null() || value.is_undefined() {
        return RawValue::Null;
    }
    if let Some(b) = value.as_bool() {
        return RawValue::Bool(b);
    }
    if let Some(n) = value.as_f64() {
        return RawValue::from_js_number(n);
    }
    if let Some(s) = value.as_string() {
        return RawValue::Text(s);
    }
    if let Some(big) = value.dyn_ref::<js_sys::BigInt>() {
        let text = big
            .to_string(10)
            .ok()
            .map(String::from)
            .unwrap_or_default();
        return RawValue::from_integer_text(text);
    }
    if let Some(date) = value.dyn_ref::<js_sys::Date>() {
        return RawValue::Int(date.get_time() as i64);
    }
    if let Some(ints) = typed_ints(value) {
        return RawValue::IntArray(ints);
    }
    if let Some(arr) = value.dyn_ref::<js_sys::Float64Array>() {
        return RawValue::FloatArray(arr.to_vec());
    }
    if let Some(arr) = value.dyn_ref::<js_sys::Float32Array>() {
        return RawValue::FloatArray(arr.to_vec().into_iter().map(f64::from).collect());
    }
    js_sys::JSON::stringify(value)
        .ok()
        .map(|s| RawValue::Text(String::from(s)))
        .unwrap_or(RawValue::Null)
}

fn typed_ints(value: &JsValue) -> Option<Vec<i64>> {
    if let Some(a) = value.dyn_ref::<js_sys::Uint32Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::Int32Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::Uint16Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::Int16Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::Uint8Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::Int8Array>() {
        return Some(a.to_vec().into_iter().map(i64::from).collect());
    }
    if let Some(a) = value.dyn_ref::<js_sys::BigInt64Array>() {
        return Some(a.to_vec());
    }
    if let Some(a) = value.dyn_ref::<js_sys::BigUint64Array>() {
        return Some(
            a.to_vec()
                .into_iter()
                .map(|v| i64::try_from(v).unwrap_or(i64::MAX))
                .collect(),
        );
    }
    None
}
