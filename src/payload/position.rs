//! Mouse position helpers
//!
//! The front-end enriches every mouse message with positions relative to the
//! observed element and, for images, in natural image pixels. These functions
//! compute the same values so the host can reproduce or check them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Element bounding box in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Displayed and natural size of an image element, plus its left/top insets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGeometry {
    pub padding_left: f64,
    pub border_left: f64,
    pub padding_top: f64,
    pub border_top: f64,
    /// Displayed width in CSS pixels
    pub width: f64,
    /// Displayed height in CSS pixels
    pub height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

/// Position relative to the element's bounding box, rounded to whole pixels
pub fn relative_position(client_x: f64, client_y: f64, rect: &BoundingRect) -> (f64, f64) {
    ((client_x - rect.left).round(), (client_y - rect.top).round())
}

/// Convert an element-relative position into natural image pixels.
///
/// Returns `None` for an image that has no displayed size yet.
pub fn image_data_position(relative: (f64, f64), image: &ImageGeometry) -> Option<(f64, f64)> {
    if image.width <= 0.0 || image.height <= 0.0 {
        return None;
    }
    let inside_x = relative.0.trunc() - image.border_left - image.padding_left;
    let inside_y = relative.1.trunc() - image.border_top - image.padding_top;
    Some((
        (inside_x / image.width * image.natural_width).round(),
        (inside_y / image.height * image.natural_height).round(),
    ))
}

/// Add `relativeX/Y`, `dataX/Y` (images only), the `boundingRect*` values and
/// the deprecated `arrayX/Y` aliases to a raw mouse event.
///
/// Events without `clientX`/`clientY` are left untouched.
pub fn supplement_mouse_positions(
    event: &mut Map<String, Value>,
    rect: &BoundingRect,
    image: Option<&ImageGeometry>,
) {
    let client = (
        event.get("clientX").and_then(Value::as_f64),
        event.get("clientY").and_then(Value::as_f64),
    );
    let (Some(client_x), Some(client_y)) = client else {
        tracing::debug!("Mouse event without client coordinates, not supplementing");
        return;
    };

    let relative = relative_position(client_x, client_y, rect);
    event.insert("relativeX".into(), number(relative.0));
    event.insert("relativeY".into(), number(relative.1));

    if let Some(data) = image.and_then(|image| image_data_position(relative, image)) {
        event.insert("dataX".into(), number(data.0));
        event.insert("dataY".into(), number(data.1));
        event.insert("arrayX".into(), number(data.0));
        event.insert("arrayY".into(), number(data.1));
    }

    event.insert("boundingRectWidth".into(), number(rect.width));
    event.insert("boundingRectHeight".into(), number(rect.height));
    event.insert("boundingRectTop".into(), number(rect.top));
    event.insert("boundingRectLeft".into(), number(rect.left));
    event.insert("boundingRectBottom".into(), number(rect.bottom()));
    event.insert("boundingRectRight".into(), number(rect.right()));
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
