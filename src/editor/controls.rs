//! Numeric controls shown as a slider plus a number box sharing one value.

use std::fmt;

use crate::layers::stack::LayerTransform;

/// Slider bounds and step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericRange {
    /// Slider minimum.
    pub min: f64,
    /// Slider maximum.
    pub max: f64,
    /// Slider step.
    pub step: f64,
}

impl NumericRange {
    /// Construct a range.
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// `value` pinned to the slider track.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

type Listener = Box<dyn FnMut(f64)>;

/// One canonical value with change listeners.
///
/// The number box may hold values outside the slider range; the core does not validate them.
/// Only the slider view is pinned to the range.
pub struct BoundNumeric {
    range: NumericRange,
    value: f64,
    listeners: Vec<Listener>,
}

impl fmt::Debug for BoundNumeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundNumeric")
            .field("range", &self.range)
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl BoundNumeric {
    /// Control starting at `initial`.
    pub fn new(range: NumericRange, initial: f64) -> Self {
        Self {
            range,
            value: initial,
            listeners: Vec::new(),
        }
    }

    /// Slider bounds.
    pub fn range(&self) -> NumericRange {
        self.range
    }

    /// Canonical value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Where the slider thumb sits.
    pub fn slider_value(&self) -> f64 {
        self.range.clamp(self.value)
    }

    /// Register a listener called with every new value.
    pub fn on_change(&mut self, listener: impl FnMut(f64) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Set the value from either view. Listeners run only when the value changes.
    pub fn set(&mut self, value: f64) {
        if value == self.value || (value.is_nan() && self.value.is_nan()) {
            return;
        }
        self.value = value;
        for listener in &mut self.listeners {
            listener(value);
        }
    }
}

/// Transform fields exposed as numeric controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformField {
    /// Layer opacity.
    Opacity,
    /// Horizontal offset.
    OffsetX,
    /// Vertical offset.
    OffsetY,
    /// Rotation in degrees.
    Rotation,
    /// Uniform scale.
    Scale,
}

impl TransformField {
    /// Every field, in panel order.
    pub const ALL: [TransformField; 5] = [
        TransformField::Opacity,
        TransformField::OffsetX,
        TransformField::OffsetY,
        TransformField::Rotation,
        TransformField::Scale,
    ];

    /// Slider bounds for the field.
    pub fn range(self) -> NumericRange {
        match self {
            TransformField::Opacity => NumericRange::new(0.0, 1.0, 0.01),
            TransformField::OffsetX | TransformField::OffsetY => {
                NumericRange::new(-400.0, 400.0, 1.0)
            }
            TransformField::Rotation => NumericRange::new(-180.0, 180.0, 0.1),
            TransformField::Scale => NumericRange::new(0.0, 3.0, 0.1),
        }
    }

    /// Read the field from `t`.
    pub fn get(self, t: &LayerTransform) -> f64 {
        match self {
            TransformField::Opacity => f64::from(t.opacity),
            TransformField::OffsetX => t.offset_x,
            TransformField::OffsetY => t.offset_y,
            TransformField::Rotation => t.rotation_deg,
            TransformField::Scale => t.scale,
        }
    }

    /// Write the field into `t`.
    pub fn set(self, t: &mut LayerTransform, value: f64) {
        match self {
            TransformField::Opacity => t.opacity = value as f32,
            TransformField::OffsetX => t.offset_x = value,
            TransformField::OffsetY => t.offset_y = value,
            TransformField::Rotation => t.rotation_deg = value,
            TransformField::Scale => t.scale = value,
        }
    }

    /// Control seeded from `t`.
    pub fn control(self, t: &LayerTransform) -> BoundNumeric {
        BoundNumeric::new(self.range(), self.get(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/controls.rs"]
mod tests;
